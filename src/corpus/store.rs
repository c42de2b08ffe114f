//! In-memory corpus store.

use crate::corpus::dataset::PassageRecord;
use crate::corpus::index::PassageIndex;
use crate::error::{Error, Result};
use crate::types::{normalize_topic, FieldSelector, Passage, PassageId, SourceMetadata, TextField};
use std::collections::BTreeMap;

/// Immutable in-memory passage store.
///
/// Built once by [`CorpusBuilder`] and never mutated afterwards, so a single
/// instance can be shared across threads behind an `Arc`. Lowercased copies of
/// every text field are kept alongside the passages so substring lookups do
/// not re-fold the corpus on every query.
#[derive(Debug, Default)]
pub struct CorpusStore {
  passages: Vec<Passage>,
  folded: Vec<BTreeMap<TextField, String>>,
}

impl CorpusStore {
  /// Creates a new `CorpusBuilder`.
  pub fn builder() -> CorpusBuilder {
    CorpusBuilder::new()
  }

  /// Builds a store from dataset records, assigning ids in iteration order.
  pub fn from_records<I>(records: I) -> Result<Self>
  where
    I: IntoIterator<Item = PassageRecord>,
  {
    let mut builder = CorpusBuilder::new();
    for record in records {
      builder.push(record)?;
    }
    Ok(builder.build())
  }

  /// Iterates passages in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &Passage> {
    self.passages.iter()
  }

  /// Returns the text of one field of one passage.
  ///
  /// Fails with [`Error::UnknownPassage`] for ids outside the corpus and with
  /// [`Error::FieldUnavailable`] when the passage lacks the field.
  pub fn text(&self, id: PassageId, field: TextField) -> Result<&str> {
    self
      .passages
      .get(id)
      .ok_or(Error::UnknownPassage(id))?
      .text(field)
  }

  fn matches_text(&self, id: PassageId, needle: &str, fields: FieldSelector) -> bool {
    let folded = &self.folded[id];
    fields
      .fields()
      .iter()
      .filter_map(|field| folded.get(field))
      .any(|text| text.contains(needle))
  }
}

impl PassageIndex for CorpusStore {
  fn len(&self) -> usize {
    self.passages.len()
  }

  fn get(&self, id: PassageId) -> Option<&Passage> {
    self.passages.get(id)
  }

  fn all(&self) -> Vec<&Passage> {
    self.passages.iter().collect()
  }

  fn find_by_topic_substring(&self, topic: &str) -> Vec<&Passage> {
    // A blank needle would match every tag.
    let Some(needle) = normalize_topic(topic) else {
      return Vec::new();
    };

    self
      .passages
      .iter()
      .filter(|p| p.topics().iter().any(|tag| tag.contains(&needle)))
      .collect()
  }

  fn find_by_text_substring(&self, term: &str, fields: FieldSelector) -> Vec<&Passage> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
      return Vec::new();
    }

    self
      .passages
      .iter()
      .filter(|p| self.matches_text(p.id(), &needle, fields))
      .collect()
  }
}

/// Validates dataset records and assigns passage ids.
///
/// The builder is the only write path into a corpus: once
/// [`build`](CorpusBuilder::build) is called the passages are frozen.
#[derive(Debug, Default)]
pub struct CorpusBuilder {
  passages: Vec<Passage>,
}

impl CorpusBuilder {
  /// Creates a new, empty `CorpusBuilder`.
  pub fn new() -> Self {
    Self {
      passages: Vec::new(),
    }
  }

  /// Appends a record and returns the id assigned to it.
  ///
  /// Blank text fields are dropped; a record left without any text is
  /// rejected with [`Error::InvalidPassage`]. Topic tags are trimmed,
  /// lowercased and deduplicated, keeping their curated order.
  pub fn push(&mut self, record: PassageRecord) -> Result<PassageId> {
    let texts: BTreeMap<TextField, String> = record
      .texts
      .into_iter()
      .filter(|(_, text)| !text.trim().is_empty())
      .collect();

    if texts.is_empty() {
      return Err(Error::InvalidPassage {
        reference: record.reference,
        reason: "no non-empty text field".to_string(),
      });
    }

    let mut topics: Vec<String> = Vec::with_capacity(record.topics.len());
    for tag in record.topics.iter().filter_map(|t| normalize_topic(t)) {
      if !topics.contains(&tag) {
        topics.push(tag);
      }
    }

    if topics.is_empty() {
      tracing::debug!(reference = %record.reference, "passage has no topic tags");
    }

    let id = self.passages.len();
    let source = SourceMetadata {
      kind: record.kind,
      reference: record.reference,
      narrator: record.narrator,
      category: record.category,
    };
    self.passages.push(Passage::new(id, texts, topics, source));
    Ok(id)
  }

  /// Returns the number of passages pushed so far.
  pub fn len(&self) -> usize {
    self.passages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.passages.is_empty()
  }

  /// Freezes the passages into a `CorpusStore`.
  pub fn build(self) -> CorpusStore {
    let folded: Vec<BTreeMap<TextField, String>> = self
      .passages
      .iter()
      .map(|p| {
        [TextField::Primary, TextField::Secondary]
          .into_iter()
          .filter_map(|field| p.text(field).ok().map(|t| (field, t.to_lowercase())))
          .collect::<BTreeMap<_, _>>()
      })
      .collect();

    CorpusStore {
      passages: self.passages,
      folded,
    }
  }
}
