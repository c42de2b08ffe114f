//! Core data types for the matching engine.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Type alias for passage identifiers.
///
/// Ids are assigned by [`CorpusBuilder`](crate::corpus::CorpusBuilder) in
/// insertion order and double as the passage's position in the store.
pub type PassageId = usize;

/// A named text field of a passage.
///
/// The bundled corpus stores the English text as `Primary` and the Arabic
/// text as `Secondary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
  Primary,
  Secondary,
}

impl fmt::Display for TextField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TextField::Primary => f.write_str("primary"),
      TextField::Secondary => f.write_str("secondary"),
    }
  }
}

/// Which text field(s) a query searches and returns.
///
/// The selector never changes the scoring formula, only the text it runs on:
/// `Primary` and `Both` score against the primary text, `Secondary` against
/// the secondary text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSelector {
  #[default]
  Primary,
  Secondary,
  Both,
}

impl FieldSelector {
  /// The fields this selector names, primary first.
  pub fn fields(self) -> &'static [TextField] {
    match self {
      FieldSelector::Primary => &[TextField::Primary],
      FieldSelector::Secondary => &[TextField::Secondary],
      FieldSelector::Both => &[TextField::Primary, TextField::Secondary],
    }
  }

  /// The field relevance scores are computed against.
  pub fn scoring_field(self) -> TextField {
    match self {
      FieldSelector::Secondary => TextField::Secondary,
      FieldSelector::Primary | FieldSelector::Both => TextField::Primary,
    }
  }
}

impl FromStr for FieldSelector {
  type Err = Error;

  /// Accepts the response-language codes used by callers (`en`, `ar`,
  /// `bilingual`) as well as the field names themselves.
  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "en" | "primary" => Ok(FieldSelector::Primary),
      "ar" | "secondary" => Ok(FieldSelector::Secondary),
      "bilingual" | "both" => Ok(FieldSelector::Both),
      other => Err(Error::InvalidArgument(format!(
        "unknown field selector '{other}'"
      ))),
    }
  }
}

/// The collection a passage belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassageKind {
  Verse,
  Hadith,
}

/// Descriptive fields carried through to results but never scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
  pub kind: PassageKind,
  /// Human-readable reference, e.g. `"Ash-Sharh 94:5"`.
  pub reference: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub narrator: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
}

/// A single retrievable unit of corpus content.
///
/// Passages are created by the corpus builder and shared read-only
/// afterwards, so all fields are private and exposed through accessors.
#[derive(Debug, Clone, Serialize)]
pub struct Passage {
  id: PassageId,
  texts: BTreeMap<TextField, String>,
  topics: Vec<String>,
  source: SourceMetadata,
}

impl Passage {
  pub(crate) fn new(
    id: PassageId,
    texts: BTreeMap<TextField, String>,
    topics: Vec<String>,
    source: SourceMetadata,
  ) -> Self {
    Self {
      id,
      texts,
      topics,
      source,
    }
  }

  pub fn id(&self) -> PassageId {
    self.id
  }

  /// Normalized topic tags, in curation order.
  pub fn topics(&self) -> &[String] {
    &self.topics
  }

  pub fn source(&self) -> &SourceMetadata {
    &self.source
  }

  pub fn kind(&self) -> PassageKind {
    self.source.kind
  }

  /// Returns whether the passage has text for `field`.
  pub fn has_field(&self, field: TextField) -> bool {
    self.texts.contains_key(&field)
  }

  /// Returns the text stored for `field`.
  ///
  /// A missing field is reported as [`Error::FieldUnavailable`]; another
  /// language's text is never substituted.
  pub fn text(&self, field: TextField) -> Result<&str> {
    self
      .texts
      .get(&field)
      .map(String::as_str)
      .ok_or(Error::FieldUnavailable {
        passage: self.id,
        field,
      })
  }

  /// Resolves every field named by `selector`.
  ///
  /// Fails with [`Error::FieldUnavailable`] on the first missing field.
  pub fn select(&self, selector: FieldSelector) -> Result<SelectedText<'_>> {
    let mut selected = SelectedText::default();
    for &field in selector.fields() {
      let text = self.text(field)?;
      match field {
        TextField::Primary => selected.primary = Some(text),
        TextField::Secondary => selected.secondary = Some(text),
      }
    }
    Ok(selected)
  }
}

/// The text field(s) a query selected for one passage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectedText<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub primary: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub secondary: Option<&'a str>,
}

impl<'a> SelectedText<'a> {
  /// The text relevance is scored against: primary when selected, else
  /// secondary.
  pub fn scoring_text(&self) -> &'a str {
    self.primary.or(self.secondary).unwrap_or("")
  }
}

/// An identifier for the candidate searcher that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearcherKind {
  /// Topic-tag substring matching. Candidates from this searcher receive the
  /// topic-match boost.
  Topic,
  /// Keyword substring matching over the selected text fields.
  Keyword,
  /// A user-supplied searcher.
  Custom,
}

/// A ranked passage together with the values computed for this query.
///
/// The passage itself is borrowed from the corpus and never modified. When
/// serialized, only the selected text field(s) are written out: the
/// passage's id, source and topics appear next to `texts`, and the full
/// text map is never included.
#[derive(Debug, Clone)]
pub struct ScoredResult<'a> {
  pub passage: &'a Passage,
  /// The text field(s) named by the query's selector.
  pub texts: SelectedText<'a>,
  /// Normalized relevance in `[0, 1]`, rounded to three decimals.
  pub relevance_score: f32,
  /// Query keywords found in the scoring text, in query order.
  pub matched_keywords: Vec<String>,
  /// Whether a topic search gathered this passage.
  pub topic_matched: bool,
}

impl ScoredResult<'_> {
  pub fn id(&self) -> PassageId {
    self.passage.id()
  }
}

impl Serialize for ScoredResult<'_> {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("ScoredResult", 7)?;
    state.serialize_field("id", &self.passage.id())?;
    state.serialize_field("source", self.passage.source())?;
    state.serialize_field("topics", self.passage.topics())?;
    state.serialize_field("texts", &self.texts)?;
    state.serialize_field("relevance_score", &self.relevance_score)?;
    state.serialize_field("matched_keywords", &self.matched_keywords)?;
    state.serialize_field("topic_matched", &self.topic_matched)?;
    state.end()
  }
}

/// Topics and keywords to match against the corpus.
///
/// Queries built through [`Query::new`] or [`QueryBuilder`] are normalized:
/// topics are trimmed and lowercased, keywords are trimmed, and blank entries
/// are dropped. Order is preserved in both lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
  #[serde(default)]
  pub topics: Vec<String>,
  #[serde(default)]
  pub keywords: Vec<String>,
  #[serde(default)]
  pub fields: FieldSelector,
  /// Restricts candidates to one collection when set.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub collection: Option<PassageKind>,
}

impl Query {
  /// Creates a normalized query over the primary text field.
  pub fn new<T, K>(topics: T, keywords: K) -> Self
  where
    T: IntoIterator,
    T::Item: AsRef<str>,
    K: IntoIterator,
    K::Item: AsRef<str>,
  {
    Self::builder().topics(topics).keywords(keywords).build()
  }

  /// Creates a new `QueryBuilder`.
  pub fn builder() -> QueryBuilder {
    QueryBuilder::default()
  }

  /// Builds a keyword-only query from a comma-separated list such as
  /// `"patience, hardship"`.
  pub fn from_keyword_list(list: &str) -> Self {
    Self::builder().keywords(list.split(',')).build()
  }

  /// Returns true when there is nothing to match on.
  pub fn is_empty(&self) -> bool {
    self.topics.is_empty() && self.keywords.is_empty()
  }

  /// Returns a copy restricted to one collection.
  pub fn within(mut self, kind: PassageKind) -> Self {
    self.collection = Some(kind);
    self
  }

  /// Returns a copy using a different field selector.
  pub fn with_fields(mut self, fields: FieldSelector) -> Self {
    self.fields = fields;
    self
  }

  /// Returns whether `passage` belongs to the query's collection.
  pub fn admits(&self, passage: &Passage) -> bool {
    self.collection.map_or(true, |kind| passage.kind() == kind)
  }
}

/// A builder for creating `Query` instances.
#[derive(Debug, Default)]
pub struct QueryBuilder {
  topics: Vec<String>,
  keywords: Vec<String>,
  fields: FieldSelector,
  collection: Option<PassageKind>,
}

impl QueryBuilder {
  /// Adds a single topic.
  pub fn topic(mut self, topic: impl AsRef<str>) -> Self {
    if let Some(topic) = normalize_topic(topic.as_ref()) {
      self.topics.push(topic);
    }
    self
  }

  /// Adds topics in order.
  pub fn topics<I>(self, topics: I) -> Self
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    topics.into_iter().fold(self, |b, t| b.topic(t))
  }

  /// Adds a single keyword. Multi-word keywords are kept as one phrase.
  pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
    let keyword = keyword.as_ref().trim();
    if !keyword.is_empty() {
      self.keywords.push(keyword.to_string());
    }
    self
  }

  /// Adds keywords in order.
  pub fn keywords<I>(self, keywords: I) -> Self
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    keywords.into_iter().fold(self, |b, k| b.keyword(k))
  }

  pub fn fields(mut self, fields: FieldSelector) -> Self {
    self.fields = fields;
    self
  }

  pub fn collection(mut self, kind: PassageKind) -> Self {
    self.collection = Some(kind);
    self
  }

  /// Builds the final `Query`.
  pub fn build(self) -> Query {
    Query {
      topics: self.topics,
      keywords: self.keywords,
      fields: self.fields,
      collection: self.collection,
    }
  }
}

/// Trims and lowercases a topic tag; blank tags yield `None`.
pub(crate) fn normalize_topic(topic: &str) -> Option<String> {
  let topic = topic.trim();
  if topic.is_empty() {
    None
  } else {
    Some(topic.to_lowercase())
  }
}
