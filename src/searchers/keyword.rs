//! A `CandidateSearcher` implementation for keyword substring matching.

use crate::corpus::PassageIndex;
use crate::searcher::{Candidate, CandidateSearcher};
use crate::types::{Query, SearcherKind};

/// A searcher that gathers passages whose selected text contains a keyword.
///
/// Only the first `fanout` keywords are looked up, in query order, which
/// bounds the number of corpus scans on long keyword lists. Scoring still
/// uses every keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSearch {
  fanout: usize,
}

impl KeywordSearch {
  /// Creates a new `KeywordSearch` that looks up the first 5 keywords.
  pub fn new() -> Self {
    Self { fanout: 5 }
  }

  /// Sets how many leading keywords are looked up.
  pub fn with_fanout(mut self, fanout: usize) -> Self {
    self.fanout = fanout;
    self
  }

  pub fn fanout(&self) -> usize {
    self.fanout
  }
}

impl Default for KeywordSearch {
  fn default() -> Self {
    Self::new()
  }
}

impl CandidateSearcher for KeywordSearch {
  fn kind(&self) -> SearcherKind {
    SearcherKind::Keyword
  }

  fn search<'a>(&self, index: &'a dyn PassageIndex, query: &Query) -> Vec<Candidate<'a>> {
    query
      .keywords
      .iter()
      .take(self.fanout)
      .flat_map(|keyword| index.find_by_text_substring(keyword, query.fields))
      .map(|passage| Candidate::new(passage, SearcherKind::Keyword))
      .collect()
  }
}
