//! The `CandidateSearcher` trait, which defines the interface for candidate
//! gathering plugins.

use crate::corpus::PassageIndex;
use crate::types::{Passage, Query, SearcherKind};

/// A passage gathered for a query, tagged with the searcher that found it.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
  pub passage: &'a Passage,
  pub origin: SearcherKind,
}

impl<'a> Candidate<'a> {
  pub fn new(passage: &'a Passage, origin: SearcherKind) -> Self {
    Self { passage, origin }
  }
}

/// A trait for plugins that gather candidate passages for a query.
///
/// The [`Matcher`](crate::engine::Matcher) runs its searchers in registration
/// order and concatenates their output before deduplicating, so the order a
/// searcher emits candidates in is significant: on equal scores, earlier
/// candidates rank first.
///
/// Searchers only gather. Scoring, deduplication and truncation belong to the
/// matcher, so a searcher may return the same passage several times and
/// should not apply limits of its own.
///
/// The `Send` and `Sync` bounds are required to allow one matcher to serve
/// concurrent callers.
pub trait CandidateSearcher: Send + Sync {
  /// Returns the `SearcherKind` of this searcher.
  ///
  /// Candidates are tagged with this kind; only [`SearcherKind::Topic`]
  /// candidates receive the topic-match boost.
  fn kind(&self) -> SearcherKind;

  /// Gathers candidates for `query` from `index`.
  fn search<'a>(&self, index: &'a dyn PassageIndex, query: &Query) -> Vec<Candidate<'a>>;
}
