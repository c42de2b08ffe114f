//! A `CandidateSearcher` implementation for matching topic tags.

use crate::corpus::PassageIndex;
use crate::searcher::{Candidate, CandidateSearcher};
use crate::types::{Query, SearcherKind};

/// A searcher that gathers passages by topic-tag substring.
///
/// Each query topic is looked up in order with
/// [`PassageIndex::find_by_topic_substring`]; the hits of one topic are
/// emitted before those of the next. A passage tagged with several query
/// topics is emitted once per topic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicSearch;

impl TopicSearch {
  /// Creates a new `TopicSearch` instance.
  pub fn new() -> Self {
    Self
  }
}

impl CandidateSearcher for TopicSearch {
  fn kind(&self) -> SearcherKind {
    SearcherKind::Topic
  }

  fn search<'a>(&self, index: &'a dyn PassageIndex, query: &Query) -> Vec<Candidate<'a>> {
    query
      .topics
      .iter()
      .flat_map(|topic| index.find_by_topic_substring(topic))
      .map(|passage| Candidate::new(passage, SearcherKind::Topic))
      .collect()
  }
}
