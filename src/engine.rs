//! The matcher that gathers, deduplicates, scores and ranks passages.

use crate::config::MatcherConfig;
use crate::corpus::{CorpusStore, PassageIndex};
use crate::error::{Error, Result};
use crate::extract::{extract_or_fallback, TopicExtraction, TopicExtractor};
use crate::scoring::{get_matched_keywords, RelevanceScorer};
use crate::searcher::{Candidate, CandidateSearcher};
use crate::searchers::{KeywordSearch, TopicSearch};
use crate::types::{FieldSelector, Passage, PassageId, PassageKind, Query, ScoredResult, SearcherKind};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The relevance matcher.
///
/// `Matcher` owns a shared, read-only [`PassageIndex`] and an ordered list of
/// [`CandidateSearcher`]s. It holds no mutable state, so one instance can
/// serve any number of concurrent callers.
///
/// Create a `Matcher` using [`Matcher::builder`] or [`Matcher::new`].
///
/// # Examples
///
/// ```rust
/// use hikmah::prelude::*;
///
/// let matcher = Matcher::new(CorpusStore::bundled().unwrap());
/// let query = Query::new(["patience"], ["hardship"]);
///
/// let results = matcher.retrieve_and_rank(&query, 3).unwrap();
/// assert!(results.len() <= 3);
/// for r in &results {
///     println!("{} ({})", r.passage.source().reference, r.relevance_score);
/// }
/// ```
pub struct Matcher {
  index: Arc<dyn PassageIndex>,
  searchers: Vec<Box<dyn CandidateSearcher>>,
  scorer: RelevanceScorer,
  config: MatcherConfig,
}

impl Matcher {
  /// Creates a `MatcherBuilder` over `index` with the default topic and
  /// keyword searchers registered.
  pub fn builder(index: Arc<dyn PassageIndex>) -> MatcherBuilder {
    MatcherBuilder::new(index)
  }

  /// Creates a matcher with the default searchers and configuration.
  pub fn new(store: CorpusStore) -> Self {
    Self::builder(Arc::new(store)).build()
  }

  pub fn index(&self) -> &dyn PassageIndex {
    self.index.as_ref()
  }

  pub fn config(&self) -> &MatcherConfig {
    &self.config
  }

  /// Retrieves the passages most relevant to `query`, best first.
  ///
  /// ## Pipeline
  ///
  /// 1.  **Validation**: a zero `limit` is rejected with
  ///     [`Error::InvalidArgument`].
  /// 2.  **Short-circuit**: a query without topics and keywords returns an
  ///     empty list without touching the index.
  /// 3.  **Gathering**: every registered searcher runs in registration order
  ///     (by default: topics, then the leading keywords).
  /// 4.  **Deduplication**: the first occurrence of each passage is kept.
  ///     Passages outside `query.collection` are dropped. A passage counts as
  ///     topic-matched if any topic candidate referenced it.
  /// 5.  **Field selection**: passages lacking a field named by
  ///     `query.fields` are excluded rather than served in another language.
  /// 6.  **Scoring**: capped keyword overlap against the scoring text, boosted
  ///     for topic matches, plus the list of matched keywords.
  /// 7.  **Ranking**: stable sort by score, descending; ties keep the
  ///     deduplicated order.
  /// 8.  **Truncation**: at most `limit` results are returned.
  pub fn retrieve_and_rank(&self, query: &Query, limit: usize) -> Result<Vec<ScoredResult<'_>>> {
    if limit == 0 {
      return Err(Error::InvalidArgument("limit must be greater than zero".to_string()));
    }

    if query.is_empty() {
      return Ok(Vec::new());
    }

    let candidates = self.gather(query);
    let unique = dedup_candidates(&candidates, query);
    tracing::debug!(
      candidates = candidates.len(),
      unique = unique.len(),
      "gathered candidates"
    );

    #[cfg(feature = "parallel")]
    let mut scored: Vec<ScoredResult<'_>> = unique
      .par_iter()
      .filter_map(|&(passage, topic_matched)| self.score(passage, topic_matched, query))
      .collect();

    #[cfg(not(feature = "parallel"))]
    let mut scored: Vec<ScoredResult<'_>> = unique
      .iter()
      .filter_map(|&(passage, topic_matched)| self.score(passage, topic_matched, query))
      .collect();

    // `sort_by` is stable, which keeps first-seen order on equal scores.
    scored.sort_by(|a, b| {
      b.relevance_score
        .partial_cmp(&a.relevance_score)
        .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);

    Ok(scored)
  }

  /// Ranks verses and hadiths separately for one query, `answer_limit`
  /// results each.
  pub fn guidance(&self, query: &Query) -> Result<Guidance<'_>> {
    let limit = self.config.answer_limit;
    Ok(Guidance {
      verses: self.retrieve_and_rank(&query.clone().within(PassageKind::Verse), limit)?,
      hadiths: self.retrieve_and_rank(&query.clone().within(PassageKind::Hadith), limit)?,
    })
  }

  /// Direct search over a comma-separated keyword list, returning up to
  /// `search_limit` results.
  pub fn keyword_search(
    &self,
    keywords: &str,
    fields: FieldSelector,
    collection: Option<PassageKind>,
  ) -> Result<Vec<ScoredResult<'_>>> {
    let mut query = Query::from_keyword_list(keywords).with_fields(fields);
    query.collection = collection;
    self.retrieve_and_rank(&query, self.config.search_limit)
  }

  /// Turns a free-text prompt into ranked guidance.
  ///
  /// The prompt goes through `extractor` (bounded by `timeout`) and, on any
  /// failure or when no extractor is given, through the whitespace-split
  /// fallback. The resulting query is ranked exactly like any other.
  pub async fn answer(
    &self,
    extractor: Option<&dyn TopicExtractor>,
    prompt: &str,
    fields: FieldSelector,
    timeout: Duration,
  ) -> Result<Answer<'_>> {
    let extraction = extract_or_fallback(extractor, prompt, timeout).await;
    let query = extraction.to_query(fields);
    let guidance = self.guidance(&query)?;
    Ok(Answer {
      extraction,
      guidance,
    })
  }

  fn gather<'a>(&'a self, query: &Query) -> Vec<Candidate<'a>> {
    let index = self.index.as_ref();
    let mut candidates = Vec::new();
    for searcher in &self.searchers {
      candidates.extend(searcher.search(index, query));
    }
    candidates
  }

  fn score<'a>(&self, passage: &'a Passage, topic_matched: bool, query: &Query) -> Option<ScoredResult<'a>> {
    let texts = match passage.select(query.fields) {
      Ok(texts) => texts,
      Err(err) => {
        tracing::debug!(passage = passage.id(), %err, "excluding candidate");
        return None;
      }
    };

    let text = texts.scoring_text();
    Some(ScoredResult {
      passage,
      texts,
      relevance_score: self
        .scorer
        .calculate_relevance_score(text, &query.keywords, topic_matched),
      matched_keywords: get_matched_keywords(text, &query.keywords),
      topic_matched,
    })
  }
}

/// Keeps the first occurrence of each passage admitted by the query, paired
/// with whether any topic candidate referenced it.
fn dedup_candidates<'a>(candidates: &[Candidate<'a>], query: &Query) -> Vec<(&'a Passage, bool)> {
  let topic_hits: HashSet<PassageId> = candidates
    .iter()
    .filter(|c| c.origin == SearcherKind::Topic)
    .map(|c| c.passage.id())
    .collect();

  let mut seen = HashSet::new();
  candidates
    .iter()
    .filter(|c| query.admits(c.passage))
    .filter(|c| seen.insert(c.passage.id()))
    .map(|c| (c.passage, topic_hits.contains(&c.passage.id())))
    .collect()
}

/// Verses and hadiths ranked for the same query.
#[derive(Debug, Clone, Serialize)]
pub struct Guidance<'a> {
  pub verses: Vec<ScoredResult<'a>>,
  pub hadiths: Vec<ScoredResult<'a>>,
}

/// The result of [`Matcher::answer`]: the query that was derived from the
/// prompt and the guidance ranked for it.
#[derive(Debug, Clone, Serialize)]
pub struct Answer<'a> {
  pub extraction: TopicExtraction,
  pub guidance: Guidance<'a>,
}

/// A builder for creating `Matcher` instances.
///
/// # Examples
///
/// ```
/// use hikmah::prelude::*;
/// use std::sync::Arc;
///
/// let store = Arc::new(CorpusStore::bundled().unwrap());
/// let config = MatcherConfig {
///     keyword_fanout: 3,
///     ..MatcherConfig::default()
/// };
///
/// let matcher = Matcher::builder(store)
///     .config(config)
///     .build();
///
/// let results = matcher
///     .retrieve_and_rank(&Query::from_keyword_list("mercy, forgiveness"), 5)
///     .unwrap();
/// assert!(!results.is_empty());
/// ```
pub struct MatcherBuilder {
  index: Arc<dyn PassageIndex>,
  searchers: Vec<Box<dyn CandidateSearcher>>,
  default_searchers: bool,
  config: MatcherConfig,
}

impl MatcherBuilder {
  /// Creates a builder with the default searchers enabled.
  pub fn new(index: Arc<dyn PassageIndex>) -> Self {
    Self {
      index,
      searchers: Vec::new(),
      default_searchers: true,
      config: MatcherConfig::default(),
    }
  }

  /// Appends a searcher. Custom searchers run after the default ones.
  pub fn with(mut self, searcher: Box<dyn CandidateSearcher>) -> Self {
    self.searchers.push(searcher);
    self
  }

  /// Disables the built-in topic and keyword searchers.
  pub fn without_default_searchers(mut self) -> Self {
    self.default_searchers = false;
    self
  }

  pub fn config(mut self, config: MatcherConfig) -> Self {
    self.config = config;
    self
  }

  /// Builds the `Matcher` with the configured components.
  pub fn build(self) -> Matcher {
    let mut searchers: Vec<Box<dyn CandidateSearcher>> = Vec::with_capacity(self.searchers.len() + 2);
    if self.default_searchers {
      searchers.push(Box::new(TopicSearch::new()));
      searchers.push(Box::new(
        KeywordSearch::new().with_fanout(self.config.keyword_fanout),
      ));
    }
    searchers.extend(self.searchers);

    Matcher {
      index: self.index,
      searchers,
      scorer: self.config.scorer(),
      config: self.config,
    }
  }
}
