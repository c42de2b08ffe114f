use hikmah::prelude::*;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

const WORDS: &[&str] = &["mercy", "patience", "hardship", "ease", "faith", "debt", "kindness", "hope"];
const TAGS: &[&str] = &["patience", "forgiveness", "family", "wealth", "gratitude"];

fn passage_strategy() -> impl Strategy<Value = PassageRecord> {
  (
    prop::collection::vec(prop::sample::select(WORDS), 1..12),
    prop::collection::vec(prop::sample::select(TAGS), 0..3),
    any::<bool>(),
  )
    .prop_map(|(words, tags, is_verse)| {
      let mut texts = BTreeMap::new();
      texts.insert(TextField::Primary, words.join(" "));
      PassageRecord {
        kind: if is_verse { PassageKind::Verse } else { PassageKind::Hadith },
        reference: String::new(),
        narrator: None,
        category: None,
        texts,
        topics: tags.iter().map(|t| t.to_string()).collect(),
      }
    })
}

fn query_strategy() -> impl Strategy<Value = Query> {
  (
    prop::collection::vec(prop::sample::select(TAGS), 0..3),
    prop::collection::vec(prop::sample::select(WORDS), 0..7),
  )
    .prop_map(|(topics, keywords)| Query::new(topics, keywords))
}

/// Passages any default searcher can gather for `query`.
fn gatherable(store: &CorpusStore, query: &Query) -> usize {
  store
    .iter()
    .filter(|p| {
      let text = p.text(TextField::Primary).unwrap_or("").to_lowercase();
      query.topics.iter().any(|t| p.topics().iter().any(|tag| tag.contains(t.as_str())))
        || query.keywords.iter().take(5).any(|k| text.contains(&k.to_lowercase()))
    })
    .count()
}

proptest! {
  #[test]
  fn ranking_invariants_hold(
    records in prop::collection::vec(passage_strategy(), 0..25),
    query in query_strategy(),
    limit in 1usize..8,
  ) {
    let store = CorpusStore::from_records(records).unwrap();
    let expected_len = gatherable(&store, &query).min(limit);
    let matcher = Matcher::new(store);

    let results = matcher.retrieve_and_rank(&query, limit).unwrap();
    prop_assert_eq!(results.len(), expected_len);

    let mut seen = HashSet::new();
    for r in &results {
      prop_assert!(seen.insert(r.id()), "duplicate passage {}", r.id());
      prop_assert!((0.0..=1.0).contains(&r.relevance_score));
      let scaled = r.relevance_score * 1000.0;
      prop_assert!((scaled - scaled.round()).abs() < 1e-3);
    }

    for pair in results.windows(2) {
      prop_assert!(pair[0].relevance_score >= pair[1].relevance_score);
    }
  }

  #[test]
  fn ranking_is_deterministic(
    records in prop::collection::vec(passage_strategy(), 0..25),
    query in query_strategy(),
  ) {
    let matcher = Matcher::new(CorpusStore::from_records(records).unwrap());
    let first: Vec<(PassageId, f32)> = matcher
      .retrieve_and_rank(&query, 5)
      .unwrap()
      .iter()
      .map(|r| (r.id(), r.relevance_score))
      .collect();
    let second: Vec<(PassageId, f32)> = matcher
      .retrieve_and_rank(&query, 5)
      .unwrap()
      .iter()
      .map(|r| (r.id(), r.relevance_score))
      .collect();
    prop_assert_eq!(first, second);
  }

  #[test]
  fn matched_keywords_are_faithful(
    records in prop::collection::vec(passage_strategy(), 1..25),
    query in query_strategy(),
  ) {
    let matcher = Matcher::new(CorpusStore::from_records(records).unwrap());
    for r in matcher.retrieve_and_rank(&query, 10).unwrap() {
      let text = r.passage.text(TextField::Primary).unwrap().to_lowercase();
      let mut seen = HashSet::new();
      let expected: Vec<String> = query
        .keywords
        .iter()
        .filter(|k| seen.insert(k.to_lowercase()))
        .filter(|k| text.contains(&k.to_lowercase()))
        .cloned()
        .collect();
      prop_assert_eq!(&r.matched_keywords, &expected);
    }
  }

  #[test]
  fn extra_occurrence_never_lowers_score(
    words in prop::collection::vec(prop::sample::select(WORDS), 0..10),
    keywords in prop::collection::vec(prop::sample::select(WORDS), 1..5),
    topic_matched in any::<bool>(),
  ) {
    let scorer = RelevanceScorer::new();
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
    let text = words.join(" ");
    let extended = format!("{text} {}", keywords[0]);

    let before = scorer.calculate_relevance_score(&text, &keywords, topic_matched);
    let after = scorer.calculate_relevance_score(&extended, &keywords, topic_matched);
    prop_assert!(after >= before);
  }

  #[test]
  fn empty_query_is_a_no_op(
    records in prop::collection::vec(passage_strategy(), 0..10),
    limit in 1usize..20,
  ) {
    let matcher = Matcher::new(CorpusStore::from_records(records).unwrap());
    prop_assert!(matcher.retrieve_and_rank(&Query::default(), limit).unwrap().is_empty());
  }
}
