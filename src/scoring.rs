//! Keyword-overlap relevance scoring.
//!
//! A passage's score is the share of "keyword slots" it fills: every query
//! keyword contributes up to `occurrence_cap` occurrences, and the sum is
//! divided by `keywords * occurrence_cap`. Passages gathered through a topic
//! tag get a multiplicative boost, clamped to `1.0`.

/// A scorer for ranking passages by capped keyword occurrences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceScorer {
  /// The most occurrences a single keyword can contribute. Keeps one repeated
  /// trivial word from dominating the score. The default is 3.
  pub occurrence_cap: usize,
  /// Multiplier applied to topic-matched passages. The default is 1.2.
  pub topic_boost: f64,
}

impl Default for RelevanceScorer {
  fn default() -> Self {
    Self {
      occurrence_cap: 3,
      topic_boost: 1.2,
    }
  }
}

impl RelevanceScorer {
  /// Creates a `RelevanceScorer` with the default parameters.
  pub fn new() -> Self {
    Self::default()
  }

  /// Calculates the relevance of `text` to `keywords`, in `[0, 1]` and
  /// rounded to three decimals.
  ///
  /// Matching is case-insensitive and literal: a multi-word keyword only
  /// counts where the whole phrase appears. Every keyword counts toward the
  /// denominator, including ones that never occur.
  ///
  /// The arithmetic runs in `f64` and exact halves round to even, so
  /// 3 hits over 16 keywords (0.0625) score `0.062`.
  ///
  /// The topic boost multiplies the keyword score, so a topic-matched
  /// passage without any keyword overlap still scores `0.0`.
  pub fn calculate_relevance_score(&self, text: &str, keywords: &[String], topic_matched: bool) -> f32 {
    if keywords.is_empty() || text.is_empty() || self.occurrence_cap == 0 {
      return 0.0;
    }

    let text_lower = text.to_lowercase();
    let filled: usize = keywords
      .iter()
      .map(|keyword| self.capped_occurrences(&text_lower, keyword))
      .sum();

    let slots = keywords.len().saturating_mul(self.occurrence_cap);
    let mut score = filled as f64 / slots as f64;
    if topic_matched {
      score = (score * self.topic_boost).min(1.0);
    }

    round_score(score) as f32
  }

  /// Counts non-overlapping occurrences of `keyword` in already-lowercased
  /// text, capped at `occurrence_cap`.
  fn capped_occurrences(&self, text_lower: &str, keyword: &str) -> usize {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
      return 0;
    }
    text_lower.matches(needle.as_str()).count().min(self.occurrence_cap)
  }
}

/// Returns the keywords that occur in `text`, case-insensitively.
///
/// Query order is preserved and repeated keywords (ignoring case) are
/// reported once, with the spelling of their first occurrence.
pub fn get_matched_keywords(text: &str, keywords: &[String]) -> Vec<String> {
  let text_lower = text.to_lowercase();
  let mut seen: Vec<String> = Vec::new();
  let mut matched = Vec::new();

  for keyword in keywords {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() || seen.contains(&needle) {
      continue;
    }
    if text_lower.contains(&needle) {
      matched.push(keyword.clone());
    }
    seen.push(needle);
  }

  matched
}

/// Rounds a score to three decimal places, halves to even.
pub fn round_score(score: f64) -> f64 {
  (score * 1000.0).round_ties_even() / 1000.0
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kw(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
  }

  fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
  }

  #[test]
  fn test_single_occurrence_scores_a_third() {
    let scorer = RelevanceScorer::new();
    let score = scorer.calculate_relevance_score("With hardship comes ease", &kw(&["hardship"]), false);
    assert!(approx(score, 0.333));
  }

  #[test]
  fn test_topic_boost() {
    let scorer = RelevanceScorer::new();
    let score = scorer.calculate_relevance_score("With hardship comes ease", &kw(&["hardship"]), true);
    assert!(approx(score, 0.4));
  }

  #[test]
  fn test_occurrences_are_capped() {
    let scorer = RelevanceScorer::new();
    let text = "mercy mercy mercy mercy mercy";
    assert!(approx(scorer.calculate_relevance_score(text, &kw(&["mercy"]), false), 1.0));
    // Boost never pushes past 1.0.
    assert!(approx(scorer.calculate_relevance_score(text, &kw(&["MERCY"]), true), 1.0));
  }

  #[test]
  fn test_unmatched_keywords_count_in_denominator() {
    let scorer = RelevanceScorer::new();
    let score = scorer.calculate_relevance_score("Live with kindness", &kw(&["kindness", "marriage"]), false);
    assert!(approx(score, 0.167));
  }

  #[test]
  fn test_boost_of_zero_stays_zero() {
    let scorer = RelevanceScorer::new();
    assert_eq!(scorer.calculate_relevance_score("Live with kindness", &kw(&["debt"]), true), 0.0);
    assert_eq!(scorer.calculate_relevance_score("Live with kindness", &[], true), 0.0);
    assert_eq!(scorer.calculate_relevance_score("", &kw(&["debt"]), true), 0.0);
  }

  #[test]
  fn test_multi_word_keywords_are_literal() {
    let scorer = RelevanceScorer::new();
    let text = "a test through loss of wealth and lives";
    assert!(approx(scorer.calculate_relevance_score(text, &kw(&["loss of wealth"]), false), 0.333));
    assert_eq!(scorer.calculate_relevance_score(text, &kw(&["wealth loss"]), false), 0.0);
  }

  #[test]
  fn test_custom_parameters() {
    let scorer = RelevanceScorer {
      occurrence_cap: 1,
      topic_boost: 1.5,
    };
    let score = scorer.calculate_relevance_score("ease ease", &kw(&["ease", "hope"]), true);
    assert!(approx(score, 0.75));
  }

  #[test]
  fn test_matched_keywords_preserve_order_and_dedupe() {
    let text = "Indeed, with hardship comes ease.";
    let matched = get_matched_keywords(text, &kw(&["ease", "debt", "Hardship", "EASE", "hardship"]));
    assert_eq!(matched, vec!["ease", "Hardship"]);
  }

  #[test]
  fn test_matched_keywords_arabic() {
    let text = "فَإِنَّ مَعَ الْعُسْرِ يُسْرًا";
    assert_eq!(get_matched_keywords(text, &kw(&["الْعُسْرِ"])), vec!["الْعُسْرِ"]);
  }

  #[test]
  fn test_round_score() {
    assert_eq!(round_score(1.0 / 6.0), 0.167);
    assert_eq!(round_score(0.4 - 1e-7), 0.4);
    assert_eq!(round_score(0.0625), 0.062);
    assert_eq!(round_score(0.3125), 0.312);
  }

  #[test]
  fn test_exact_halves_round_to_even() {
    let scorer = RelevanceScorer::new();
    let keywords: Vec<String> = (0..16).map(|i| format!("k{i:02}")).collect();

    // 3 of 48 slots filled: 0.0625.
    assert!(approx(scorer.calculate_relevance_score("k00 k01 k02", &keywords, false), 0.062));
    // 15 of 48 slots filled: 0.3125.
    let text = "k00 k00 k00 k01 k01 k01 k02 k02 k02 k03 k03 k03 k04 k04 k04";
    assert!(approx(scorer.calculate_relevance_score(text, &keywords, false), 0.312));

    // 1 of 96 slots, boosted: 0.0125.
    let keywords: Vec<String> = (0..32).map(|i| format!("k{i:02}")).collect();
    assert!(approx(scorer.calculate_relevance_score("k31", &keywords, true), 0.012));
  }

  #[test]
  fn test_huge_cap_does_not_overflow() {
    let scorer = RelevanceScorer {
      occurrence_cap: usize::MAX,
      topic_boost: 1.2,
    };
    let score = scorer.calculate_relevance_score("mercy mercy", &kw(&["mercy", "hope"]), true);
    assert!((0.0..=1.0).contains(&score));
  }
}
