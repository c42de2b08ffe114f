//! Runtime configuration for the matcher and the topic extractor.

use crate::scoring::RelevanceScorer;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for the extractor timeout, in seconds.
pub const MAX_EXTRACTOR_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub matcher: MatcherConfig,
  #[serde(default)]
  pub extractor: ExtractorConfig,
}

/// Tuning knobs for candidate gathering, scoring and result limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
  /// How many leading keywords are used for candidate gathering.
  pub keyword_fanout: usize,
  /// Occurrences a single keyword may contribute to a score.
  pub occurrence_cap: usize,
  /// Multiplier for topic-matched passages.
  pub topic_boost: f64,
  /// Results per collection in the blended answer flow.
  pub answer_limit: usize,
  /// Results for direct keyword search.
  pub search_limit: usize,
}

impl Default for MatcherConfig {
  fn default() -> Self {
    let scorer = RelevanceScorer::default();
    Self {
      keyword_fanout: 5,
      occurrence_cap: scorer.occurrence_cap,
      topic_boost: scorer.topic_boost,
      answer_limit: 3,
      search_limit: 5,
    }
  }
}

impl MatcherConfig {
  pub fn scorer(&self) -> RelevanceScorer {
    RelevanceScorer {
      occurrence_cap: self.occurrence_cap,
      topic_boost: self.topic_boost,
    }
  }
}

/// Connection settings for the chat-completions topic extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
  /// Base URL of an OpenAI-compatible API, without the `/chat/completions`
  /// suffix.
  pub base_url: String,
  pub api_key: Option<String>,
  pub model: String,
  /// Request timeout in seconds (capped at 30).
  pub timeout_secs: u64,
  pub temperature: f32,
  pub max_tokens: u32,
}

impl Default for ExtractorConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.deepseek.com/v1".to_string(),
      api_key: None,
      model: "deepseek-chat".to_string(),
      timeout_secs: 20,
      temperature: 0.7,
      max_tokens: 1000,
    }
  }
}

impl ExtractorConfig {
  /// The request timeout, clamped to `1..=30` seconds.
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs.clamp(1, MAX_EXTRACTOR_TIMEOUT_SECS))
  }
}

impl Config {
  /// Reads configuration from `HIKMAH_*` environment variables, falling back
  /// to defaults for anything unset or unparsable.
  pub fn from_env() -> Self {
    Self::from_vars(|key| std::env::var(key).ok())
  }

  /// Reads configuration through an arbitrary variable lookup.
  pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
    let mut config = Self::default();

    if let Some(v) = get("HIKMAH_KEYWORD_FANOUT").and_then(|v| v.parse().ok()) {
      config.matcher.keyword_fanout = v;
    }
    if let Some(v) = get("HIKMAH_ANSWER_LIMIT").and_then(|v| v.parse().ok()) {
      config.matcher.answer_limit = v;
    }
    if let Some(v) = get("HIKMAH_SEARCH_LIMIT").and_then(|v| v.parse().ok()) {
      config.matcher.search_limit = v;
    }

    if let Some(url) = get("HIKMAH_EXTRACTOR_BASE_URL") {
      config.extractor.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(key) = get("HIKMAH_EXTRACTOR_API_KEY") {
      config.extractor.api_key = Some(key);
    }
    if let Some(model) = get("HIKMAH_EXTRACTOR_MODEL") {
      config.extractor.model = model;
    }
    if let Some(v) = get("HIKMAH_EXTRACTOR_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
      config.extractor.timeout_secs = v.min(MAX_EXTRACTOR_TIMEOUT_SECS);
    }

    config
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.matcher.keyword_fanout, 5);
    assert_eq!(config.matcher.answer_limit, 3);
    assert_eq!(config.matcher.search_limit, 5);
    assert_eq!(config.matcher.scorer(), RelevanceScorer::default());
    assert_eq!(config.extractor.timeout(), Duration::from_secs(20));
  }

  #[test]
  fn test_from_vars() {
    let vars: HashMap<&str, &str> = [
      ("HIKMAH_SEARCH_LIMIT", "8"),
      ("HIKMAH_ANSWER_LIMIT", "not a number"),
      ("HIKMAH_EXTRACTOR_BASE_URL", "http://localhost:11434/v1/"),
      ("HIKMAH_EXTRACTOR_TIMEOUT_SECS", "120"),
    ]
    .into_iter()
    .collect();

    let config = Config::from_vars(|k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(config.matcher.search_limit, 8);
    assert_eq!(config.matcher.answer_limit, 3);
    assert_eq!(config.extractor.base_url, "http://localhost:11434/v1");
    assert_eq!(config.extractor.timeout_secs, 30);
  }

  #[test]
  fn test_timeout_is_clamped() {
    let config = ExtractorConfig {
      timeout_secs: 0,
      ..Default::default()
    };
    assert_eq!(config.timeout(), Duration::from_secs(1));
  }

  #[test]
  fn test_partial_json() {
    let config: Config = serde_json::from_str(r#"{ "matcher": { "search_limit": 10 } }"#).unwrap();
    assert_eq!(config.matcher.search_limit, 10);
    assert_eq!(config.matcher.keyword_fanout, 5);
    assert_eq!(config.extractor.model, "deepseek-chat");
  }
}
