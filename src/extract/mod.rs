//! Turning a free-text prompt into topics and keywords.
//!
//! A [`TopicExtractor`] (usually a chat model) reads the prompt and proposes
//! topics and keywords. Extraction is best-effort: [`extract_or_fallback`]
//! never fails, and degrades to splitting the prompt on whitespace when no
//! extractor is configured, the call times out, or the output is unusable.

pub mod language;
#[cfg(feature = "http")]
pub mod http;

pub use language::{detect_language, Language};
#[cfg(feature = "http")]
pub use http::ChatExtractor;

use crate::error::ExtractionError;
use crate::types::{FieldSelector, Query};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Topics and keywords extracted from a prompt, plus the descriptive fields
/// the model reports alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicExtraction {
  #[serde(default)]
  pub topics: Vec<String>,
  #[serde(default)]
  pub keywords: Vec<String>,
  #[serde(default = "default_emotion")]
  pub emotion: String,
  #[serde(default)]
  pub summary: String,
  #[serde(default, alias = "prompt_language")]
  pub language: Language,
}

fn default_emotion() -> String {
  "neutral".to_string()
}

impl TopicExtraction {
  /// The extraction used when no model output is available: no topics, and
  /// the prompt's whitespace-separated words as keywords.
  pub fn fallback(text: &str) -> Self {
    Self {
      topics: Vec::new(),
      keywords: text.split_whitespace().map(str::to_string).collect(),
      emotion: default_emotion(),
      summary: text.to_string(),
      language: detect_language(text),
    }
  }

  /// Returns true when there are neither topics nor keywords.
  pub fn is_empty(&self) -> bool {
    self.topics.iter().all(|t| t.trim().is_empty()) && self.keywords.iter().all(|k| k.trim().is_empty())
  }

  /// Builds a normalized query over `fields`.
  pub fn to_query(&self, fields: FieldSelector) -> Query {
    Query::builder()
      .topics(&self.topics)
      .keywords(&self.keywords)
      .fields(fields)
      .build()
  }
}

/// A component that extracts topics and keywords from a prompt.
///
/// Implementations may be slow and fallible; callers go through
/// [`extract_or_fallback`], which bounds the call and substitutes the
/// keyword fallback on any error.
#[async_trait]
pub trait TopicExtractor: Send + Sync {
  async fn extract(&self, text: &str) -> Result<TopicExtraction, ExtractionError>;
}

/// Runs `extractor` on `text` within `timeout`.
///
/// Returns [`TopicExtraction::fallback`] when there is no extractor, when it
/// errors or times out, and when it produces neither topics nor keywords.
/// The detected prompt language is always recorded.
pub async fn extract_or_fallback(
  extractor: Option<&dyn TopicExtractor>,
  text: &str,
  timeout: Duration,
) -> TopicExtraction {
  let Some(extractor) = extractor else {
    tracing::debug!("no topic extractor configured, using keyword fallback");
    return TopicExtraction::fallback(text);
  };

  let outcome = match tokio::time::timeout(timeout, extractor.extract(text)).await {
    Ok(result) => result,
    Err(_) => Err(ExtractionError::Timeout(timeout)),
  };

  match outcome {
    Ok(extraction) if extraction.is_empty() => {
      tracing::warn!("topic extractor returned no topics or keywords, using keyword fallback");
      TopicExtraction::fallback(text)
    }
    Ok(mut extraction) => {
      extraction.language = detect_language(text);
      extraction
    }
    Err(err) => {
      tracing::warn!(error = %err, "topic extraction failed, using keyword fallback");
      TopicExtraction::fallback(text)
    }
  }
}

/// Parses a model reply into a `TopicExtraction`.
///
/// The JSON object is taken from the first `{` to the last `}`, so prose or
/// code fences around it are ignored. Missing fields take their defaults.
pub fn parse_extraction(content: &str) -> Result<TopicExtraction, ExtractionError> {
  let json = match (content.find('{'), content.rfind('}')) {
    (Some(start), Some(end)) if start < end => &content[start..=end],
    _ => {
      return Err(ExtractionError::MalformedOutput(
        "no JSON object in model output".to_string(),
      ))
    }
  };

  serde_json::from_str(json).map_err(|e| ExtractionError::MalformedOutput(e.to_string()))
}
