//! Hikmah - topic and keyword relevance matching over a curated corpus of
//! Quran verses and hadiths.
//!
//! A [`Matcher`](engine::Matcher) gathers candidate passages by topic tag and
//! keyword, deduplicates them, scores them by capped keyword overlap and
//! returns the best few with the text fields the caller asked for. Free-text
//! prompts are turned into queries by a pluggable
//! [`TopicExtractor`](extract::TopicExtractor).

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod extract;
pub mod scoring;
pub mod searcher;
pub mod searchers;
pub mod types;

pub use error::{Error, Result};

pub mod prelude {
  //! Convenient re-exports for common types and traits.

  pub use crate::config::*;
  pub use crate::corpus::*;
  pub use crate::engine::*;
  pub use crate::error::{Error, ExtractionError};
  pub use crate::extract::*;
  pub use crate::scoring::*;
  pub use crate::searcher::*;
  pub use crate::searchers::*;
  pub use crate::types::*;
}
