//! Error types for corpus loading and matching.

use crate::types::{PassageId, TextField};
use thiserror::Error;

/// Errors raised by the corpus store and the matcher.
///
/// Loading errors (`InvalidPassage`, `UnsupportedDataset`, `Dataset`, `Io`)
/// only happen while the corpus is being built. Once a `CorpusStore` exists,
/// the only failures are caller mistakes and missing text fields.
#[derive(Debug, Error)]
pub enum Error {
  /// The caller passed an argument outside its valid range, e.g. a zero limit.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A passage has no text for the requested field.
  #[error("passage {passage} has no {field} text")]
  FieldUnavailable {
    /// The passage that was asked for the field.
    passage: PassageId,
    /// The field that is missing.
    field: TextField,
  },

  /// No passage with this id exists in the corpus.
  #[error("unknown passage id {0}")]
  UnknownPassage(PassageId),

  /// A dataset record failed validation.
  #[error("invalid passage '{reference}': {reason}")]
  InvalidPassage { reference: String, reason: String },

  /// The dataset declares a format version this crate does not understand.
  #[error("unsupported corpus dataset version {0}")]
  UnsupportedDataset(u32),

  #[error("malformed corpus dataset: {0}")]
  Dataset(#[from] serde_json::Error),

  #[error("failed to read corpus dataset: {0}")]
  Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from an upstream topic extractor.
///
/// These never reach the matcher: `extract_or_fallback` turns every variant
/// into the naive keyword fallback.
#[derive(Debug, Error)]
pub enum ExtractionError {
  #[error("topic extraction timed out after {0:?}")]
  Timeout(std::time::Duration),

  #[error("topic extraction request failed: {0}")]
  Request(String),

  #[error("topic extractor returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("topic extractor returned malformed output: {0}")]
  MalformedOutput(String),
}
