//! The versioned JSON dataset a corpus is loaded from.
//!
//! ```json
//! {
//!   "version": 1,
//!   "passages": [
//!     {
//!       "kind": "verse",
//!       "reference": "Ash-Sharh 94:5",
//!       "category": "patience & hardship",
//!       "texts": { "primary": "For indeed, with hardship comes ease.", "secondary": "..." },
//!       "topics": ["hardship", "ease", "patience"]
//!     }
//!   ]
//! }
//! ```

use crate::corpus::store::CorpusStore;
use crate::error::{Error, Result};
use crate::types::{PassageKind, TextField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The dataset format version this crate reads.
pub const DATASET_VERSION: u32 = 1;

/// The curated verse and hadith corpus shipped with the crate.
const BUNDLED_CORPUS: &str = include_str!("../../data/corpus.json");

/// One passage as it appears in the dataset, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageRecord {
  pub kind: PassageKind,
  pub reference: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub narrator: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  pub texts: BTreeMap<TextField, String>,
  #[serde(default)]
  pub topics: Vec<String>,
}

/// The top-level dataset document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusFile {
  pub version: u32,
  pub passages: Vec<PassageRecord>,
}

impl CorpusStore {
  /// Loads a store from a JSON dataset document.
  pub fn from_json(json: &str) -> Result<Self> {
    let file: CorpusFile = serde_json::from_str(json)?;
    if file.version != DATASET_VERSION {
      return Err(Error::UnsupportedDataset(file.version));
    }

    let store = Self::from_records(file.passages)?;
    tracing::info!(passages = store.iter().count(), "corpus loaded");
    Ok(store)
  }

  /// Loads a store from a JSON dataset file on disk.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let json = std::fs::read_to_string(path)?;
    Self::from_json(&json)
  }

  /// Loads the verse and hadith corpus bundled with the crate.
  pub fn bundled() -> Result<Self> {
    Self::from_json(BUNDLED_CORPUS)
  }
}
