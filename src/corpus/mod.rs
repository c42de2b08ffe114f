//! The corpus store: passages loaded once and read concurrently afterwards.

pub mod dataset;
pub mod index;
pub mod store;

pub use dataset::{CorpusFile, PassageRecord, DATASET_VERSION};
pub use index::PassageIndex;
pub use store::{CorpusBuilder, CorpusStore};
