//! Defines the `PassageIndex` trait the matcher reads the corpus through.

use crate::types::{FieldSelector, Passage, PassageId};

/// The read-only query surface of a passage corpus.
///
/// `PassageIndex` abstracts over where passages live so the matcher can rank
/// against any read-only collection. [`CorpusStore`](crate::corpus::CorpusStore)
/// is the in-memory implementation.
///
/// All methods are pure reads. Result lists are in stable corpus insertion
/// order and are never truncated; limits are applied by the caller.
///
/// The `Send` and `Sync` bounds are required so one index can serve
/// concurrent callers without locking.
pub trait PassageIndex: Send + Sync {
  /// Returns the number of passages in the index.
  fn len(&self) -> usize;

  /// Returns true when the index holds no passages.
  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Retrieves a passage by id.
  fn get(&self, id: PassageId) -> Option<&Passage>;

  /// Retrieves all passages in insertion order.
  fn all(&self) -> Vec<&Passage>;

  /// Finds passages with at least one topic tag containing `topic` as a
  /// case-insensitive substring.
  ///
  /// A query topic of `"patien"` matches the tag `"patience"`. Tags are
  /// language-independent, so no field selector is involved; the caller
  /// checks field availability afterwards.
  fn find_by_topic_substring(&self, topic: &str) -> Vec<&Passage>;

  /// Finds passages whose selected text field(s) contain `term` as a
  /// case-insensitive substring.
  ///
  /// With [`FieldSelector::Both`] a match in either field counts. Fields a
  /// passage does not have never match. Multi-word terms are matched as a
  /// literal phrase.
  fn find_by_text_substring(&self, term: &str, fields: FieldSelector) -> Vec<&Passage>;
}
