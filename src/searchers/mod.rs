//! Built-in `CandidateSearcher` implementations.
//!
//! A [`Matcher`](crate::engine::Matcher) built with
//! [`Matcher::builder`](crate::engine::Matcher::builder) registers both of
//! these, topics first:
//!
//! - [`TopicSearch`]: passages whose topic tags contain a query topic.
//! - [`KeywordSearch`]: passages whose selected text contains one of the
//!   leading query keywords.

/// Implements topic-tag candidate gathering.
pub mod topic;
/// Implements keyword-substring candidate gathering.
pub mod keyword;

pub use keyword::KeywordSearch;
pub use topic::TopicSearch;
