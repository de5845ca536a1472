//! Conflict candidates and their deduplication.
//!
//! - [`ConflictCandidate`] is the single record type produced by static rules
//!   and by the supplementary analysis
//! - [`deduplicate`] merges candidates by signature
//! - [`rank`] orders a deduplicated list for display

pub mod candidate;
pub mod dedup;

pub use candidate::{
    CandidateSource, Confidence, ConflictCandidate, ConflictType, Severity, Signature,
};
pub use dedup::{deduplicate, rank};
