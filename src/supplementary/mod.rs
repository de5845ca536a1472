//! Supplementary free-text analysis.
//!
//! pitfall never calls a language model itself. It builds the prompt
//! ([`build_prompt`]) and parses whatever response the caller obtained
//! ([`parse_response`]). Parsed conflicts share [`ConflictCandidate`] with
//! the static rules and go through the same deduplication.
//!
//! [`ConflictCandidate`]: crate::conflict::ConflictCandidate

pub mod prompt;
pub mod response;

pub use prompt::{build_prompt, tool_summary, SYSTEM_PROMPT};
pub use response::{
    parse_response, parse_response_file, CompatibleCombination, SupplementaryAnalysis,
};
