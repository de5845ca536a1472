//! Conflict deduplication and ranking.
//!
//! Candidates from every source are merged in a single pass keyed by
//! [`Signature`]. The first occurrence of a signature fixes its position in
//! the output. A later duplicate replaces the kept entry when it comes from a
//! static rule, or when it has high confidence and the kept entry is not a
//! static rule. Among several static duplicates the last one is kept.

use std::collections::HashMap;

use super::candidate::{CandidateSource, Confidence, ConflictCandidate, Signature};

/// Remove duplicate conflicts, preserving first-seen order of signatures.
pub fn deduplicate<I>(candidates: I) -> Vec<ConflictCandidate>
where
    I: IntoIterator<Item = ConflictCandidate>,
{
    let mut unique: Vec<ConflictCandidate> = Vec::new();
    let mut positions: HashMap<Signature, usize> = HashMap::new();

    for candidate in candidates {
        let signature = candidate.signature();
        match positions.get(&signature) {
            Some(&index) => {
                if supersedes(&candidate, &unique[index]) {
                    tracing::debug!(
                        "Replacing duplicate {} conflict for {:?} with {} candidate",
                        signature.conflict_type,
                        signature.tools,
                        candidate.source()
                    );
                    unique[index] = candidate;
                }
            }
            None => {
                positions.insert(signature, unique.len());
                unique.push(candidate);
            }
        }
    }

    unique
}

fn supersedes(incoming: &ConflictCandidate, existing: &ConflictCandidate) -> bool {
    if incoming.source() == CandidateSource::StaticRule {
        return true;
    }
    incoming.confidence() == Confidence::High && existing.source() != CandidateSource::StaticRule
}

/// Order conflicts for display, most severe first.
///
/// The sort is stable, so conflicts of equal severity keep their
/// deduplicated order.
pub fn rank(conflicts: &[ConflictCandidate]) -> Vec<ConflictCandidate> {
    let mut ranked = conflicts.to_vec();
    ranked.sort_by_key(|c| c.severity().rank());
    ranked
}
