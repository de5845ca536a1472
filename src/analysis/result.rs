//! The terminal output of an analysis run.

use std::fmt;

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::conflict::{rank, CandidateSource, ConflictCandidate, Severity};
use crate::supplementary::CompatibleCombination;

/// How the conflict list was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Built-in rules only.
    StaticOnly,
    /// Built-in rules merged with a supplementary analysis.
    Hybrid,
    /// The supplementary analysis failed; built-in rules only.
    StaticFallback,
    /// Fewer than two tools; nothing was analyzed.
    InsufficientTools,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StaticOnly => "static_only",
            Self::Hybrid => "hybrid",
            Self::StaticFallback => "static_fallback",
            Self::InsufficientTools => "insufficient_tools",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of analyzing a set of tools for conflicts.
///
/// `conflicts` is in deduplicated first-seen order; use
/// [`ranked_conflicts`](Self::ranked_conflicts) for display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub conflicts: Vec<ConflictCandidate>,
    pub tool_count: usize,
    pub tools_analyzed: Vec<String>,
    pub summary: String,
    pub analysis_type: AnalysisType,
    pub static_conflicts_count: usize,
    pub supplementary_conflicts_count: usize,
    #[serde(default)]
    pub compatible_combinations: Vec<CompatibleCombination>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub overall_assessment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 timestamp.
    pub analyzed_at: String,
}

impl AnalysisResult {
    pub(crate) fn new(analysis_type: AnalysisType, tools_analyzed: Vec<String>) -> Self {
        Self {
            conflicts: Vec::new(),
            tool_count: tools_analyzed.len(),
            tools_analyzed,
            summary: String::new(),
            analysis_type,
            static_conflicts_count: 0,
            supplementary_conflicts_count: 0,
            compatible_combinations: Vec::new(),
            recommendations: Vec::new(),
            overall_assessment: String::new(),
            error: None,
            analyzed_at: Utc::now().to_rfc3339(),
        }
    }

    /// Attach conflicts and recount them by source.
    pub(crate) fn with_conflicts(mut self, conflicts: Vec<ConflictCandidate>) -> Self {
        self.static_conflicts_count = conflicts
            .iter()
            .filter(|c| c.source() == CandidateSource::StaticRule)
            .count();
        self.supplementary_conflicts_count = conflicts.len() - self.static_conflicts_count;
        self.conflicts = conflicts;
        self
    }

    /// Conflicts ordered most severe first.
    pub fn ranked_conflicts(&self) -> Vec<ConflictCandidate> {
        rank(&self.conflicts)
    }

    /// Number of conflicts with the given severity.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.conflicts
            .iter()
            .filter(|c| c.severity() == severity)
            .count()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}
