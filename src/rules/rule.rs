//! Conflict rule definitions.
//!
//! - [`ConflictRule`] - the trait every static rule implements
//! - [`RuleId`] - unique identifier for a rule
//! - [`RuleContext`] - read-only inputs shared by all rules

use crate::conflict::ConflictCandidate;
use crate::registry::{ConflictHeuristics, ToolRegistry};
use crate::signal::ToolSignal;

/// Unique identifier for a conflict rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleId(pub String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inputs every rule may consult besides the tool list.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub registry: &'a ToolRegistry,
    pub heuristics: &'a ConflictHeuristics,
}

impl<'a> RuleContext<'a> {
    pub fn new(registry: &'a ToolRegistry, heuristics: &'a ConflictHeuristics) -> Self {
        Self {
            registry,
            heuristics,
        }
    }
}

/// A static rule that finds conflicts among tools.
///
/// Rules see the full tool list in input order and return candidates tagged
/// as rule-derived. They never fail; a rule with nothing to report returns
/// an empty list.
pub trait ConflictRule: Send + Sync {
    /// Unique identifier for this rule.
    fn id(&self) -> RuleId;

    /// Human-readable name of the rule.
    fn name(&self) -> &str;

    /// Description of what this rule checks.
    fn description(&self) -> &str;

    fn check(&self, tools: &[ToolSignal], ctx: &RuleContext<'_>) -> Vec<ConflictCandidate>;
}

/// Whether a tool's canonical name contains any of `names`.
pub(crate) fn name_mentions(tool: &ToolSignal, names: &[String]) -> bool {
    names
        .iter()
        .any(|name| tool.canonical_name.contains(name.as_str()))
}
