//! Ordered rule execution.
//!
//! The [`RuleEngine`] holds rules in registration order and concatenates
//! their output. Order matters: the deduplicator keeps the first position of
//! each signature, so built-in rules always run port, environment, overlap,
//! then dependency.

use crate::conflict::ConflictCandidate;
use crate::rules::dependency::DependencyClashRule;
use crate::rules::environment::SharedEnvironmentRule;
use crate::rules::overlap::FunctionalOverlapRule;
use crate::rules::port::PortCollisionRule;
use crate::rules::rule::{ConflictRule, RuleContext, RuleId};
use crate::signal::ToolSignal;

/// Ordered collection of conflict rules.
pub struct RuleEngine {
    rules: Vec<Box<dyn ConflictRule>>,
}

impl RuleEngine {
    /// Create an engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine with all built-in rules in their fixed order.
    pub fn with_builtins() -> Self {
        let mut engine = Self::new();
        engine.register(Box::new(PortCollisionRule));
        engine.register(Box::new(SharedEnvironmentRule));
        engine.register(Box::new(FunctionalOverlapRule));
        engine.register(Box::new(DependencyClashRule));
        engine
    }

    /// Append a rule; it runs after every rule already registered.
    pub fn register(&mut self, rule: Box<dyn ConflictRule>) {
        self.rules.push(rule);
    }

    /// Get a rule by ID.
    pub fn get(&self, id: &RuleId) -> Option<&dyn ConflictRule> {
        self.rules
            .iter()
            .find(|r| &r.id() == id)
            .map(|r| r.as_ref())
    }

    /// Iterate over rules in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ConflictRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule and concatenate the candidates.
    pub fn run(&self, tools: &[ToolSignal], ctx: &RuleContext<'_>) -> Vec<ConflictCandidate> {
        let mut candidates = Vec::new();
        for rule in &self.rules {
            let found = rule.check(tools, ctx);
            tracing::debug!("Rule {} found {} candidate(s)", rule.id(), found.len());
            candidates.extend(found);
        }
        candidates
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::ConflictType;
    use crate::registry::{Heuristics, ToolRegistry};

    #[test]
    fn builtins_run_in_fixed_order() {
        let engine = RuleEngine::with_builtins();
        let ids: Vec<String> = engine.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(
            ids,
            [
                "port-collision",
                "shared-environment",
                "functional-overlap",
                "dependency-clash"
            ]
        );
    }

    #[test]
    fn get_by_id() {
        let engine = RuleEngine::with_builtins();
        let rule = engine.get(&RuleId::new("functional-overlap")).unwrap();
        assert_eq!(rule.name(), "Functional Overlap");
        assert!(engine.get(&RuleId::new("missing")).is_none());
    }

    #[test]
    fn concatenates_in_rule_order() {
        let registry = ToolRegistry::builtin().unwrap();
        let heuristics = Heuristics::builtin().unwrap().conflicts;
        let ctx = RuleContext::new(&registry, &heuristics);
        let tools = [
            ToolSignal::new("streamlit", "Streamlit").with_port(8501),
            ToolSignal::new("gradio", "Gradio").with_port(8501),
        ];

        let types: Vec<ConflictType> = RuleEngine::with_builtins()
            .run(&tools, &ctx)
            .iter()
            .map(|c| c.conflict_type())
            .collect();
        assert_eq!(types, [ConflictType::Port, ConflictType::FunctionalOverlap]);
    }

    #[test]
    fn empty_engine_finds_nothing() {
        let registry = ToolRegistry::empty();
        let heuristics = Default::default();
        let ctx = RuleContext::new(&registry, &heuristics);
        let tools = [ToolSignal::new("a", "a"), ToolSignal::new("b", "b")];
        assert!(RuleEngine::new().run(&tools, &ctx).is_empty());
    }
}
