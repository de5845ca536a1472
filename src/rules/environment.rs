//! Shared environment variable detection.
//!
//! Only variables read by two or more registry tools are considered. A tool
//! uses such a variable when it declares it or when its name mentions one of
//! the registry tools known to read it.

use crate::conflict::{Confidence, ConflictCandidate, ConflictType, Severity};
use crate::rules::rule::{name_mentions, ConflictRule, RuleContext, RuleId};
use crate::signal::ToolSignal;

/// Detects tools that read the same environment variable.
pub struct SharedEnvironmentRule;

impl ConflictRule for SharedEnvironmentRule {
    fn id(&self) -> RuleId {
        RuleId::new("shared-environment")
    }

    fn name(&self) -> &str {
        "Shared Environment Variable"
    }

    fn description(&self) -> &str {
        "Detects tools that may read the same environment variable"
    }

    fn check(&self, tools: &[ToolSignal], ctx: &RuleContext<'_>) -> Vec<ConflictCandidate> {
        let mut conflicts = Vec::new();

        for (var, users) in ctx.registry.shared_env_vars() {
            let matching: Vec<String> = tools
                .iter()
                .filter(|tool| tool.declared_env_vars.contains(var) || name_mentions(tool, users))
                .map(|tool| tool.canonical_name.clone())
                .collect();

            if matching.len() < 2 {
                continue;
            }

            conflicts.push(
                ConflictCandidate::new(
                    ConflictType::Environment,
                    Severity::Medium,
                    matching,
                    format!("Multiple tools may use environment variable {}", var),
                )
                .with_issue("Environment variable conflicts may cause authentication issues")
                .with_mitigation(format!(
                    "Ensure {} is set correctly for all tools that need it",
                    var
                ))
                .with_confidence(Confidence::Medium),
            );
        }

        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ConflictHeuristics, ToolRegistry};

    fn check(tools: &[ToolSignal]) -> Vec<ConflictCandidate> {
        let registry = ToolRegistry::builtin().unwrap();
        let heuristics = ConflictHeuristics::default();
        SharedEnvironmentRule.check(tools, &RuleContext::new(&registry, &heuristics))
    }

    #[test]
    fn declared_and_name_matched_tools_conflict() {
        let tools = [
            ToolSignal::new("openai-tool", "openai-tool").with_env_var("OPENAI_API_KEY"),
            ToolSignal::new("langchain", "LangChain"),
        ];
        let conflicts: Vec<_> = check(&tools)
            .into_iter()
            .filter(|c| c.description().contains("OPENAI_API_KEY"))
            .collect();

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type(), ConflictType::Environment);
        assert_eq!(conflicts[0].severity(), Severity::Medium);
        assert_eq!(conflicts[0].tools_involved(), ["openai-tool", "langchain"]);
    }

    #[test]
    fn unshared_variables_are_ignored() {
        let tools = [
            ToolSignal::new("a", "a").with_env_var("MY_APP_SECRET"),
            ToolSignal::new("b", "b").with_env_var("MY_APP_SECRET"),
        ];
        assert!(check(&tools).is_empty());
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let registry = ToolRegistry::empty();
        let heuristics = ConflictHeuristics::default();
        let tools = [
            ToolSignal::new("crewai", "crewai"),
            ToolSignal::new("autogen", "autogen"),
        ];
        let conflicts =
            SharedEnvironmentRule.check(&tools, &RuleContext::new(&registry, &heuristics));
        assert!(conflicts.is_empty());
    }
}
