//! Port collision detection.
//!
//! A tool's ports are its observed ports, declared ports and registry
//! defaults. The first tool to claim a port owns it; the first other tool
//! that claims it produces the only conflict reported for that port.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::conflict::{Confidence, ConflictCandidate, ConflictType, Severity};
use crate::rules::rule::{ConflictRule, RuleContext, RuleId};
use crate::signal::ToolSignal;

/// Detects tools that bind the same port.
pub struct PortCollisionRule;

impl PortCollisionRule {
    fn ports_of(tool: &ToolSignal, ctx: &RuleContext<'_>) -> BTreeSet<u16> {
        let mut ports = tool.ports();
        if let Some(entry) = ctx.registry.get(&tool.canonical_name) {
            ports.extend(entry.default_ports.iter().copied());
        }
        ports
    }
}

impl ConflictRule for PortCollisionRule {
    fn id(&self) -> RuleId {
        RuleId::new("port-collision")
    }

    fn name(&self) -> &str {
        "Port Collision"
    }

    fn description(&self) -> &str {
        "Detects tools that listen on the same port"
    }

    fn check(&self, tools: &[ToolSignal], ctx: &RuleContext<'_>) -> Vec<ConflictCandidate> {
        let mut conflicts = Vec::new();
        let mut claimants: HashMap<u16, &str> = HashMap::new();
        let mut reported: HashSet<u16> = HashSet::new();

        for tool in tools {
            for port in Self::ports_of(tool, ctx) {
                let Some(&owner) = claimants.get(&port) else {
                    claimants.insert(port, &tool.canonical_name);
                    continue;
                };
                if owner == tool.canonical_name || !reported.insert(port) {
                    continue;
                }

                conflicts.push(
                    ConflictCandidate::new(
                        ConflictType::Port,
                        Severity::High,
                        vec![owner.to_string(), tool.canonical_name.clone()],
                        format!("Both tools use port {}", port),
                    )
                    .with_issue(format!(
                        "Cannot run both tools simultaneously on port {}",
                        port
                    ))
                    .with_mitigation(format!(
                        "Configure one tool to use a different port (e.g., --port {})",
                        u32::from(port) + 1
                    ))
                    .with_confidence(Confidence::High),
                );
            }
        }

        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::CandidateSource;
    use crate::registry::{ConflictHeuristics, ToolRegistry};

    fn check(tools: &[ToolSignal]) -> Vec<ConflictCandidate> {
        let registry = ToolRegistry::builtin().unwrap();
        let heuristics = ConflictHeuristics::default();
        PortCollisionRule.check(tools, &RuleContext::new(&registry, &heuristics))
    }

    #[test]
    fn declared_port_collision() {
        let tools = [
            ToolSignal::new("streamlit", "Streamlit").with_port(8501),
            ToolSignal::new("custom-app", "custom-app").with_port(8501),
        ];
        let conflicts = check(&tools);

        assert_eq!(conflicts.len(), 1);
        let conflict = &conflicts[0];
        assert_eq!(conflict.conflict_type(), ConflictType::Port);
        assert_eq!(conflict.severity(), Severity::High);
        assert_eq!(conflict.confidence(), Confidence::High);
        assert_eq!(conflict.source(), CandidateSource::StaticRule);
        assert_eq!(conflict.tools_involved(), ["streamlit", "custom-app"]);
        assert!(conflict.description().contains("8501"));
        assert!(conflict.mitigation().contains("--port 8502"));
    }

    #[test]
    fn registry_defaults_count_as_ports() {
        let tools = [
            ToolSignal::new("streamlit", "Streamlit"),
            ToolSignal::new("gradio", "Gradio"),
        ];
        assert!(check(&tools).is_empty());

        let tools = [
            ToolSignal::new("streamlit", "Streamlit"),
            ToolSignal::new("gradio", "Gradio").with_port(8501),
        ];
        assert_eq!(check(&tools).len(), 1);
    }

    #[test]
    fn third_claimant_is_not_paired() {
        let tools = [
            ToolSignal::new("a", "a").with_port(9000),
            ToolSignal::new("b", "b").with_port(9000),
            ToolSignal::new("c", "c").with_port(9000),
        ];
        let conflicts = check(&tools);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].tools_involved(), ["a", "b"]);
    }

    #[test]
    fn observed_ports_count() {
        let mut running = ToolSignal::new("x", "x");
        running.observed_ports.push(9100);
        running.observed_ports.push(9100);
        let tools = [running, ToolSignal::new("y", "y").with_port(9100)];
        assert_eq!(check(&tools).len(), 1);
    }

    #[test]
    fn mitigation_does_not_overflow() {
        let tools = [
            ToolSignal::new("a", "a").with_port(u16::MAX),
            ToolSignal::new("b", "b").with_port(u16::MAX),
        ];
        assert!(check(&tools)[0].mitigation().contains("65536"));
    }
}
