//! Known incompatible package sets.

use crate::conflict::{Confidence, ConflictCandidate, ConflictType};
use crate::rules::rule::{ConflictRule, RuleContext, RuleId};
use crate::signal::ToolSignal;

/// Detects tools that pull in packages known to clash.
///
/// A package is provided by a tool whose canonical name is the package or
/// whose registry entry lists it.
pub struct DependencyClashRule;

fn provides(tool: &ToolSignal, package: &str, ctx: &RuleContext<'_>) -> bool {
    if tool.canonical_name.eq_ignore_ascii_case(package) {
        return true;
    }
    ctx.registry.get(&tool.canonical_name).is_some_and(|entry| {
        entry
            .package_names
            .iter()
            .any(|p| p.eq_ignore_ascii_case(package))
    })
}

impl ConflictRule for DependencyClashRule {
    fn id(&self) -> RuleId {
        RuleId::new("dependency-clash")
    }

    fn name(&self) -> &str {
        "Dependency Clash"
    }

    fn description(&self) -> &str {
        "Detects packages known to be incompatible when installed together"
    }

    fn check(&self, tools: &[ToolSignal], ctx: &RuleContext<'_>) -> Vec<ConflictCandidate> {
        let mut conflicts = Vec::new();

        for clash in &ctx.heuristics.dependency_conflicts {
            let mut involved: Vec<String> = Vec::new();
            let mut all_present = true;

            for package in &clash.packages {
                match tools.iter().find(|t| provides(t, package, ctx)) {
                    Some(tool) => {
                        if !involved.contains(&tool.canonical_name) {
                            involved.push(tool.canonical_name.clone());
                        }
                    }
                    None => {
                        all_present = false;
                        break;
                    }
                }
            }

            if !all_present || involved.len() < 2 {
                continue;
            }

            let mut candidate = ConflictCandidate::new(
                ConflictType::Dependency,
                clash.severity,
                involved,
                clash.description.clone(),
            )
            .with_issue(format!(
                "Installing {} together may break one of them",
                clash.packages.join(" and ")
            ))
            .with_confidence(Confidence::Medium);
            if let Some(mitigation) = &clash.mitigation {
                candidate = candidate.with_mitigation(mitigation.clone());
            }
            conflicts.push(candidate);
        }

        conflicts
    }
}
