//! Functional overlap detection by registry category.

use crate::conflict::{Confidence, ConflictCandidate, ConflictType};
use crate::rules::rule::{name_mentions, ConflictRule, RuleContext, RuleId};
use crate::signal::ToolSignal;

/// Detects several tools serving the same purpose.
///
/// Only categories with at least two registry tools are checked. A tool
/// belongs to a category when it declares it or its name mentions one of
/// the category's registry tools.
pub struct FunctionalOverlapRule;

impl ConflictRule for FunctionalOverlapRule {
    fn id(&self) -> RuleId {
        RuleId::new("functional-overlap")
    }

    fn name(&self) -> &str {
        "Functional Overlap"
    }

    fn description(&self) -> &str {
        "Detects multiple tools from the same category"
    }

    fn check(&self, tools: &[ToolSignal], ctx: &RuleContext<'_>) -> Vec<ConflictCandidate> {
        let mut conflicts = Vec::new();

        for (category, members) in ctx.registry.categories() {
            if members.len() < 2 {
                continue;
            }

            let matching: Vec<String> = tools
                .iter()
                .filter(|tool| {
                    tool.declared_categories.contains(category) || name_mentions(tool, members)
                })
                .map(|tool| tool.canonical_name.clone())
                .collect();

            if matching.len() < 2 {
                continue;
            }

            let description = ctx
                .heuristics
                .category_descriptions
                .get(category)
                .cloned()
                .unwrap_or_else(|| format!("Multiple {} tools may overlap", category));

            conflicts.push(
                ConflictCandidate::new(
                    ConflictType::FunctionalOverlap,
                    ctx.heuristics.category_severity(category),
                    matching,
                    description,
                )
                .with_issue("May cause resource competition or user confusion")
                .with_mitigation(
                    "Consider using only one tool from this category, or configure them carefully",
                )
                .with_confidence(Confidence::High),
            );
        }

        conflicts
    }
}
