//! Prompt construction for the supplementary analysis.

use crate::extract::{excerpt, ReadmeMetadata};
use crate::registry::ReadmeHeuristics;
use crate::signal::ToolSignal;

/// System message to pair with [`build_prompt`].
pub const SYSTEM_PROMPT: &str =
    "You are an expert AI engineer specializing in tool integration and conflict analysis.";

const RESPONSE_SHAPE: &str = r#"{
    "conflicts": [
        {
            "type": "port_conflict|dependency_conflict|functionality_overlap|resource_competition|environment_conflict|config_conflict",
            "severity": "high|medium|low",
            "tools_involved": ["tool1", "tool2"],
            "description": "Clear description of the conflict",
            "potential_issues": "What could go wrong",
            "mitigation": "Suggested solution or workaround",
            "confidence": "high|medium|low"
        }
    ],
    "compatible_combinations": [
        {
            "tools": ["tool1", "tool2"],
            "reason": "Why these work well together"
        }
    ],
    "recommendations": [
        "General recommendations for using these tools together"
    ],
    "overall_assessment": "Summary assessment of the tool combination"
}"#;

const FOCUS: &str = "\
Focus on these types of conflicts:
1. **Port Conflicts**: Tools using same default ports
2. **Dependency Conflicts**: Version conflicts in Python packages or system dependencies
3. **Functionality Overlap**: Tools doing similar things that might interfere
4. **Resource Competition**: Memory, GPU, or model cache conflicts
5. **Environment Conflicts**: Same environment variables used differently
6. **Configuration Conflicts**: Config files or directories that clash

Be practical and specific. Only report conflicts that would actually cause problems for users.
If tools are compatible, mention that too. Provide actionable mitigation strategies.";

fn join<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    items
        .into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Summarize one tool for the prompt.
pub fn tool_summary(
    tool: &ToolSignal,
    excerpt_chars: usize,
    tables: &ReadmeHeuristics,
) -> String {
    let readme = tool.readme.as_deref().unwrap_or_default();
    let install_methods = ReadmeMetadata::extract(readme, tables).install_methods;

    format!(
        "Tool: {}\n\
         Description: {}\n\
         Categories: {}\n\
         Installation Methods: {}\n\
         Default Ports: [{}]\n\
         Environment Variables: [{}]\n\
         Key Documentation Excerpt:\n{}",
        tool.display_name,
        tool.description,
        join(&tool.declared_categories),
        join(&install_methods),
        join(tool.ports()),
        join(&tool.declared_env_vars),
        excerpt(readme, excerpt_chars, tables),
    )
}

/// Build the analysis prompt for a set of tools.
pub fn build_prompt(
    tools: &[ToolSignal],
    excerpt_chars: usize,
    tables: &ReadmeHeuristics,
) -> String {
    let sections = tools
        .iter()
        .enumerate()
        .map(|(i, tool)| {
            format!(
                "=== TOOL {} ===\n{}",
                i + 1,
                tool_summary(tool, excerpt_chars, tables)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an expert AI engineer analyzing potential conflicts between AI tools.\n\
         Analyze the following tools and identify potential conflicts when used together.\n\n\
         {}\n\n\
         Please analyze these tools for potential conflicts and provide a JSON response with the following structure:\n\n\
         {}\n\n\
         {}\n",
        sections, RESPONSE_SHAPE, FOCUS
    )
}
