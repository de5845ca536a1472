//! Declarative heuristic tables.
//!
//! Keyword lists, framework hints, README keywords and category severities
//! live in
//! `data/heuristics.yml` so detection can be tuned without code changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::conflict::Severity;

/// All heuristic tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Heuristics {
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub dynamic: DynamicHeuristics,

    #[serde(default)]
    pub conflicts: ConflictHeuristics,

    #[serde(default)]
    pub readme: ReadmeHeuristics,
}

/// Tables driving the dynamic agent-framework detector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DynamicHeuristics {
    #[serde(default)]
    pub agent_keywords: Vec<String>,

    #[serde(default)]
    pub agent_file_keywords: Vec<String>,

    #[serde(default)]
    pub agent_file_extensions: Vec<String>,

    #[serde(default)]
    pub structure_config_extensions: Vec<String>,

    #[serde(default)]
    pub config_scan_extensions: Vec<String>,

    #[serde(default)]
    pub source_extensions: Vec<String>,

    #[serde(default)]
    pub import_keywords: Vec<String>,

    #[serde(default)]
    pub import_frameworks: Vec<ImportFramework>,

    #[serde(default)]
    pub config_keywords: Vec<String>,

    #[serde(default)]
    pub framework_hints: Vec<FrameworkHint>,

    #[serde(default)]
    pub directory_labels: Vec<DirectoryLabel>,

    #[serde(default)]
    pub project_name_keywords: Vec<String>,

    #[serde(default)]
    pub generic_search_terms: Vec<String>,

    #[serde(default)]
    pub directory_search_terms: Vec<DirectorySearchTerm>,

    #[serde(default)]
    pub skip_directories: Vec<String>,
}

/// A framework name recognised by a substring of an import path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportFramework {
    pub pattern: String,
    pub name: String,
}

/// A framework name hinted at by keywords in config contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkHint {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Generic framework label for a directory keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryLabel {
    pub keyword: String,
    pub label: String,
}

/// Extra search term emitted when a directory keyword was seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySearchTerm {
    pub keyword: String,
    pub term: String,
}

/// Keyword tables applied to README text. Keywords are lowercase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadmeHeuristics {
    #[serde(default)]
    pub category_keywords: Vec<CategoryKeywords>,

    /// Line keywords marking a section worth quoting in an excerpt.
    #[serde(default)]
    pub excerpt_keywords: Vec<String>,
}

/// Keywords implying a tool category. Multi-word keywords match as
/// phrases, single words only as whole words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: String,
    pub keywords: Vec<String>,
}

/// Tables driving the static conflict rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictHeuristics {
    #[serde(default)]
    pub category_severities: BTreeMap<String, Severity>,

    #[serde(default = "default_category_severity")]
    pub default_category_severity: Severity,

    #[serde(default)]
    pub category_descriptions: BTreeMap<String, String>,

    #[serde(default)]
    pub dependency_conflicts: Vec<DependencyConflict>,
}

fn default_category_severity() -> Severity {
    Severity::Low
}

impl Default for ConflictHeuristics {
    fn default() -> Self {
        Self {
            category_severities: BTreeMap::new(),
            default_category_severity: default_category_severity(),
            category_descriptions: BTreeMap::new(),
            dependency_conflicts: Vec::new(),
        }
    }
}

/// A set of packages known to clash when installed together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyConflict {
    pub packages: Vec<String>,
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub mitigation: Option<String>,
}

impl ConflictHeuristics {
    /// Overlap severity for a category.
    pub fn category_severity(&self, category: &str) -> Severity {
        self.category_severities
            .get(category)
            .copied()
            .unwrap_or(self.default_category_severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_severity_falls_back_to_default() {
        let yaml = r#"
category_severities:
  web-interface: high
"#;
        let tables: ConflictHeuristics = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tables.category_severity("web-interface"), Severity::High);
        assert_eq!(tables.category_severity("vector-db"), Severity::Low);
    }

    #[test]
    fn parse_framework_hints() {
        let yaml = r#"
framework_hints:
  - { name: crewai, keywords: [crew, crewai] }
"#;
        let tables: DynamicHeuristics = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tables.framework_hints[0].name, "crewai");
        assert_eq!(tables.framework_hints[0].keywords, ["crew", "crewai"]);
        assert!(tables.agent_keywords.is_empty());
    }

    #[test]
    fn readme_tables_default_to_empty() {
        let yaml = r#"
readme:
  excerpt_keywords: [install]
"#;
        let tables: Heuristics = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tables.readme.excerpt_keywords, ["install"]);
        assert!(tables.readme.category_keywords.is_empty());
    }
}
