//! README metadata extraction.
//!
//! Pulls install methods, ports, environment variables and coarse categories
//! out of free-form documentation, and builds the short excerpt used in
//! supplementary analysis prompts. Category and excerpt keywords come from
//! the `readme` section of the heuristic tables.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::registry::ReadmeHeuristics;

static PORT_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r":(\d{4,5})\b",
        r"(?i)port[:\s]+(\d{4,5})\b",
        r"(?i)localhost:(\d{4,5})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("port regex must compile"))
    .collect()
});

static ENV_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b([A-Z_][A-Z0-9_]*_API_KEY)\b",
        r"\b([A-Z_][A-Z0-9_]*_TOKEN)\b",
        r"export ([A-Z_][A-Z0-9_]*)",
        r"\$([A-Z_][A-Z0-9_]*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("env regex must compile"))
    .collect()
});

const MIN_PORT: u16 = 1000;

const EXCERPT_FOLLOW_LINES: usize = 10;
const EXCERPT_FALLBACK_LINES: usize = 20;

/// Metadata extracted from a README.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadmeMetadata {
    pub install_methods: Vec<String>,
    pub ports: BTreeSet<u16>,
    pub env_vars: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl ReadmeMetadata {
    /// Extract metadata from README text.
    pub fn extract(readme: &str, tables: &ReadmeHeuristics) -> Self {
        let mut metadata = Self::default();
        if readme.trim().is_empty() {
            return metadata;
        }

        let lower = readme.to_lowercase();
        for (method, marker) in [
            ("pip", "pip install"),
            ("conda", "conda install"),
            ("npm", "npm install"),
            ("docker", "docker"),
        ] {
            if lower.contains(marker) {
                metadata.install_methods.push(method.to_string());
            }
        }

        for re in PORT_REGEXES.iter() {
            for caps in re.captures_iter(readme) {
                if let Ok(port) = caps[1].parse::<u16>() {
                    if port >= MIN_PORT {
                        metadata.ports.insert(port);
                    }
                }
            }
        }

        for re in ENV_REGEXES.iter() {
            for caps in re.captures_iter(readme) {
                metadata.env_vars.insert(caps[1].to_string());
            }
        }

        let words: BTreeSet<&str> = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .filter(|w| !w.is_empty())
            .collect();
        for group in &tables.category_keywords {
            let hit = group.keywords.iter().any(|k| {
                if k.contains(' ') {
                    lower.contains(k.as_str())
                } else {
                    words.contains(k.as_str())
                }
            });
            if hit {
                metadata.categories.insert(group.category.clone());
            }
        }

        metadata
    }
}

/// Quote the parts of a README that matter for conflict analysis.
///
/// Lines containing a section keyword are kept together with the ten lines
/// after them. Without any such line the first twenty lines are used. The
/// result is cut at `max_chars` characters with `...` appended.
pub fn excerpt(readme: &str, max_chars: usize, tables: &ReadmeHeuristics) -> String {
    if readme.trim().is_empty() {
        return "No documentation available".to_string();
    }

    let lines: Vec<&str> = readme.lines().collect();
    let mut kept = Vec::new();
    let mut follow = 0;

    for line in &lines {
        let lower = line.to_lowercase();
        if tables
            .excerpt_keywords
            .iter()
            .any(|k| lower.contains(k.as_str()))
        {
            follow = EXCERPT_FOLLOW_LINES;
            kept.push(*line);
        } else if follow > 0 {
            kept.push(*line);
            follow -= 1;
        }
    }

    if kept.is_empty() {
        kept = lines.into_iter().take(EXCERPT_FALLBACK_LINES).collect();
    }

    let text = kept.join("\n");
    if text.chars().count() > max_chars {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        text
    }
}
