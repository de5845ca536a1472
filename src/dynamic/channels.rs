//! The three evidence channels of the agent-framework detector.
//!
//! Each channel scores its evidence in [0, 1]. Scores only grow with more
//! matches and are capped at 1.0.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dynamic::code::CodeExtractor;
use crate::dynamic::walk::{has_extension, lower_name, ProjectWalk};
use crate::registry::DynamicHeuristics;

const DIRECTORY_WEIGHT: f32 = 0.3;
const AGENT_FILE_WEIGHT: f32 = 0.2;
const CONFIG_FILE_WEIGHT: f32 = 0.1;

const IMPORT_WEIGHT: f32 = 0.2;
const CLASS_WEIGHT: f32 = 0.3;
const FUNCTION_WEIGHT: f32 = 0.2;
const KEYWORD_WEIGHT: f32 = 0.05;
const KEYWORD_BONUS_CAP: f32 = 0.3;
const KEYWORD_COUNT_CAP: usize = 10;

const AGENT_CONFIG_WEIGHT: f32 = 0.4;
const HINT_WEIGHT: f32 = 0.3;

fn capped(score: f32) -> f32 {
    score.clamp(0.0, 1.0)
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Agent-related names in the directory layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureAnalysis {
    pub agent_directories: Vec<String>,
    pub agent_files: Vec<String>,
    pub config_files: Vec<String>,
    pub score: f32,
}

impl StructureAnalysis {
    pub fn analyze(walk: &ProjectWalk, tables: &DynamicHeuristics) -> Self {
        let mut analysis = Self::default();

        for dir in &walk.directories {
            if contains_any(&lower_name(dir), &tables.agent_keywords) {
                analysis.agent_directories.push(display(dir));
            }
        }

        for file in &walk.files {
            if is_agent_file(file, tables) {
                analysis.agent_files.push(display(file));
            }
            if has_extension(file, &tables.structure_config_extensions) {
                analysis.config_files.push(display(file));
            }
        }

        analysis.score = capped(
            analysis.agent_directories.len() as f32 * DIRECTORY_WEIGHT
                + analysis.agent_files.len() as f32 * AGENT_FILE_WEIGHT
                + analysis.config_files.len() as f32 * CONFIG_FILE_WEIGHT,
        );
        analysis
    }
}

fn is_agent_file(path: &Path, tables: &DynamicHeuristics) -> bool {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    contains_any(&stem, &tables.agent_file_keywords)
        && has_extension(path, &tables.agent_file_extensions)
}

/// Agent-related symbols and keywords in source code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeAnalysis {
    pub files_scanned: usize,
    /// Agent imports in the order they were found.
    pub agent_imports: Vec<String>,
    pub agent_classes: BTreeSet<String>,
    pub agent_functions: BTreeSet<String>,
    /// Keyword occurrences, capped per file.
    pub agent_keywords: BTreeMap<String, usize>,
    pub score: f32,
}

impl CodeAnalysis {
    pub fn analyze(
        walk: &ProjectWalk,
        tables: &DynamicHeuristics,
        extractor: &mut dyn CodeExtractor,
        max_files: usize,
    ) -> Self {
        let mut analysis = Self::default();

        for relative in walk
            .files_with_extension(&tables.source_extensions)
            .take(max_files)
        {
            let Some(content) = read_lossy(&walk.root.join(relative)) else {
                continue;
            };
            analysis.files_scanned += 1;

            match extractor.extract(&content) {
                Ok(symbols) => {
                    for import in symbols.imports {
                        if contains_any(&import.to_lowercase(), &tables.import_keywords) {
                            analysis.agent_imports.push(import);
                        }
                    }
                    for class in symbols.classes {
                        if contains_any(&class.to_lowercase(), &tables.agent_keywords) {
                            analysis.agent_classes.insert(class);
                        }
                    }
                    for function in symbols.functions {
                        if contains_any(&function.to_lowercase(), &tables.agent_keywords) {
                            analysis.agent_functions.insert(function);
                        }
                    }
                }
                Err(e) => tracing::debug!("No symbols from {}: {}", relative.display(), e),
            }

            let lower = content.to_lowercase();
            for keyword in &tables.agent_keywords {
                let count = lower.matches(keyword.as_str()).count();
                if count > 0 {
                    *analysis.agent_keywords.entry(keyword.clone()).or_default() +=
                        count.min(KEYWORD_COUNT_CAP);
                }
            }
        }

        let distinct_imports: BTreeSet<&String> = analysis.agent_imports.iter().collect();
        let keyword_bonus =
            (analysis.agent_keywords.len() as f32 * KEYWORD_WEIGHT).min(KEYWORD_BONUS_CAP);
        analysis.score = capped(
            distinct_imports.len() as f32 * IMPORT_WEIGHT
                + analysis.agent_classes.len() as f32 * CLASS_WEIGHT
                + analysis.agent_functions.len() as f32 * FUNCTION_WEIGHT
                + keyword_bonus,
        );
        analysis
    }
}

/// Agent configuration and framework hints in config file contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigAnalysis {
    pub agent_configs: Vec<String>,
    /// One entry per file and hinted framework, in scan order.
    pub framework_hints: Vec<String>,
    pub score: f32,
}

impl ConfigAnalysis {
    pub fn analyze(walk: &ProjectWalk, tables: &DynamicHeuristics, max_files: usize) -> Self {
        let mut analysis = Self::default();

        for relative in walk
            .files_with_extension(&tables.config_scan_extensions)
            .take(max_files)
        {
            let Some(content) = read_lossy(&walk.root.join(relative)) else {
                continue;
            };
            let lower = content.to_lowercase();

            if contains_any(&lower, &tables.config_keywords) {
                analysis.agent_configs.push(display(relative));
            }
            for hint in &tables.framework_hints {
                if contains_any(&lower, &hint.keywords) {
                    analysis.framework_hints.push(hint.name.clone());
                }
            }
        }

        let distinct_hints: BTreeSet<&String> = analysis.framework_hints.iter().collect();
        analysis.score = capped(
            analysis.agent_configs.len() as f32 * AGENT_CONFIG_WEIGHT
                + distinct_hints.len() as f32 * HINT_WEIGHT,
        );
        analysis
    }

    /// Most frequent hint; ties go to the hint seen first.
    pub fn dominant_hint(&self) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for hint in &self.framework_hints {
            match counts.iter_mut().find(|(name, _)| *name == hint.as_str()) {
                Some((_, count)) => *count += 1,
                None => counts.push((hint.as_str(), 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (name, count) in counts {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((name, count));
            }
        }
        best.map(|(name, _)| name)
    }
}

fn read_lossy(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::debug!("Could not read {}: {}", path.display(), e);
            None
        }
    }
}
