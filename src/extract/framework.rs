//! Framework structure detection from registry detection patterns.
//!
//! A tool whose registry entry lists marker directories, files or config
//! files is reported when any marker exists in the project. Files and config
//! files are looked up in the project root and inside matched directories.

use std::path::Path;

use walkdir::WalkDir;

use crate::registry::{DetectionPatterns, ToolRegistry};
use crate::signal::{EvidenceKind, EvidenceRecord, EvidenceSource};

/// How deep to look for marker files inside a matched framework directory.
const MARKER_SEARCH_DEPTH: usize = 3;

/// Markers found for one tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameworkIndicators {
    pub directories: Vec<String>,
    pub files: Vec<String>,
    pub config_files: Vec<String>,
}

impl FrameworkIndicators {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty() && self.config_files.is_empty()
    }

    pub fn count(&self) -> usize {
        self.directories.len() + self.files.len() + self.config_files.len()
    }

    fn locations(&self) -> impl Iterator<Item = &String> {
        self.directories
            .iter()
            .chain(&self.files)
            .chain(&self.config_files)
    }
}

/// Find the markers of one tool under `root`.
pub fn find_indicators(root: &Path, patterns: &DetectionPatterns) -> FrameworkIndicators {
    let mut found = FrameworkIndicators::default();

    for dir in &patterns.directories {
        if root.join(dir).is_dir() {
            found.directories.push(dir.clone());
        }
    }

    for file in &patterns.files {
        if root.join(file).is_file() {
            found.files.push(file.clone());
        }
        for dir in &found.directories {
            let base = root.join(dir);
            let nested = WalkDir::new(&base)
                .min_depth(1)
                .max_depth(MARKER_SEARCH_DEPTH)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && e.file_name().to_string_lossy() == *file);
            for entry in nested {
                if let Ok(relative) = entry.path().strip_prefix(root) {
                    found.files.push(relative.display().to_string());
                }
            }
        }
    }

    for config in &patterns.config_files {
        if root.join(config).is_file() {
            found.config_files.push(config.clone());
        }
        for dir in &found.directories {
            if root.join(dir).join(config).is_file() {
                found.config_files.push(format!("{}/{}", dir, config));
            }
        }
    }

    found
}

/// Report every registry tool whose markers appear in the project.
pub fn detect_frameworks(root: &Path, registry: &ToolRegistry) -> EvidenceSource {
    let mut source =
        EvidenceSource::new(EvidenceKind::FrameworkStructure, root.display().to_string());

    for (tool, entry) in registry.iter() {
        let Some(patterns) = entry.detection_patterns.as_ref() else {
            continue;
        };
        if patterns.is_empty() {
            continue;
        }

        let found = find_indicators(root, patterns);
        if found.is_empty() {
            continue;
        }

        tracing::debug!("Framework markers for {}: {:?}", tool, found);
        let mut record = EvidenceRecord::for_tool(tool).with_method("framework_structure");
        record.location = found.locations().next().cloned();
        if let Some(category) = &entry.category {
            record.categories.push(category.clone());
        }
        source.insert(format!("framework:{}", tool), record);
    }

    source
}
