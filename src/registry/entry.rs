//! Registry entry definitions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Top-level shape of a registry file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryManifest {
    /// Manifest version.
    #[serde(default = "default_manifest_version")]
    pub version: u32,

    /// Free-form description of the data set.
    #[serde(default)]
    pub description: Option<String>,

    /// Known tools keyed by canonical name.
    #[serde(default)]
    pub tools: BTreeMap<String, RegistryEntry>,
}

fn default_manifest_version() -> u32 {
    1
}

/// Known attributes of one tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Human-readable name.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Package names that install this tool.
    #[serde(default)]
    pub package_names: Vec<String>,

    /// Ports the tool binds unless told otherwise.
    #[serde(default)]
    pub default_ports: BTreeSet<u16>,

    /// Environment variables the tool reads.
    #[serde(default)]
    pub common_env_vars: BTreeSet<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub github_url: Option<String>,

    /// File-system markers left by the tool in a project.
    #[serde(default)]
    pub detection_patterns: Option<DetectionPatterns>,
}

/// File-system markers used for framework structure detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionPatterns {
    #[serde(default)]
    pub directories: Vec<String>,

    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub config_files: Vec<String>,
}

impl DetectionPatterns {
    /// Check if there is nothing to look for.
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty() && self.config_files.is_empty()
    }
}
