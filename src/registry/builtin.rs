//! Built-in registry data embedded at compile time.

use include_dir::{include_dir, Dir};

use crate::error::{PitfallError, Result};
use crate::registry::entry::RegistryManifest;
use crate::registry::heuristics::Heuristics;

/// Embedded data directory.
static DATA_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/data");

const REGISTRY_FILE: &str = "registry.yml";
const HEURISTICS_FILE: &str = "heuristics.yml";

/// Load the built-in tool registry manifest.
pub fn load_manifest() -> Result<RegistryManifest> {
    let content = embedded_file(REGISTRY_FILE)?;
    serde_yaml::from_str(content).map_err(|e| PitfallError::ConfigParseError {
        path: format!("data/{}", REGISTRY_FILE).into(),
        message: e.to_string(),
    })
}

/// Load the built-in heuristic tables.
pub fn load_heuristics() -> Result<Heuristics> {
    let content = embedded_file(HEURISTICS_FILE)?;
    serde_yaml::from_str(content).map_err(|e| PitfallError::ConfigParseError {
        path: format!("data/{}", HEURISTICS_FILE).into(),
        message: e.to_string(),
    })
}

fn embedded_file(name: &str) -> Result<&'static str> {
    let file = DATA_DIR
        .get_file(name)
        .ok_or_else(|| PitfallError::ConfigNotFound {
            path: format!("data/{}", name).into(),
        })?;

    file.contents_utf8()
        .ok_or_else(|| PitfallError::ConfigParseError {
            path: format!("data/{}", name).into(),
            message: "Invalid UTF-8".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_manifest_loads() {
        let manifest = load_manifest().unwrap();
        assert!(manifest.tools.contains_key("streamlit"));
        assert!(manifest.tools.contains_key("crewai"));
    }

    #[test]
    fn builtin_tools_have_names() {
        let manifest = load_manifest().unwrap();
        for (key, entry) in &manifest.tools {
            assert!(!entry.name.is_empty(), "{} has no display name", key);
        }
    }

    #[test]
    fn bmad_has_detection_patterns() {
        let manifest = load_manifest().unwrap();
        let patterns = manifest.tools["bmad"].detection_patterns.clone().unwrap();
        assert!(patterns.directories.contains(&".bmad-core".to_string()));
    }

    #[test]
    fn builtin_heuristics_load() {
        let heuristics = load_heuristics().unwrap();
        assert!(heuristics.dynamic.agent_keywords.contains(&"agent".to_string()));
        assert_eq!(heuristics.dynamic.framework_hints[0].name, "crewai");
        assert!(!heuristics.conflicts.dependency_conflicts.is_empty());
    }
}
