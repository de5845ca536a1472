//! Configuration file discovery and loading.
//!
//! Layers are merged in this order, later overriding earlier:
//! 1. User config (`~/.pitfall/config.yml`)
//! 2. Project config (`.pitfall/config.yml`)
//!
//! Neither file is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::config::merger::merge_configs;
use crate::config::schema::PitfallConfig;
use crate::error::{PitfallError, Result};

/// Directory holding pitfall configuration.
pub const CONFIG_DIR: &str = ".pitfall";
/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// Existing configuration files in merge order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// `~/.pitfall/config.yml`
    pub user: Option<PathBuf>,
    /// `.pitfall/config.yml` in the project root
    pub project: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let user = dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE));
        Self::with_user_path(user, project_root)
    }

    fn with_user_path(user: Option<PathBuf>, project_root: &Path) -> Self {
        let project = project_root.join(CONFIG_DIR).join(CONFIG_FILE);
        Self {
            user: user.filter(|p| p.is_file()),
            project: Some(project).filter(|p| p.is_file()),
        }
    }

    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.user.iter().chain(self.project.iter()).collect()
    }
}

/// Read a config file as a raw YAML value for merging.
///
/// An empty file is an empty mapping.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PitfallError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PitfallError::Io(e)
        }
    })?;

    let value: Value = serde_yaml::from_str(&content).map_err(|e| PitfallError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(if value.is_null() {
        Value::Mapping(Default::default())
    } else {
        value
    })
}

fn load_paths(paths: &ConfigPaths, project_root: &Path) -> Result<PitfallConfig> {
    let mut layers = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!("Loading config layer {}", path.display());
        layers.push(load_config_value(path)?);
    }

    serde_yaml::from_value(merge_configs(&layers)).map_err(|e| PitfallError::ConfigParseError {
        path: project_root.join(CONFIG_DIR).join(CONFIG_FILE),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load and merge every config layer for a project.
///
/// Missing files yield the defaults.
pub fn load_merged_config(project_root: &Path) -> Result<PitfallConfig> {
    load_paths(&ConfigPaths::discover(project_root), project_root)
}

/// Load config with an optional path override.
///
/// An override is loaded alone, without merging, and must exist.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<PitfallConfig> {
    match config_override {
        Some(path) => {
            let value = load_config_value(path)?;
            serde_yaml::from_value(value).map_err(|e| PitfallError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        None => load_merged_config(project_root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OutputFormat;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join(CONFIG_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn discover_finds_project_config() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "output:\n  format: json\n");

        let paths = ConfigPaths::with_user_path(None, temp.path());
        assert!(paths.project.is_some());
        assert_eq!(paths.all_existing().len(), 1);
    }

    #[test]
    fn missing_files_give_defaults() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_user_path(Some(temp.path().join("nope.yml")), temp.path());
        assert!(paths.all_existing().is_empty());

        let config = load_paths(&paths, temp.path()).unwrap();
        assert_eq!(config, PitfallConfig::default());
    }

    #[test]
    fn project_layer_overrides_user_layer() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let user = write_config(
            home.path(),
            "output:\n  format: json\n  color: false\nlimits:\n  max_depth: 2\n",
        );
        write_config(project.path(), "limits:\n  max_depth: 5\n");

        let paths = ConfigPaths::with_user_path(Some(user), project.path());
        let config = load_paths(&paths, project.path()).unwrap();

        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color);
        assert_eq!(config.limits.max_depth, 5);
    }

    #[test]
    fn empty_file_is_valid() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "");
        let paths = ConfigPaths::with_user_path(None, temp.path());
        assert!(load_paths(&paths, temp.path()).is_ok());
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "limits: [unclosed\n");
        let err = load_config_value(&path).unwrap_err();
        assert!(matches!(err, PitfallError::ConfigParseError { .. }));
    }

    #[test]
    fn override_must_exist() {
        let temp = TempDir::new().unwrap();
        let err = load_config(temp.path(), Some(temp.path().join("custom.yml").as_path())).unwrap_err();
        assert!(matches!(err, PitfallError::ConfigNotFound { .. }));
    }

    #[test]
    fn override_skips_merging() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "limits:\n  max_depth: 5\n");
        let custom = temp.path().join("custom.yml");
        fs::write(&custom, "detection:\n  probe_services: true\n").unwrap();

        let config = load_config(temp.path(), Some(custom.as_path())).unwrap();
        assert!(config.detection.probe_services);
        assert_eq!(config.limits.max_depth, 8);
    }
}
