//! Layered configuration.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//!
//! # Example
//!
//! ```
//! use pitfall::config::load_merged_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let config_dir = temp.path().join(".pitfall");
//! fs::create_dir_all(&config_dir).unwrap();
//! fs::write(config_dir.join("config.yml"), "limits:\n  max_depth: 3\n").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! assert_eq!(config.limits.max_depth, 3);
//! ```

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{
    load_config, load_config_value, load_merged_config, ConfigPaths, CONFIG_DIR, CONFIG_FILE,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{DetectionSettings, OutputSettings, PitfallConfig, ScanLimits};
