//! Installed-package listing extraction.
//!
//! Reads the JSON emitted by `pip list --format=json` and keeps the packages
//! that install a known tool.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{PitfallError, Result};
use crate::registry::ToolRegistry;
use crate::signal::{EvidenceKind, EvidenceRecord, EvidenceSource};

const ORIGIN: &str = "pip list";

/// Build evidence from a `pip list --format=json` document.
///
/// Entries without a string `name` are skipped. A document that is not a
/// JSON array is an error.
pub fn installed_packages(json: &str, registry: &ToolRegistry) -> Result<EvidenceSource> {
    let entries: Vec<Value> =
        serde_json::from_str(json).map_err(|e| PitfallError::EvidenceParseError {
            source_name: ORIGIN.to_string(),
            message: e.to_string(),
        })?;

    let mut source = EvidenceSource::new(EvidenceKind::InstalledPackages, ORIGIN);

    for entry in &entries {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            tracing::debug!("Skipping package entry without a name: {}", entry);
            continue;
        };

        let Some((tool, _)) = registry.by_package(name) else {
            continue;
        };

        let mut record = EvidenceRecord::for_tool(tool).with_method("pip_installed");
        if let Some(version) = entry.get("version").and_then(Value::as_str) {
            record = record.with_version(version);
        }
        if let Some(location) = entry.get("location").and_then(Value::as_str) {
            record = record.with_location(location);
        }
        source.insert(format!("package:{}", name.to_lowercase()), record);
    }

    tracing::debug!(
        "Matched {} of {} installed packages to known tools",
        source.len(),
        entries.len()
    );
    Ok(source)
}

/// Read a package listing from a file.
pub fn installed_packages_from_file(path: &Path, registry: &ToolRegistry) -> Result<EvidenceSource> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PitfallError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PitfallError::Io(e)
        }
    })?;
    installed_packages(&content, registry)
}
