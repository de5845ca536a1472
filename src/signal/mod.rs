//! Tool signals and the evidence they are built from.
//!
//! - [`ToolDescriptor`] - a tool as declared by the user
//! - [`EvidenceSource`] - raw extractor output
//! - [`ToolSignal`] - the merged per-tool record the rules consume
//! - [`aggregate`] - fuses the above into signals

pub mod aggregate;
pub mod evidence;
pub mod types;

pub use aggregate::{aggregate, Aggregator, DECLARED_METHOD, DYNAMIC_METHOD};
pub use evidence::{EvidenceKind, EvidenceRecord, EvidenceSource};
pub use types::{SignalStatus, ToolDescriptor, ToolSignal};

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PitfallError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorDocument {
    List(Vec<ToolDescriptor>),
    Wrapped { tools: Vec<ToolDescriptor> },
}

/// Parse tool descriptors from YAML or JSON text.
///
/// Accepts a bare list or a mapping with a `tools` list.
pub fn parse_descriptors(content: &str, path: &Path) -> Result<Vec<ToolDescriptor>> {
    let document: DescriptorDocument =
        serde_yaml::from_str(content).map_err(|e| PitfallError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(match document {
        DescriptorDocument::List(tools) | DescriptorDocument::Wrapped { tools } => tools,
    })
}

/// Load tool descriptors from a file.
pub fn load_descriptors(path: &Path) -> Result<Vec<ToolDescriptor>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PitfallError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PitfallError::Io(e)
        }
    })?;
    parse_descriptors(&content, path)
}
