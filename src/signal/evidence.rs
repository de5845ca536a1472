//! Raw evidence produced by extractors.
//!
//! An [`EvidenceSource`] is a map from an arbitrary detection key to an
//! [`EvidenceRecord`]. Records name their tool through `tool`, `name` or
//! `service`; a record naming none of them is malformed and skipped by the
//! aggregator.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PitfallError, Result};
use crate::signal::types::SignalStatus;

/// What kind of extractor produced a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    InstalledPackages,
    RunningServices,
    ProjectFiles,
    FrameworkStructure,
    Readme,
    #[default]
    Other,
}

impl EvidenceKind {
    /// Status implied by evidence of this kind.
    pub fn default_status(&self) -> SignalStatus {
        match self {
            Self::InstalledPackages => SignalStatus::Installed,
            Self::RunningServices => SignalStatus::Running,
            Self::ProjectFiles => SignalStatus::Detected,
            Self::FrameworkStructure => SignalStatus::FrameworkDetected,
            Self::Readme | Self::Other => SignalStatus::Declared,
        }
    }

    /// Confidence implied by evidence of this kind.
    pub fn default_confidence(&self) -> f32 {
        match self {
            Self::RunningServices => 0.95,
            Self::InstalledPackages => 0.9,
            Self::FrameworkStructure => 0.8,
            Self::ProjectFiles => 0.7,
            Self::Readme => 0.5,
            Self::Other => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InstalledPackages => "installed_packages",
            Self::RunningServices => "running_services",
            Self::ProjectFiles => "project_files",
            Self::FrameworkStructure => "framework_structure",
            Self::Readme => "readme",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of evidence about a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SignalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl EvidenceRecord {
    /// A record naming a tool directly.
    pub fn for_tool(tool: impl Into<String>) -> Self {
        Self {
            tool: Some(tool.into()),
            ..Default::default()
        }
    }

    /// A record naming a running service.
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.detection_method = Some(method.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.ports.push(port);
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// The name this record refers to: `tool`, then `name`, then `service`.
    ///
    /// Blank names count as missing.
    pub fn subject(&self) -> Option<&str> {
        [&self.tool, &self.name, &self.service]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }

    /// All ports named by this record.
    pub fn all_ports(&self) -> impl Iterator<Item = u16> + '_ {
        self.port.into_iter().chain(self.ports.iter().copied())
    }
}

/// Output of one extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSource {
    #[serde(default)]
    pub kind: EvidenceKind,
    /// Human-readable origin, e.g. `pip list` or a file path.
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub records: BTreeMap<String, EvidenceRecord>,
}

#[derive(Deserialize)]
struct RawEvidenceSource {
    #[serde(default)]
    kind: EvidenceKind,
    #[serde(default)]
    origin: String,
    #[serde(default)]
    records: BTreeMap<String, serde_json::Value>,
}

impl EvidenceSource {
    pub fn new(kind: EvidenceKind, origin: impl Into<String>) -> Self {
        Self {
            kind,
            origin: origin.into(),
            records: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, record: EvidenceRecord) {
        self.records.insert(key.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse a source from JSON text.
    ///
    /// A record that does not decode is skipped; only a document that is not
    /// an evidence source at all is an error.
    pub fn from_json(content: &str, origin: &str) -> Result<Self> {
        let raw: RawEvidenceSource =
            serde_json::from_str(content).map_err(|e| PitfallError::EvidenceParseError {
                source_name: origin.to_string(),
                message: e.to_string(),
            })?;

        let mut source = Self::new(
            raw.kind,
            if raw.origin.is_empty() {
                origin.to_string()
            } else {
                raw.origin
            },
        );

        for (key, value) in raw.records {
            match serde_json::from_value::<EvidenceRecord>(value) {
                Ok(record) => source.insert(key, record),
                Err(e) => tracing::debug!("Skipping malformed evidence record {}: {}", key, e),
            }
        }

        Ok(source)
    }

    /// Read a source from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PitfallError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PitfallError::Io(e)
            }
        })?;
        Self::from_json(&content, &path.display().to_string())
    }
}
