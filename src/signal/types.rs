//! Per-tool signal records.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How strongly a tool's presence is established.
///
/// Variants are ordered from least to most specific; merging keeps the
/// maximum.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    /// Named by the user but not observed.
    #[default]
    Declared,
    /// Referenced by a project file.
    Detected,
    /// Present in the installed package listing.
    Installed,
    /// Answering on one of its ports.
    Running,
    /// Its framework layout was found in the project.
    FrameworkDetected,
    /// Inferred by the dynamic agent-framework detector.
    AgentFrameworkDetected,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declared => "declared",
            Self::Detected => "detected",
            Self::Installed => "installed",
            Self::Running => "running",
            Self::FrameworkDetected => "framework_detected",
            Self::AgentFrameworkDetected => "agent_framework_detected",
        }
    }
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized evidence about one logical tool.
///
/// Built incrementally by the aggregator. Detection methods only grow and
/// status only becomes more specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolSignal {
    pub canonical_name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    pub declared_ports: BTreeSet<u16>,
    pub declared_env_vars: BTreeSet<String>,
    pub declared_categories: BTreeSet<String>,
    detection_methods: Vec<String>,
    confidence: f32,
    status: SignalStatus,
    pub versions: Vec<String>,
    pub observed_ports: Vec<u16>,
    pub locations: Vec<String>,
}

impl ToolSignal {
    /// Create an empty declared signal.
    pub fn new(canonical_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            display_name: display_name.into(),
            description: String::new(),
            readme: None,
            declared_ports: BTreeSet::new(),
            declared_env_vars: BTreeSet::new(),
            declared_categories: BTreeSet::new(),
            detection_methods: Vec::new(),
            confidence: 0.0,
            status: SignalStatus::Declared,
            versions: Vec::new(),
            observed_ports: Vec::new(),
            locations: Vec::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.declared_ports.insert(port);
        self
    }

    pub fn with_env_var(mut self, var: impl Into<String>) -> Self {
        self.declared_env_vars.insert(var.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.declared_categories.insert(category.into());
        self
    }

    pub fn detection_methods(&self) -> &[String] {
        &self.detection_methods
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn status(&self) -> SignalStatus {
        self.status
    }

    /// Record a detection method, ignoring repeats.
    pub fn add_detection_method(&mut self, method: impl Into<String>) {
        let method = method.into();
        if !self.detection_methods.contains(&method) {
            self.detection_methods.push(method);
        }
    }

    /// Raise the status if `status` is more specific.
    pub fn promote(&mut self, status: SignalStatus) {
        self.status = self.status.max(status);
    }

    /// Raise confidence to at least `confidence`, clamped to [0, 1].
    pub fn raise_confidence(&mut self, confidence: f32) {
        self.confidence = self.confidence.max(clamp_unit(confidence));
    }

    /// Overwrite confidence, clamped to [0, 1].
    pub fn set_confidence(&mut self, confidence: f32) {
        self.confidence = clamp_unit(confidence);
    }

    /// Declared and observed ports.
    pub fn ports(&self) -> BTreeSet<u16> {
        let mut ports = self.declared_ports.clone();
        ports.extend(self.observed_ports.iter().copied());
        ports
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A tool as described by the user or a metadata collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default)]
    pub ports: Vec<u16>,
    #[serde(default)]
    pub env_vars: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.ports.push(port);
        self
    }

    pub fn with_env_var(mut self, var: impl Into<String>) -> Self {
        self.env_vars.push(var.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_readme(mut self, readme: impl Into<String>) -> Self {
        self.readme = Some(readme.into());
        self
    }
}
