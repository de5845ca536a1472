//! The conflict candidate shared by every conflict source.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Class of operational conflict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum ConflictType {
    /// Two tools bind the same network port.
    #[serde(rename = "port_conflict", alias = "port")]
    Port,
    /// Two packages are known to be incompatible.
    #[serde(rename = "dependency_conflict", alias = "dependency")]
    Dependency,
    /// Two tools solve the same problem.
    #[serde(rename = "functionality_overlap", alias = "functional_overlap")]
    FunctionalOverlap,
    /// Two tools compete for the same hardware or runtime resource.
    #[serde(rename = "resource_competition")]
    ResourceCompetition,
    /// Two tools read the same environment variable.
    #[serde(rename = "environment_conflict", alias = "environment")]
    Environment,
    /// Two tools fight over the same configuration file or setting.
    #[serde(rename = "config_conflict", alias = "config")]
    Config,
}

impl ConflictType {
    /// Wire name of this conflict type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Port => "port_conflict",
            Self::Dependency => "dependency_conflict",
            Self::FunctionalOverlap => "functionality_overlap",
            Self::ResourceCompetition => "resource_competition",
            Self::Environment => "environment_conflict",
            Self::Config => "config_conflict",
        }
    }

    /// Short label used in human output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Port => "port",
            Self::Dependency => "dependency",
            Self::FunctionalOverlap => "functional overlap",
            Self::ResourceCompetition => "resource competition",
            Self::Environment => "environment",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "port_conflict" | "port" => Ok(Self::Port),
            "dependency_conflict" | "dependency" => Ok(Self::Dependency),
            "functionality_overlap" | "functional_overlap" | "overlap" => {
                Ok(Self::FunctionalOverlap)
            }
            "resource_competition" | "resource" => Ok(Self::ResourceCompetition),
            "environment_conflict" | "environment" | "env" => Ok(Self::Environment),
            "config_conflict" | "config" => Ok(Self::Config),
            _ => Err(format!("unknown conflict type: {}", s)),
        }
    }
}

/// How bad a conflict is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    /// Sort key with the most severe first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "critical" => Ok(Self::High),
            "medium" | "moderate" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// How sure the producer of a candidate is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("unknown confidence: {}", s)),
        }
    }
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    StaticRule,
    Llm,
    AnalysisError,
}

impl CandidateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StaticRule => "static_rule",
            Self::Llm => "llm",
            Self::AnalysisError => "analysis_error",
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a conflict for deduplication: its type plus the sorted tools.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub conflict_type: ConflictType,
    pub tools: Vec<String>,
}

/// A single detected or suspected conflict between two or more tools.
///
/// Candidates are built once and never mutated. Static rules and the
/// supplementary analysis produce the same type, so deduplication treats
/// every source alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConflictCandidate {
    #[serde(rename = "type")]
    conflict_type: ConflictType,
    severity: Severity,
    tools_involved: Vec<String>,
    description: String,
    #[serde(default)]
    potential_issues: Vec<String>,
    #[serde(default)]
    mitigation: String,
    confidence: Confidence,
    source: CandidateSource,
}

impl ConflictCandidate {
    /// Create a candidate with medium confidence from a static rule.
    pub fn new(
        conflict_type: ConflictType,
        severity: Severity,
        tools_involved: Vec<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            conflict_type,
            severity,
            tools_involved,
            description: description.into(),
            potential_issues: Vec::new(),
            mitigation: String::new(),
            confidence: Confidence::Medium,
            source: CandidateSource::StaticRule,
        }
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.potential_issues.push(issue.into());
        self
    }

    pub fn with_mitigation(mut self, mitigation: impl Into<String>) -> Self {
        self.mitigation = mitigation.into();
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_source(mut self, source: CandidateSource) -> Self {
        self.source = source;
        self
    }

    /// Rewrite every tool name, e.g. into canonical form. Names that map
    /// onto one already seen are dropped, keeping first-seen order.
    pub fn map_tools<F>(mut self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let mut mapped: Vec<String> = Vec::with_capacity(self.tools_involved.len());
        for tool in &self.tools_involved {
            let name = f(tool);
            if !mapped.contains(&name) {
                mapped.push(name);
            }
        }
        self.tools_involved = mapped;
        self
    }

    pub fn conflict_type(&self) -> ConflictType {
        self.conflict_type
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn tools_involved(&self) -> &[String] {
        &self.tools_involved
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn potential_issues(&self) -> &[String] {
        &self.potential_issues
    }

    pub fn mitigation(&self) -> &str {
        &self.mitigation
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn source(&self) -> CandidateSource {
        self.source
    }

    /// Deduplication identity. Tool order does not matter.
    pub fn signature(&self) -> Signature {
        let mut tools = self.tools_involved.clone();
        tools.sort();
        Signature {
            conflict_type: self.conflict_type,
            tools,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(tools: &[&str]) -> ConflictCandidate {
        ConflictCandidate::new(
            ConflictType::Port,
            Severity::High,
            tools.iter().map(|t| t.to_string()).collect(),
            "Both tools use port 8501",
        )
    }

    #[test]
    fn signature_ignores_tool_order() {
        assert_eq!(
            candidate(&["streamlit", "gradio"]).signature(),
            candidate(&["gradio", "streamlit"]).signature()
        );
    }

    #[test]
    fn signature_distinguishes_types() {
        let env = ConflictCandidate::new(
            ConflictType::Environment,
            Severity::Medium,
            vec!["gradio".into(), "streamlit".into()],
            "shared var",
        );
        assert_ne!(env.signature(), candidate(&["gradio", "streamlit"]).signature());
    }

    #[test]
    fn map_tools_collapses_repeated_names() {
        let mapped = candidate(&["Streamlit", "Gradio", "streamlit"]).map_tools(|t| t.to_lowercase());
        assert_eq!(mapped.tools_involved(), ["streamlit", "gradio"]);
    }

    #[test]
    fn serializes_wire_type_names() {
        let json = serde_json::to_value(candidate(&["a", "b"])).unwrap();
        assert_eq!(json["type"], "port_conflict");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["source"], "static_rule");
    }

    #[test]
    fn deserializes_short_type_names() {
        let json = r#"{
            "type": "functional_overlap",
            "severity": "medium",
            "tools_involved": ["crewai", "autogen"],
            "description": "overlap",
            "confidence": "high",
            "source": "llm"
        }"#;
        let c: ConflictCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.conflict_type(), ConflictType::FunctionalOverlap);
        assert_eq!(c.source(), CandidateSource::Llm);
        assert!(c.potential_issues().is_empty());
    }

    #[test]
    fn conflict_type_from_str_accepts_variants() {
        assert_eq!("Port".parse::<ConflictType>().unwrap(), ConflictType::Port);
        assert_eq!(
            "functionality overlap".parse::<ConflictType>().unwrap(),
            ConflictType::FunctionalOverlap
        );
        assert_eq!(
            "environment_conflict".parse::<ConflictType>().unwrap(),
            ConflictType::Environment
        );
        assert!("weird".parse::<ConflictType>().is_err());
    }

    #[test]
    fn severity_rank_orders_high_first() {
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::Low.rank());
    }

    #[test]
    fn builder_sets_fields() {
        let c = candidate(&["a", "b"])
            .with_issue("cannot run both")
            .with_mitigation("use --port 8502")
            .with_confidence(Confidence::High)
            .with_source(CandidateSource::Llm);
        assert_eq!(c.potential_issues(), ["cannot run both"]);
        assert_eq!(c.mitigation(), "use --port 8502");
        assert_eq!(c.confidence(), Confidence::High);
        assert_eq!(c.source(), CandidateSource::Llm);
    }
}
