//! Parsing of supplementary analysis responses.
//!
//! Responses are free text that should contain one JSON object. The object
//! is taken from the first `{` to the last `}`. Conflict records without a
//! recognised `type` are dropped; missing fields get defaults.

use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::conflict::{CandidateSource, Confidence, ConflictCandidate, ConflictType, Severity};
use crate::error::{PitfallError, Result};

const DEFAULT_DESCRIPTION: &str = "Conflict detected";

/// Two or more tools reported as working well together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompatibleCombination {
    pub tools: Vec<String>,
    #[serde(default)]
    pub reason: String,
}

/// The usable content of a supplementary analysis response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplementaryAnalysis {
    pub conflicts: Vec<ConflictCandidate>,
    pub compatible_combinations: Vec<CompatibleCombination>,
    pub recommendations: Vec<String>,
    pub overall_assessment: Option<String>,
}

fn failure(message: impl Into<String>) -> PitfallError {
    PitfallError::SupplementaryAnalysis {
        message: message.into(),
    }
}

/// Parse a response text.
pub fn parse_response(text: &str) -> Result<SupplementaryAnalysis> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(failure("response contains no JSON object"));
    };
    if end < start {
        return Err(failure("response contains no JSON object"));
    }

    let value: Value = serde_json::from_str(&text[start..=end])
        .map_err(|e| failure(format!("invalid JSON in response: {}", e)))?;
    let Value::Object(object) = value else {
        return Err(failure("response JSON is not an object"));
    };

    let conflicts = match object.get("conflicts") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(record) => parse_conflict(record),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    let compatible_combinations = object
        .get("compatible_combinations")
        .cloned()
        .and_then(|v| serde_json::from_value::<Vec<CompatibleCombination>>(v).ok())
        .unwrap_or_default();

    Ok(SupplementaryAnalysis {
        conflicts,
        compatible_combinations,
        recommendations: string_list(object.get("recommendations")),
        overall_assessment: object
            .get("overall_assessment")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Read and parse a response saved to a file.
pub fn parse_response_file(path: &Path) -> Result<SupplementaryAnalysis> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PitfallError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PitfallError::Io(e)
        }
    })?;
    parse_response(&content)
}

fn parse_conflict(record: &Map<String, Value>) -> Option<ConflictCandidate> {
    let raw_type = record.get("type").and_then(Value::as_str)?;
    let conflict_type = match raw_type.parse::<ConflictType>() {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!("Dropping supplementary conflict: {}", e);
            return None;
        }
    };

    let field = |name: &str| record.get(name).and_then(Value::as_str);
    let severity = field("severity")
        .and_then(|s| s.parse::<Severity>().ok())
        .unwrap_or_default();
    let confidence = field("confidence")
        .and_then(|s| s.parse::<Confidence>().ok())
        .unwrap_or_default();
    let description = field("description")
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION);
    let source = match field("source") {
        Some("analysis_error") => CandidateSource::AnalysisError,
        _ => CandidateSource::Llm,
    };

    let mut candidate = ConflictCandidate::new(
        conflict_type,
        severity,
        string_list(record.get("tools_involved")),
        description,
    )
    .with_confidence(confidence)
    .with_source(source);

    for issue in string_list(record.get("potential_issues")) {
        candidate = candidate.with_issue(issue);
    }
    if let Some(mitigation) = field("mitigation") {
        candidate = candidate.with_mitigation(mitigation);
    }
    Some(candidate)
}

/// A string or list of strings as a list; anything else is empty.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_from_surrounding_text() {
        let text = r#"Here is my analysis:
{
  "conflicts": [
    {
      "type": "port_conflict",
      "severity": "high",
      "tools_involved": ["streamlit", "gradio"],
      "description": "Both default to web ports",
      "potential_issues": "Second server fails to bind",
      "mitigation": "Pick another port",
      "confidence": "high"
    }
  ],
  "recommendations": ["Run one UI at a time"],
  "overall_assessment": "Mostly compatible"
}
Hope this helps."#;

        let analysis = parse_response(text).unwrap();
        assert_eq!(analysis.conflicts.len(), 1);
        let conflict = &analysis.conflicts[0];
        assert_eq!(conflict.conflict_type(), ConflictType::Port);
        assert_eq!(conflict.source(), CandidateSource::Llm);
        assert_eq!(conflict.confidence(), Confidence::High);
        assert_eq!(conflict.potential_issues(), ["Second server fails to bind"]);
        assert_eq!(analysis.recommendations, ["Run one UI at a time"]);
        assert_eq!(analysis.overall_assessment.as_deref(), Some("Mostly compatible"));
    }

    #[test]
    fn applies_defaults_and_drops_untyped() {
        let text = r#"{"conflicts": [
            {"type": "environment_conflict", "tools_involved": ["a", "b"]},
            {"severity": "high", "tools_involved": ["a", "b"]},
            {"type": "not_a_kind", "tools_involved": ["a", "b"]},
            "garbage"
        ]}"#;

        let analysis = parse_response(text).unwrap();
        assert_eq!(analysis.conflicts.len(), 1);
        let conflict = &analysis.conflicts[0];
        assert_eq!(conflict.severity(), Severity::Medium);
        assert_eq!(conflict.confidence(), Confidence::Medium);
        assert_eq!(conflict.description(), "Conflict detected");
        assert!(conflict.mitigation().is_empty());
        assert!(analysis.recommendations.is_empty());
        assert!(analysis.overall_assessment.is_none());
    }

    #[test]
    fn claimed_static_source_is_downgraded() {
        let text = r#"{"conflicts": [
            {"type": "port", "tools_involved": ["a", "b"], "source": "static_rule"},
            {"type": "config", "tools_involved": ["a", "b"], "source": "analysis_error"}
        ]}"#;
        let analysis = parse_response(text).unwrap();
        assert_eq!(analysis.conflicts[0].source(), CandidateSource::Llm);
        assert_eq!(analysis.conflicts[1].source(), CandidateSource::AnalysisError);
    }

    #[test]
    fn parses_compatible_combinations() {
        let text = r#"{"compatible_combinations": [{"tools": ["ollama", "langchain"], "reason": "LangChain has an Ollama client"}]}"#;
        let analysis = parse_response(text).unwrap();
        assert_eq!(analysis.compatible_combinations.len(), 1);
        assert_eq!(analysis.compatible_combinations[0].tools, ["ollama", "langchain"]);
    }

    #[test]
    fn rejects_text_without_json() {
        let err = parse_response("I could not analyze these tools.").unwrap_err();
        assert!(matches!(err, PitfallError::SupplementaryAnalysis { .. }));
        assert!(parse_response("} backwards {").is_err());
        assert!(parse_response("{ not json }").is_err());
    }
}
