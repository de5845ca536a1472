//! Conflict analysis over aggregated tool signals.

use crate::analysis::result::{AnalysisResult, AnalysisType};
use crate::conflict::{deduplicate, ConflictCandidate, ConflictType, Severity};
use crate::error::Result;
use crate::registry::{ConflictHeuristics, ToolRegistry};
use crate::rules::{RuleContext, RuleEngine};
use crate::signal::ToolSignal;
use crate::supplementary::SupplementaryAnalysis;

/// Minimum number of tools for a meaningful analysis.
pub const MIN_TOOLS: usize = 2;

/// Runs the rule engine, merges supplementary conflicts and deduplicates.
pub struct ConflictAnalyzer<'a> {
    registry: &'a ToolRegistry,
    heuristics: &'a ConflictHeuristics,
    engine: RuleEngine,
}

impl<'a> ConflictAnalyzer<'a> {
    /// Create an analyzer with the built-in rules.
    pub fn new(registry: &'a ToolRegistry, heuristics: &'a ConflictHeuristics) -> Self {
        Self {
            registry,
            heuristics,
            engine: RuleEngine::with_builtins(),
        }
    }

    /// Replace the rule engine.
    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Candidates from the built-in rules, in rule order.
    pub fn static_candidates(&self, tools: &[ToolSignal]) -> Vec<ConflictCandidate> {
        let ctx = RuleContext::new(self.registry, self.heuristics);
        self.engine.run(tools, &ctx)
    }

    /// Analyze `tools`.
    ///
    /// `supplementary` is the outcome of an optional free-text analysis:
    /// `None` when none was attempted, `Some(Err(_))` when it failed. A
    /// failure never prevents a result; it is recorded in `error`.
    pub fn analyze(
        &self,
        tools: &[ToolSignal],
        supplementary: Option<Result<SupplementaryAnalysis>>,
    ) -> AnalysisResult {
        let names: Vec<String> = tools.iter().map(|t| t.display_name.clone()).collect();

        if tools.len() < MIN_TOOLS {
            let mut result = AnalysisResult::new(AnalysisType::InsufficientTools, names);
            result.summary = "Need at least 2 tools to analyze conflicts".to_string();
            result.overall_assessment = "Not enough tools to compare".to_string();
            return result;
        }

        let static_candidates = self.static_candidates(tools);
        tracing::debug!(
            "Built-in rules produced {} candidate(s) for {} tools",
            static_candidates.len(),
            tools.len()
        );

        match supplementary {
            None => {
                let conflicts = deduplicate(static_candidates);
                let mut result =
                    AnalysisResult::new(AnalysisType::StaticOnly, names).with_conflicts(conflicts);
                result.summary = format!(
                    "Static analysis completed. {} conflicts detected using built-in rules.",
                    result.conflicts.len()
                );
                result.recommendations = recommendations(&result.conflicts);
                result.overall_assessment = assessment(&result.conflicts);
                result
            }
            Some(Ok(analysis)) => {
                let extra = analysis
                    .conflicts
                    .into_iter()
                    .map(|c| c.map_tools(|name| resolve_tool_name(name, tools)))
                    .filter(|c| {
                        let enough = c.tools_involved().len() >= MIN_TOOLS;
                        if !enough {
                            tracing::debug!(
                                "Dropping supplementary {} conflict naming fewer than {} tools",
                                c.conflict_type(),
                                MIN_TOOLS
                            );
                        }
                        enough
                    });
                let conflicts = deduplicate(static_candidates.into_iter().chain(extra));

                let mut result =
                    AnalysisResult::new(AnalysisType::Hybrid, names).with_conflicts(conflicts);
                result.summary = format!(
                    "Hybrid analysis completed. {} conflicts detected ({} from built-in rules, {} from supplementary analysis).",
                    result.conflicts.len(),
                    result.static_conflicts_count,
                    result.supplementary_conflicts_count
                );
                result.compatible_combinations = analysis.compatible_combinations;
                result.recommendations = if analysis.recommendations.is_empty() {
                    recommendations(&result.conflicts)
                } else {
                    analysis.recommendations
                };
                result.overall_assessment = analysis
                    .overall_assessment
                    .unwrap_or_else(|| assessment(&result.conflicts));
                result
            }
            Some(Err(e)) => {
                tracing::warn!("{}; using built-in rules only", e);
                let conflicts = deduplicate(static_candidates);
                let mut result = AnalysisResult::new(AnalysisType::StaticFallback, names)
                    .with_conflicts(conflicts);
                result.summary = format!(
                    "Supplementary analysis failed, using static rules only. {} conflicts detected.",
                    result.conflicts.len()
                );
                result.error = Some(e.to_string());
                result.recommendations = recommendations(&result.conflicts);
                result.overall_assessment =
                    "Basic conflict detection completed with static rules due to a supplementary analysis error"
                        .to_string();
                result
            }
        }
    }
}

/// Map a free-text tool name onto the analyzed tool it names.
fn resolve_tool_name(name: &str, tools: &[ToolSignal]) -> String {
    let trimmed = name.trim();
    tools
        .iter()
        .find(|t| {
            t.canonical_name.eq_ignore_ascii_case(trimmed)
                || t.display_name.eq_ignore_ascii_case(trimmed)
        })
        .map(|t| t.canonical_name.clone())
        .unwrap_or_else(|| trimmed.to_lowercase())
}

fn recommendations(conflicts: &[ConflictCandidate]) -> Vec<String> {
    if conflicts.is_empty() {
        return vec!["No conflicts detected by built-in rules; these tools should work together".to_string()];
    }

    let has = |t: ConflictType| conflicts.iter().any(|c| c.conflict_type() == t);
    let mut advice = Vec::new();
    if has(ConflictType::Port) {
        advice.push("Assign distinct ports to tools that run as servers".to_string());
    }
    if has(ConflictType::Environment) {
        advice.push(
            "Review shared environment variables such as API keys before running tools together"
                .to_string(),
        );
    }
    if has(ConflictType::FunctionalOverlap) {
        advice.push("Prefer one tool per category where possible".to_string());
    }
    if has(ConflictType::Dependency) {
        advice.push("Install conflicting packages in separate virtual environments".to_string());
    }
    if has(ConflictType::ResourceCompetition) || has(ConflictType::Config) {
        advice.push("Check GPU, cache and config directory usage of each tool".to_string());
    }
    advice
}

fn assessment(conflicts: &[ConflictCandidate]) -> String {
    if conflicts.iter().any(|c| c.severity() == Severity::High) {
        "High-severity conflicts found; resolve them before using these tools together".to_string()
    } else if conflicts.is_empty() {
        "No conflicts detected".to_string()
    } else {
        "Minor conflicts found; these tools can be used together with some configuration"
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{CandidateSource, Confidence};
    use crate::error::PitfallError;
    use crate::registry::Heuristics;
    use crate::supplementary::parse_response;

    struct Fixture {
        registry: ToolRegistry,
        heuristics: Heuristics,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: ToolRegistry::builtin().unwrap(),
                heuristics: Heuristics::builtin().unwrap(),
            }
        }

        fn analyzer(&self) -> ConflictAnalyzer<'_> {
            ConflictAnalyzer::new(&self.registry, &self.heuristics.conflicts)
        }
    }

    fn streamlit_pair() -> Vec<ToolSignal> {
        vec![
            ToolSignal::new("streamlit", "Streamlit").with_port(8501),
            ToolSignal::new("report-server", "report-server").with_port(8501),
        ]
    }

    #[test]
    fn single_tool_is_insufficient() {
        let fixture = Fixture::new();
        let tools = [ToolSignal::new("streamlit", "Streamlit").with_port(8501)];
        let result = fixture.analyzer().analyze(&tools, None);

        assert_eq!(result.analysis_type, AnalysisType::InsufficientTools);
        assert!(result.conflicts.is_empty());
        assert_eq!(result.summary, "Need at least 2 tools to analyze conflicts");
        assert_eq!(result.tool_count, 1);
    }

    #[test]
    fn static_only_run() {
        let fixture = Fixture::new();
        let result = fixture.analyzer().analyze(&streamlit_pair(), None);

        assert_eq!(result.analysis_type, AnalysisType::StaticOnly);
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].conflict_type(), ConflictType::Port);
        assert!(result.summary.contains("1 conflicts"));
        assert!(result.overall_assessment.starts_with("High-severity"));
        assert_eq!(
            result.recommendations,
            ["Assign distinct ports to tools that run as servers"]
        );
    }

    #[test]
    fn hybrid_prefers_static_duplicate() {
        let fixture = Fixture::new();
        let supplementary = SupplementaryAnalysis {
            conflicts: vec![
                ConflictCandidate::new(
                    ConflictType::Port,
                    Severity::Medium,
                    vec!["Report-Server".into(), "Streamlit".into()],
                    "Both bind 8501",
                )
                .with_source(CandidateSource::Llm)
                .with_confidence(Confidence::High),
                ConflictCandidate::new(
                    ConflictType::ResourceCompetition,
                    Severity::Low,
                    vec!["streamlit".into(), "report-server".into()],
                    "Both rerun on file changes",
                )
                .with_source(CandidateSource::Llm),
            ],
            overall_assessment: Some("Usable with care".into()),
            ..Default::default()
        };

        let result = fixture
            .analyzer()
            .analyze(&streamlit_pair(), Some(Ok(supplementary)));

        assert_eq!(result.analysis_type, AnalysisType::Hybrid);
        assert_eq!(result.conflicts.len(), 2);
        assert_eq!(result.conflicts[0].source(), CandidateSource::StaticRule);
        assert_eq!(result.static_conflicts_count, 1);
        assert_eq!(result.supplementary_conflicts_count, 1);
        assert_eq!(result.overall_assessment, "Usable with care");
    }

    #[test]
    fn failed_supplementary_falls_back() {
        let fixture = Fixture::new();
        let failure = Err(PitfallError::SupplementaryAnalysis {
            message: "response contains no JSON object".into(),
        });
        let result = fixture.analyzer().analyze(&streamlit_pair(), Some(failure));

        assert_eq!(result.analysis_type, AnalysisType::StaticFallback);
        assert_eq!(result.conflicts.len(), 1);
        assert!(result.error.as_deref().unwrap().contains("no JSON object"));
    }

    #[test]
    fn no_conflicts_is_reported_plainly() {
        let fixture = Fixture::new();
        let tools = [
            ToolSignal::new("tensorflow", "TensorFlow"),
            ToolSignal::new("requests", "requests"),
        ];
        let result = fixture.analyzer().analyze(&tools, None);
        assert!(result.conflicts.is_empty());
        assert_eq!(result.overall_assessment, "No conflicts detected");
    }

    #[test]
    fn hybrid_drops_conflicts_without_two_tools() {
        let fixture = Fixture::new();
        let supplementary = parse_response(
            r#"{"conflicts": [
                {"type": "config_conflict", "tools_involved": [], "confidence": "high"},
                {"type": "resource_competition", "tools_involved": ["Streamlit", "streamlit"]},
                {"type": "dependency_conflict", "tools_involved": ["Streamlit", "Report-Server"]}
            ]}"#,
        )
        .unwrap();

        let result = fixture
            .analyzer()
            .analyze(&streamlit_pair(), Some(Ok(supplementary)));

        assert_eq!(result.analysis_type, AnalysisType::Hybrid);
        assert!(result
            .conflicts
            .iter()
            .all(|c| c.tools_involved().len() >= MIN_TOOLS));
        assert_eq!(result.conflicts.len(), 2);
        assert_eq!(result.supplementary_conflicts_count, 1);
        assert!(result
            .conflicts
            .iter()
            .all(|c| c.conflict_type() != ConflictType::ResourceCompetition));
    }

    #[test]
    fn resolves_display_names() {
        let tools = streamlit_pair();
        assert_eq!(resolve_tool_name(" Streamlit ", &tools), "streamlit");
        assert_eq!(resolve_tool_name("Gradio", &tools), "gradio");
    }

    #[test]
    fn custom_engine_replaces_builtin_rules() {
        let fixture = Fixture::new();
        let result = fixture
            .analyzer()
            .with_engine(RuleEngine::new())
            .analyze(&streamlit_pair(), None);
        assert_eq!(result.analysis_type, AnalysisType::StaticOnly);
        assert!(result.conflicts.is_empty());
    }
}
