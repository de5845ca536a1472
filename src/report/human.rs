//! Human-readable output formatter.
//!
//! Formats an analysis result for terminal display with optional color.

use std::io::Write;

use console::Style;

use super::ReportFormatter;
use crate::analysis::{AnalysisResult, AnalysisType};
use crate::conflict::Severity;

/// Formats analysis results for human consumption.
pub struct HumanFormatter {
    /// Whether to use colors (ANSI escape codes).
    pub use_color: bool,
}

impl HumanFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.use_color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn severity_style(severity: Severity) -> Style {
        match severity {
            Severity::High => Style::new().red().bold(),
            Severity::Medium => Style::new().yellow(),
            Severity::Low => Style::new().dim(),
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
        writeln!(
            writer,
            "{} ({} tools, {})",
            self.paint("Conflict analysis", Style::new().bold()),
            result.tool_count,
            result.analysis_type
        )?;
        if !result.tools_analyzed.is_empty() {
            writeln!(writer, "  tools: {}", result.tools_analyzed.join(", "))?;
        }
        writeln!(writer)?;

        for conflict in result.ranked_conflicts() {
            // Header line: high[port_conflict]: description
            let severity = conflict.severity();
            writeln!(
                writer,
                "{}[{}]: {}",
                self.paint(severity.as_str(), Self::severity_style(severity)),
                conflict.conflict_type(),
                conflict.description()
            )?;
            writeln!(
                writer,
                "  --> {} ({} confidence, {})",
                conflict.tools_involved().join(", "),
                conflict.confidence(),
                conflict.source()
            )?;
            for issue in conflict.potential_issues() {
                writeln!(writer, "   = note: {}", issue)?;
            }
            if !conflict.mitigation().is_empty() {
                writeln!(writer, "   = help: {}", conflict.mitigation())?;
            }
            writeln!(writer)?;
        }

        if !result.compatible_combinations.is_empty() {
            writeln!(writer, "Compatible combinations:")?;
            for combo in &result.compatible_combinations {
                if combo.reason.is_empty() {
                    writeln!(writer, "  - {}", combo.tools.join(" + "))?;
                } else {
                    writeln!(writer, "  - {}: {}", combo.tools.join(" + "), combo.reason)?;
                }
            }
            writeln!(writer)?;
        }

        if !result.recommendations.is_empty() {
            writeln!(writer, "Recommendations:")?;
            for rec in &result.recommendations {
                writeln!(writer, "  - {}", rec)?;
            }
            writeln!(writer)?;
        }

        if let Some(error) = &result.error {
            writeln!(
                writer,
                "{} {}",
                self.paint("warning:", Style::new().yellow()),
                error
            )?;
        }

        writeln!(writer, "{}", result.summary)?;
        if result.analysis_type != AnalysisType::InsufficientTools && result.has_conflicts() {
            writeln!(
                writer,
                "Found {} high, {} medium and {} low severity conflict(s)",
                result.count_by_severity(Severity::High),
                result.count_by_severity(Severity::Medium),
                result.count_by_severity(Severity::Low)
            )?;
        }
        if !result.overall_assessment.is_empty() {
            writeln!(writer, "{}", result.overall_assessment)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ConflictAnalyzer;
    use crate::error::PitfallError;
    use crate::registry::{Heuristics, ToolRegistry};
    use crate::signal::ToolSignal;

    fn render(tools: &[ToolSignal], fail_supplementary: bool) -> String {
        let registry = ToolRegistry::builtin().unwrap();
        let heuristics = Heuristics::builtin().unwrap();
        let supplementary = fail_supplementary.then(|| {
            Err(PitfallError::SupplementaryAnalysis {
                message: "timed out".into(),
            })
        });
        let result =
            ConflictAnalyzer::new(&registry, &heuristics.conflicts).analyze(tools, supplementary);

        let mut output = Vec::new();
        HumanFormatter::new(false)
            .format(&result, &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn port_pair() -> Vec<ToolSignal> {
        vec![
            ToolSignal::new("streamlit", "Streamlit").with_port(8501),
            ToolSignal::new("report-server", "report-server").with_port(8501),
        ]
    }

    #[test]
    fn formats_conflict_block() {
        let output = render(&port_pair(), false);
        assert!(output.contains("high[port_conflict]: Both tools use port 8501"));
        assert!(output.contains("--> streamlit, report-server"));
        assert!(output.contains("= help: Configure one tool to use a different port"));
        assert!(output.contains("Found 1 high, 0 medium and 0 low"));
    }

    #[test]
    fn shows_fallback_error() {
        let output = render(&port_pair(), true);
        assert!(output.contains("warning: Supplementary analysis failed: timed out"));
        assert!(output.contains("static_fallback"));
    }

    #[test]
    fn insufficient_tools_has_no_counts() {
        let output = render(&port_pair()[..1], false);
        assert!(output.contains("Need at least 2 tools"));
        assert!(!output.contains("Found"));
    }

    #[test]
    fn no_color_codes_when_disabled() {
        let output = render(&port_pair(), false);
        assert!(!output.contains('\u{1b}'));
    }
}
