//! JSON output formatter.

use std::io::Write;

use super::ReportFormatter;
use crate::analysis::AnalysisResult;

/// Writes the result as pretty-printed JSON.
///
/// Conflicts are emitted in ranked order, most severe first.
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
        let mut ranked = result.clone();
        ranked.conflicts = result.ranked_conflicts();
        serde_json::to_writer_pretty(&mut *writer, &ranked)?;
        writeln!(writer)
    }
}
