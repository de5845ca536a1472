//! Schema command implementation.
//!
//! The `pitfall schema` command prints the JSON Schema of the analysis
//! result emitted by `pitfall analyze --format json`.

use crate::analysis::AnalysisResult;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The schema command implementation.
pub struct SchemaCommand;

/// JSON Schema for [`AnalysisResult`], pretty-printed.
pub fn analysis_schema() -> Result<String> {
    let schema = schemars::schema_for!(AnalysisResult);
    Ok(serde_json::to_string_pretty(&schema).map_err(anyhow::Error::from)?)
}

impl Command for SchemaCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.output(&format!("{}\n", analysis_schema()?));
        Ok(CommandResult::success())
    }
}
