//! Analyze command implementation.
//!
//! The `pitfall analyze` command collects evidence, runs the conflict rules
//! and renders the result.

use std::path::{Path, PathBuf};

use crate::analysis::AnalysisResult;
use crate::cli::args::AnalyzeArgs;
use crate::error::Result;
use crate::report::{HumanFormatter, JsonFormatter, OutputFormat, ReportFormatter};
use crate::supplementary::parse_response_file;
use crate::ui::UserInterface;

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};

/// The analyze command implementation.
pub struct AnalyzeCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    registry_override: Option<PathBuf>,
    args: AnalyzeArgs,
}

impl AnalyzeCommand {
    pub fn new(
        project_root: &Path,
        config_override: Option<&Path>,
        registry_override: Option<&Path>,
        args: AnalyzeArgs,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            registry_override: registry_override.map(Path::to_path_buf),
            args,
        }
    }

    pub fn args(&self) -> &AnalyzeArgs {
        &self.args
    }

    fn render(&self, ctx: &CommandContext, result: &AnalysisResult, interactive: bool) -> String {
        let format = self.args.format.unwrap_or(ctx.config.output.format);
        let mut output = Vec::new();
        match format {
            OutputFormat::Json => JsonFormatter::new().format(result, &mut output).ok(),
            OutputFormat::Human => {
                // https://no-color.org/
                let color = ctx.config.output.color
                    && interactive
                    && std::env::var_os("NO_COLOR").is_none();
                HumanFormatter::new(color).format(result, &mut output).ok()
            }
        };
        String::from_utf8(output).unwrap_or_default()
    }
}

impl Command for AnalyzeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = CommandContext::load(
            &self.project_root,
            self.config_override.as_deref(),
            self.registry_override.as_deref(),
        )?;
        let options = ctx.pipeline_options(&self.args.input)?;
        ctx.describe_inputs(&options, ui);

        let pipeline = ctx.pipeline();
        let tools = pipeline.signals(&options)?;
        ui.detail(&format!("Aggregated {} tool(s)", tools.len()));

        // A response that cannot be read or parsed falls back to static rules.
        let supplementary = self.args.response.as_deref().map(parse_response_file);
        let result = pipeline.analyze(&tools, supplementary);

        if let Some(error) = &result.error {
            ui.warning(error);
        }
        let report = self.render(&ctx, &result, ui.is_interactive());
        ui.output(&report);

        let failed = self.args.fail_on.is_some_and(|threshold| {
            result
                .conflicts
                .iter()
                .any(|c| threshold.matches(c.severity()))
        });
        Ok(if failed {
            CommandResult::failure(1)
        } else {
            CommandResult::success()
        })
    }
}
