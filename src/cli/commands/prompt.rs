//! Prompt command implementation.
//!
//! The `pitfall prompt` command prints the supplementary analysis prompt
//! for the collected tools. Its response can be fed back with
//! `pitfall analyze --response`.

use std::path::{Path, PathBuf};

use crate::analysis::MIN_TOOLS;
use crate::cli::args::PromptArgs;
use crate::error::Result;
use crate::supplementary::{build_prompt, SYSTEM_PROMPT};
use crate::ui::UserInterface;

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};

/// The prompt command implementation.
pub struct PromptCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    registry_override: Option<PathBuf>,
    args: PromptArgs,
}

impl PromptCommand {
    pub fn new(
        project_root: &Path,
        config_override: Option<&Path>,
        registry_override: Option<&Path>,
        args: PromptArgs,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            registry_override: registry_override.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for PromptCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = CommandContext::load(
            &self.project_root,
            self.config_override.as_deref(),
            self.registry_override.as_deref(),
        )?;
        let options = ctx.pipeline_options(&self.args.input)?;
        let tools = ctx.pipeline().signals(&options)?;

        if tools.len() < MIN_TOOLS {
            ui.error(&format!(
                "Need at least {} tools to build a prompt, found {}",
                MIN_TOOLS,
                tools.len()
            ));
            return Ok(CommandResult::failure(2));
        }

        if self.args.system {
            ui.output(&format!("{}\n\n", SYSTEM_PROMPT));
        }
        ui.output(&build_prompt(
            &tools,
            ctx.config.limits.readme_excerpt_chars,
            &ctx.heuristics.readme,
        ));
        Ok(CommandResult::success())
    }
}
