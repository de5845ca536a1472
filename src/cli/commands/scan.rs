//! Scan command implementation.
//!
//! The `pitfall scan` command shows the aggregated tool list without
//! running any conflict rules.

use std::path::{Path, PathBuf};

use crate::cli::args::ScanArgs;
use crate::error::Result;
use crate::signal::ToolSignal;
use crate::ui::UserInterface;

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};

/// The scan command implementation.
pub struct ScanCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    registry_override: Option<PathBuf>,
    args: ScanArgs,
}

impl ScanCommand {
    pub fn new(
        project_root: &Path,
        config_override: Option<&Path>,
        registry_override: Option<&Path>,
        args: ScanArgs,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            registry_override: registry_override.map(Path::to_path_buf),
            args,
        }
    }
}

/// One block per tool.
pub fn format_signals(tools: &[ToolSignal]) -> String {
    let mut out = String::new();
    for tool in tools {
        out.push_str(&format!(
            "{} [{}] {} ({:.2})\n",
            tool.display_name,
            tool.canonical_name,
            tool.status(),
            tool.confidence()
        ));
        if !tool.detection_methods().is_empty() {
            out.push_str(&format!("  methods: {}\n", tool.detection_methods().join(", ")));
        }
        let ports = tool.ports();
        if !ports.is_empty() {
            let ports: Vec<String> = ports.iter().map(u16::to_string).collect();
            out.push_str(&format!("  ports: {}\n", ports.join(", ")));
        }
        if !tool.declared_env_vars.is_empty() {
            let vars: Vec<&str> = tool.declared_env_vars.iter().map(String::as_str).collect();
            out.push_str(&format!("  env: {}\n", vars.join(", ")));
        }
        if !tool.versions.is_empty() {
            out.push_str(&format!("  versions: {}\n", tool.versions.join(", ")));
        }
        if !tool.locations.is_empty() {
            out.push_str(&format!("  found in: {}\n", tool.locations.join(", ")));
        }
    }
    out
}

impl Command for ScanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = CommandContext::load(
            &self.project_root,
            self.config_override.as_deref(),
            self.registry_override.as_deref(),
        )?;
        let options = ctx.pipeline_options(&self.args.input)?;
        ctx.describe_inputs(&options, ui);

        let tools = ctx.pipeline().signals(&options)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&tools).map_err(anyhow::Error::from)?;
            ui.output(&format!("{}\n", json));
        } else if tools.is_empty() {
            ui.message("No tools found");
        } else {
            ui.show_header(&format!("{} tool(s)", tools.len()));
            ui.output(&format_signals(&tools));
        }

        Ok(CommandResult::success())
    }
}
