//! Agents command implementation.
//!
//! The `pitfall agents` command runs only the dynamic agent-framework
//! detector and shows the evidence behind each detection.

use std::path::{Path, PathBuf};

use crate::cli::args::AgentsArgs;
use crate::dynamic::{AgentDetector, DynamicDetection};
use crate::error::Result;
use crate::ui::UserInterface;

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};

/// The agents command implementation.
pub struct AgentsCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: AgentsArgs,
}

impl AgentsCommand {
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: AgentsArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
        }
    }

    fn describe(detection: &DynamicDetection) -> String {
        let evidence = &detection.evidence;
        let mut out = format!("{} ({:.2})\n", detection.name, detection.confidence);
        out.push_str(&format!("  {}\n", detection.description));
        out.push_str(&format!(
            "  structure {:.2}: {} dir(s), {} file(s), {} config file(s)\n",
            evidence.structure.score,
            evidence.structure.agent_directories.len(),
            evidence.structure.agent_files.len(),
            evidence.structure.config_files.len()
        ));
        out.push_str(&format!(
            "  code {:.2}: {} file(s) scanned, {} import(s), {} class(es), {} function(s)\n",
            evidence.code.score,
            evidence.code.files_scanned,
            evidence.code.agent_imports.len(),
            evidence.code.agent_classes.len(),
            evidence.code.agent_functions.len()
        ));
        out.push_str(&format!(
            "  config {:.2}: {} agent config(s)\n",
            evidence.config.score,
            evidence.config.agent_configs.len()
        ));
        if !detection.search_terms.is_empty() {
            out.push_str(&format!(
                "  search terms: {}\n",
                detection.search_terms.join(", ")
            ));
        }
        out
    }
}

impl Command for AgentsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = CommandContext::load(&self.project_root, self.config_override.as_deref(), None)?;
        let mut limits = ctx.config.detector_limits();
        if let Some(threshold) = self.args.threshold {
            limits.confidence_threshold = threshold;
        }

        let detections =
            AgentDetector::new(&ctx.heuristics.dynamic, limits).detect(&self.project_root);

        if self.args.json {
            let json = serde_json::to_string_pretty(&detections).map_err(anyhow::Error::from)?;
            ui.output(&format!("{}\n", json));
        } else if detections.is_empty() {
            ui.message("No agent framework detected");
        } else {
            for detection in &detections {
                ui.output(&Self::describe(detection));
            }
        }

        Ok(CommandResult::success())
    }
}
