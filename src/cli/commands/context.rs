//! Shared state loaded once per command.

use std::path::{Path, PathBuf};

use crate::analysis::{Pipeline, PipelineOptions};
use crate::cli::args::InputArgs;
use crate::config::{load_config, PitfallConfig};
use crate::error::Result;
use crate::registry::{Heuristics, ToolRegistry};
use crate::signal::load_descriptors;
use crate::ui::UserInterface;

/// Config, registry and heuristics for one invocation.
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: PitfallConfig,
    pub registry: ToolRegistry,
    pub heuristics: Heuristics,
}

impl CommandContext {
    /// Load configuration layers, the registry and the heuristic tables.
    ///
    /// A registry that cannot be loaded is replaced by an empty one; bad
    /// configuration is an error.
    pub fn load(
        project_root: &Path,
        config_override: Option<&Path>,
        registry_override: Option<&Path>,
    ) -> Result<Self> {
        let config = load_config(project_root, config_override)?;

        let registry_path = registry_override.map(Path::to_path_buf).or_else(|| {
            config
                .registry
                .as_ref()
                .map(|p| if p.is_relative() { project_root.join(p) } else { p.clone() })
        });
        let registry = ToolRegistry::load_or_empty(registry_path.as_deref());

        Ok(Self {
            project_root: project_root.to_path_buf(),
            config,
            registry,
            heuristics: Heuristics::builtin()?,
        })
    }

    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(&self.registry, &self.heuristics)
    }

    /// Pipeline options from command inputs and configuration.
    pub fn pipeline_options(&self, input: &InputArgs) -> Result<PipelineOptions> {
        let descriptors = match &input.tools {
            Some(path) => load_descriptors(path)?,
            None => Vec::new(),
        };

        Ok(PipelineOptions {
            project: (!input.no_scan).then(|| self.project_root.clone()),
            descriptors,
            evidence_files: input.evidence.clone(),
            packages_file: input.packages.clone(),
            probe_services: input.probe || self.config.detection.probe_services,
            probe_timeout: self.config.probe_timeout(),
            detect_agents: !input.no_agents && self.config.detection.agents,
            limits: self.config.detector_limits(),
        })
    }

    /// Report what will be collected in verbose mode.
    pub fn describe_inputs(&self, options: &PipelineOptions, ui: &mut dyn UserInterface) {
        ui.detail(&format!("Registry: {} known tools", self.registry.len()));
        if !options.descriptors.is_empty() {
            ui.detail(&format!("Descriptors: {} tools", options.descriptors.len()));
        }
        for path in &options.evidence_files {
            ui.detail(&format!("Evidence file: {}", path.display()));
        }
        if let Some(path) = &options.packages_file {
            ui.detail(&format!("Package listing: {}", path.display()));
        }
        if let Some(root) = &options.project {
            ui.detail(&format!("Project: {}", root.display()));
        }
        if options.probe_services {
            ui.detail("Probing local service ports");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_defaults_for_bare_project() {
        let temp = TempDir::new().unwrap();
        let ctx = CommandContext::load(temp.path(), None, None).unwrap();
        assert!(ctx.registry.len() > 0);
        assert_eq!(ctx.config.limits.max_depth, ctx.config.detector_limits().max_depth);
    }

    #[test]
    fn missing_registry_file_gives_empty_registry() {
        let temp = TempDir::new().unwrap();
        let ctx =
            CommandContext::load(temp.path(), None, Some(temp.path().join("none.yml").as_path())).unwrap();
        assert!(ctx.registry.is_empty());
    }

    #[test]
    fn config_registry_path_is_project_relative() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".pitfall")).unwrap();
        fs::write(
            temp.path().join(".pitfall/config.yml"),
            "registry: tools.yml\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("tools.yml"),
            "tools:\n  inhouse:\n    name: In-house\n    default_ports: [9000]\n",
        )
        .unwrap();

        let ctx = CommandContext::load(temp.path(), None, None).unwrap();
        assert_eq!(ctx.registry.len(), 1);
        assert!(ctx.registry.get("inhouse").is_some());
    }

    #[test]
    fn options_follow_flags_and_config() {
        let temp = TempDir::new().unwrap();
        let ctx = CommandContext::load(temp.path(), None, None).unwrap();
        let input = InputArgs {
            no_scan: true,
            no_agents: true,
            probe: true,
            ..Default::default()
        };

        let options = ctx.pipeline_options(&input).unwrap();
        assert!(options.project.is_none());
        assert!(!options.detect_agents);
        assert!(options.probe_services);
    }
}
