//! Registry command implementation.
//!
//! The `pitfall registry` command lists, searches and looks up known tools.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::args::RegistryArgs;
use crate::error::Result;
use crate::registry::{RegistryEntry, ToolRegistry};
use crate::ui::UserInterface;

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};

/// The registry command implementation.
pub struct RegistryCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    registry_override: Option<PathBuf>,
    args: RegistryArgs,
}

impl RegistryCommand {
    pub fn new(
        project_root: &Path,
        config_override: Option<&Path>,
        registry_override: Option<&Path>,
        args: RegistryArgs,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            registry_override: registry_override.map(Path::to_path_buf),
            args,
        }
    }

    fn select<'r>(&self, registry: &'r ToolRegistry) -> Vec<(&'r str, &'r RegistryEntry)> {
        if let Some(package) = &self.args.package {
            return registry.by_package(package).into_iter().collect();
        }

        let mut found = match &self.args.query {
            Some(query) => registry.search(query),
            None => registry.iter().collect(),
        };
        if let Some(category) = &self.args.category {
            found.retain(|(_, entry)| entry.category.as_deref() == Some(category.as_str()));
        }
        found
    }
}

fn format_entry(key: &str, entry: &RegistryEntry) -> String {
    let mut line = format!("{:<18} {}", key, entry.name);
    if let Some(category) = &entry.category {
        line.push_str(&format!(" [{}]", category));
    }
    if !entry.default_ports.is_empty() {
        let ports: Vec<String> = entry.default_ports.iter().map(u16::to_string).collect();
        line.push_str(&format!(" ports: {}", ports.join(", ")));
    }
    if !entry.common_env_vars.is_empty() {
        let vars: Vec<&str> = entry.common_env_vars.iter().map(String::as_str).collect();
        line.push_str(&format!(" env: {}", vars.join(", ")));
    }
    line.push('\n');
    line
}

impl Command for RegistryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = CommandContext::load(
            &self.project_root,
            self.config_override.as_deref(),
            self.registry_override.as_deref(),
        )?;
        let found = self.select(&ctx.registry);

        if self.args.json {
            let map: BTreeMap<&str, &RegistryEntry> = found.into_iter().collect();
            let json = serde_json::to_string_pretty(&map).map_err(anyhow::Error::from)?;
            ui.output(&format!("{}\n", json));
            return Ok(CommandResult::success());
        }

        if found.is_empty() {
            ui.warning("No matching tools in the registry");
            return Ok(CommandResult::failure(1));
        }

        let text: String = found
            .iter()
            .map(|(key, entry)| format_entry(key, entry))
            .collect();
        ui.output(&text);
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn run(args: RegistryArgs) -> (CommandResult, MockUI) {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let result = RegistryCommand::new(temp.path(), None, None, args)
            .execute(&mut ui)
            .unwrap();
        (result, ui)
    }

    #[test]
    fn looks_up_package() {
        let (_, ui) = run(RegistryArgs {
            package: Some("pyautogen".into()),
            ..Default::default()
        });
        assert!(ui.output_text().starts_with("autogen"));
        assert_eq!(ui.output_text().lines().count(), 1);
    }

    #[test]
    fn filters_by_category() {
        let (_, ui) = run(RegistryArgs {
            category: Some("vector-db".into()),
            ..Default::default()
        });
        assert_eq!(ui.output_text().lines().count(), 4);
        assert!(ui.output_text().contains("qdrant"));
    }

    #[test]
    fn search_as_json() {
        let (_, ui) = run(RegistryArgs {
            query: Some("streamlit".into()),
            json: true,
            ..Default::default()
        });
        let json: serde_json::Value = serde_json::from_str(ui.output_text()).unwrap();
        assert_eq!(json["streamlit"]["default_ports"][0], 8501);
    }

    #[test]
    fn no_match_fails() {
        let (result, ui) = run(RegistryArgs {
            query: Some("definitely-not-a-tool".into()),
            ..Default::default()
        });
        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.warnings().len(), 1);
    }
}
