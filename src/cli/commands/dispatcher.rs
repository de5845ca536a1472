//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{AnalyzeArgs, Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    registry_override: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_override: None,
            registry_override: None,
        }
    }

    /// Create a dispatcher honoring the global `--config` and `--registry` flags.
    pub fn from_cli(project_root: PathBuf, cli: &Cli) -> Self {
        Self {
            project_root,
            config_override: cli.config.clone(),
            registry_override: cli.registry.clone(),
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = self.project_root.as_path();
        let config = self.config_override.as_deref();
        let registry = self.registry_override.as_deref();

        match &cli.command {
            Some(Commands::Analyze(args)) => {
                super::analyze::AnalyzeCommand::new(root, config, registry, args.clone())
                    .execute(ui)
            }
            Some(Commands::Scan(args)) => {
                super::scan::ScanCommand::new(root, config, registry, args.clone()).execute(ui)
            }
            Some(Commands::Agents(args)) => {
                super::agents::AgentsCommand::new(root, config, args.clone()).execute(ui)
            }
            Some(Commands::Prompt(args)) => {
                super::prompt::PromptCommand::new(root, config, registry, args.clone()).execute(ui)
            }
            Some(Commands::Registry(args)) => {
                super::registry::RegistryCommand::new(root, config, registry, args.clone())
                    .execute(ui)
            }
            Some(Commands::Schema) => super::schema::SchemaCommand.execute(ui),
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => {
                // Default to analyze with default args
                super::analyze::AnalyzeCommand::new(root, config, registry, AnalyzeArgs::default())
                    .execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"));
        assert_eq!(dispatcher.project_root(), Path::new("/test"));
    }

    #[test]
    fn dispatches_schema() {
        let cli = Cli::parse_from(["pitfall", "schema"]);
        let mut ui = MockUI::new();
        let result = CommandDispatcher::from_cli(PathBuf::from("/test"), &cli)
            .dispatch(&cli, &mut ui)
            .unwrap();
        assert!(result.success);
        assert!(ui.output_text().contains("AnalysisResult"));
    }

    #[test]
    fn no_subcommand_runs_analyze() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::parse_from(["pitfall"]);
        let mut ui = MockUI::new();
        let result = CommandDispatcher::from_cli(temp.path().to_path_buf(), &cli)
            .dispatch(&cli, &mut ui)
            .unwrap();
        assert!(result.success);
        assert!(ui.output_text().contains("Need at least 2 tools"));
    }
}
