//! Command-line interface for pitfall.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    AgentsArgs, AnalyzeArgs, Cli, Commands, CompletionsArgs, FailOn, InputArgs, PromptArgs,
    RegistryArgs, ScanArgs,
};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
