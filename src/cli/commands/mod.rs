//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands that
//! need configuration or the registry load them through
//! [`CommandContext`].

pub mod agents;
pub mod analyze;
pub mod completions;
pub mod context;
pub mod dispatcher;
pub mod prompt;
pub mod registry;
pub mod scan;
pub mod schema;

pub use context::CommandContext;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
