//! Terminal output.
//!
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] writing reports to stdout and status to stderr
//! - [`MockUI`] capturing everything for tests

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, PitfallTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a status message.
    fn message(&mut self, msg: &str);

    /// Display a message only in verbose mode.
    fn detail(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Always shown.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Write command output (a report, JSON, a prompt). Always shown.
    fn output(&mut self, text: &str);

    /// Check if stdout is a terminal.
    fn is_interactive(&self) -> bool;
}
