//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use pitfall::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Scanning project");
//! ui.output("{}\n");
//!
//! assert_eq!(ui.messages(), ["Scanning project"]);
//! assert_eq!(ui.output_text(), "{}\n");
//! ```

use super::{OutputMode, UserInterface};

/// Captures every UI call.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    details: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    output: String,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Everything written with [`UserInterface::output`].
    pub fn output_text(&self) -> &str {
        &self.output
    }

    /// Check if any captured message, warning or detail contains `needle`.
    pub fn has_message(&self, needle: &str) -> bool {
        self.messages
            .iter()
            .chain(&self.details)
            .chain(&self.successes)
            .chain(&self.warnings)
            .any(|m| m.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn detail(&mut self, msg: &str) {
        self.details.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_each_channel() {
        let mut ui = MockUI::with_mode(OutputMode::Verbose);
        ui.message("m");
        ui.detail("d");
        ui.success("s");
        ui.warning("w");
        ui.error("e");
        ui.show_header("h");
        ui.output("a");
        ui.output("b");

        assert_eq!(ui.output_mode(), OutputMode::Verbose);
        assert_eq!(ui.details(), ["d"]);
        assert_eq!(ui.successes(), ["s"]);
        assert_eq!(ui.warnings(), ["w"]);
        assert_eq!(ui.errors(), ["e"]);
        assert_eq!(ui.headers(), ["h"]);
        assert_eq!(ui.output_text(), "ab");
        assert!(ui.has_message("w"));
        assert!(!ui.has_message("e"));
    }
}
