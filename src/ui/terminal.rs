//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, OutputMode, PitfallTheme, UserInterface};

/// Writes reports to stdout and everything else to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: PitfallTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            PitfallTheme::new()
        } else {
            PitfallTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", msg).ok();
        }
    }

    fn detail(&mut self, msg: &str) {
        if self.mode.shows_details() {
            writeln!(self.err, "{}", self.theme.dim.apply_to(msg)).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn output(&mut self, text: &str) {
        write!(self.out, "{}", text).ok();
        self.out.flush().ok();
    }

    fn is_interactive(&self) -> bool {
        self.out.is_term()
    }
}

/// Create the UI for this process.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}
