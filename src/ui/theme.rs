//! Visual theme and styling.

use console::Style;

/// pitfall's terminal theme.
#[derive(Debug, Clone)]
pub struct PitfallTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for secondary text.
    pub dim: Style,
    /// Style for headers (magenta bold).
    pub header: Style,
    /// Style for key labels in key-value displays (bold).
    pub key: Style,
}

impl Default for PitfallTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl PitfallTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().magenta().bold(),
            key: Style::new().bold(),
        }
    }

    /// A theme without any styling.
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            key: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{} {}", self.success.apply_to("✓"), msg)
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{} {}", self.warning.apply_to("⚠"), msg)
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{} {}", self.error.apply_to("✗"), msg)
    }

    pub fn format_header(&self, title: &str) -> String {
        self.header.apply_to(title).to_string()
    }
}

/// Whether stdout should be colored.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}
