//! Theme system for human-mode output.

use console::Style;

/// Visual theme for scanctl human-mode output.
///
/// Centralizes colors and styles for consistent rendering.
pub struct ScanTheme {
    // Status colors
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    // Component styles
    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub key: Style,
    pub enabled: Style,
    pub disabled: Style,
}

impl Default for ScanTheme {
    fn default() -> Self {
        Self {
            accent: Style::new().blue(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            muted: Style::new().color256(244),
            header: Style::new().blue().bold(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            key: Style::new().cyan(),
            enabled: Style::new().green(),
            disabled: Style::new().dim(),
        }
    }
}
