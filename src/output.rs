//! # Output Configuration
//!
//! Utilities for controlling CLI output appearance: color support detection
//! based on terminal capabilities and user preferences, plus the colorized
//! rendering of multi-repository git status reports.
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;

use console::Style;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// - `--color=always`: Force colors on (overrides NO_COLOR)
    /// - `--color=never`: Force colors off
    /// - `--color=auto`: Detect based on environment
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    fn style(&self) -> Style {
        if self.use_color {
            Style::new().force_styling(true)
        } else {
            Style::new().force_styling(false)
        }
    }

    /// Render the header line announcing one repository's section of a
    /// fanned-out report.
    pub fn repo_header(&self, repo_name: &str) -> String {
        self.style()
            .bold()
            .cyan()
            .apply_to(format!("=== {} ===", repo_name))
            .to_string()
    }

    /// Render a per-repository failure line.
    pub fn failure_line(&self, repo_name: &str, message: &str) -> String {
        format!(
            "{}: {}",
            self.style().bold().red().apply_to(repo_name),
            message
        )
    }

    /// Colorize long-form `git status` output the way git itself does:
    /// staged entries green, unstaged and untracked entries red.
    ///
    /// Section headers switch the active color; a blank line ends the
    /// section. Only indented lines (the file entries and hints within a
    /// section) are colored.
    pub fn colorize_status(&self, raw: &str) -> String {
        let green = self.style().green();
        let red = self.style().red();

        let mut section = StatusSection::None;
        let mut lines = Vec::new();
        for line in raw.lines() {
            if line.starts_with("Changes to be committed") {
                section = StatusSection::Staged;
            } else if line.starts_with("Changes not staged for commit") {
                section = StatusSection::Unstaged;
            } else if line.starts_with("Untracked files") {
                section = StatusSection::Untracked;
            } else if line.trim().is_empty() {
                section = StatusSection::None;
            }

            let indented = line.starts_with(' ') || line.starts_with('\t');
            let rendered = match section {
                StatusSection::Staged if indented => green.apply_to(line).to_string(),
                StatusSection::Unstaged | StatusSection::Untracked if indented => {
                    red.apply_to(line).to_string()
                }
                _ => line.to_string(),
            };
            lines.push(rendered);
        }
        lines.join("\n")
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Which section of `git status` output the renderer is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusSection {
    None,
    Staged,
    Unstaged,
    Untracked,
}
