//! # Output Configuration
//!
//! Controls how the CLI reports results: with emoji and colour on capable
//! terminals, plain text otherwise.
//!
//! The following environment variables and flags are respected:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use console::style;
use std::env;

use crate::fetch::FetchOutcome;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: `always` forces colour on
    /// (overriding `NO_COLOR`), `never` forces it off, anything else detects
    /// support from the environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
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

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

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

/// Returns the emoji when colors are enabled, else the plain alternative.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Summary printed after a successful fetch.
pub fn fetch_summary(config: &OutputConfig, outcome: &FetchOutcome) -> String {
    let commit = if config.use_color {
        style(&outcome.commit).yellow().to_string()
    } else {
        outcome.commit.clone()
    };
    format!(
        "{} Fetched {} into {}\n   pinned to {}",
        emoji(config, "✅", "[OK]"),
        outcome.fetched_ref,
        outcome.destination.display(),
        commit
    )
}

/// Prefix for an error report.
pub fn error_prefix(config: &OutputConfig) -> String {
    if config.use_color {
        format!("{} {}", emoji(config, "❌", "error:"), style("error:").red().bold())
    } else {
        "error:".to_string()
    }
}
