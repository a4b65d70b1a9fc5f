// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color handling for text reports.

use serde::Deserialize;
use termcolor::ColorChoice;

/// When to color text reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when writing to a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a concrete choice given whether the sink is a terminal and
    /// whether `NO_COLOR` is set.
    pub fn resolve(self, is_terminal: bool, no_color_env: bool) -> ColorChoice {
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if is_terminal && !no_color_env => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
        }
    }

    /// Resolve against the current environment's `NO_COLOR`.
    pub fn resolve_env(self, is_terminal: bool) -> ColorChoice {
        self.resolve(is_terminal, std::env::var_os("NO_COLOR").is_some())
    }
}

/// Whether a resolved choice produces escape codes.
pub fn uses_color(choice: ColorChoice) -> bool {
    !matches!(choice, ColorChoice::Never)
}

/// Color scheme for report output.
pub mod scheme {
    use termcolor::{Color, ColorSpec};

    /// Suite and spec names: bold.
    pub fn name() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        spec
    }

    /// Failure verdicts: red bold.
    pub fn fail() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        spec
    }

    /// Pass verdicts: green bold.
    pub fn pass() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Green)).set_bold(true);
        spec
    }

    /// Failure kind tags: yellow.
    pub fn kind() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Yellow));
        spec
    }

    /// Failure messages: no color.
    pub fn message() -> ColorSpec {
        ColorSpec::new()
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
