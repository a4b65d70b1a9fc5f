// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runner configuration, loadable from TOML.
//!
//! ```toml
//! [queue]
//! poll_interval_ms = 10
//!
//! [waits_for]
//! timeout_ms = 5000
//!
//! [report]
//! format = "text"   # or "json"
//! color = "auto"    # or "always", "never"
//! ```

pub mod defaults;

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::color::ColorMode;
use crate::report::OutputFormat;

/// Top-level runner configuration. Every section is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub queue: QueueConfig,
    pub waits_for: WaitsForConfig,
    pub report: ReportConfig,
}

impl RunnerConfig {
    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse runner config")
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }
}

/// Queue configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Interval between latch polls in milliseconds (default: 10).
    #[serde(default = "QueueConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: Self::default_poll_interval_ms(),
        }
    }
}

impl QueueConfig {
    pub(super) fn default_poll_interval_ms() -> u64 {
        defaults::queue::POLL_INTERVAL_MS
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// `waits_for` configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitsForConfig {
    /// Default latch timeout in milliseconds (default: 5000).
    #[serde(default = "WaitsForConfig::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for WaitsForConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

impl WaitsForConfig {
    pub(super) fn default_timeout_ms() -> u64 {
        defaults::waits_for::TIMEOUT_MS
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Settings for the report written at the end of a run.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub format: OutputFormat,
    pub color: ColorMode,
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
