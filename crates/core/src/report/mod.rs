// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run reports.
//!
//! A [`RunSummary`] snapshots a runner's tree and counts; formatters render
//! it as text or JSON, and [`writer_reporter`] writes the rendering to a sink
//! when the run completes.

mod json;
mod text;

use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::color::uses_color;
use crate::config::ReportConfig;
use crate::reporter::Reporter;
use crate::results::{Failure, ResultSet, SpecOutcome};
use crate::runner::Runner;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One suite as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    pub name: String,
    pub description: String,
    pub depth: usize,
    pub excluded: bool,
    pub results: ResultSet,
}

/// A failed spec and everything that went wrong in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedSpec {
    pub name: String,
    pub failures: Vec<Failure>,
}

/// Snapshot of a run for formatting.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated: DateTime<Utc>,
    pub complete: bool,
    pub elapsed_ms: Option<u64>,
    pub results: ResultSet,
    /// Every suite, depth-first pre-order.
    pub suites: Vec<SuiteSummary>,
    pub failures: Vec<FailedSpec>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl RunSummary {
    pub fn from_runner(runner: &Runner) -> Self {
        let (suites, failures) = runner.with_tree(|tree| {
            let suites = tree
                .flatten()
                .into_iter()
                .map(|id| SuiteSummary {
                    name: tree.suite_full_name(id),
                    description: tree.suite(id).description().to_string(),
                    depth: tree.depth(id),
                    excluded: tree.is_suite_excluded(id),
                    results: tree.suite_results(id),
                })
                .collect();
            let failures = tree
                .spec_ids()
                .filter(|&id| tree.spec(id).outcome() == Some(SpecOutcome::Failed))
                .map(|id| FailedSpec {
                    name: tree.spec_full_name(id),
                    failures: tree.spec(id).failures().to_vec(),
                })
                .collect();
            (suites, failures)
        });

        Self {
            generated: Utc::now(),
            complete: runner.is_complete(),
            elapsed_ms: runner
                .elapsed()
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            results: runner.results(),
            suites,
            failures,
            metadata: runner.metadata_snapshot(),
        }
    }
}

/// Trait for rendering a run summary.
pub trait ReportFormatter {
    /// Render the summary to a string.
    fn format(&self, summary: &RunSummary) -> anyhow::Result<String>;

    /// Render the summary directly to a writer.
    fn format_to(&self, writer: &mut dyn Write, summary: &RunSummary) -> anyhow::Result<()> {
        writer.write_all(self.format(summary)?.as_bytes())?;
        Ok(())
    }
}

/// Formatter for `format`, coloring text output when `color` is set.
pub fn formatter_for(format: OutputFormat, color: bool) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(color)),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Reporter that renders the run with `formatter` into `sink` once the run
/// completes. Write errors are logged, never raised into the run.
pub fn writer_reporter(
    formatter: Box<dyn ReportFormatter>,
    mut sink: impl Write + 'static,
) -> Reporter {
    Reporter::new("writer").on_runner_results(move |runner| {
        let summary = RunSummary::from_runner(runner);
        let written = formatter
            .format_to(&mut sink, &summary)
            .and_then(|()| sink.flush().map_err(anyhow::Error::from));
        if let Err(err) = written {
            tracing::warn!("failed to write report: {:#}", err);
        }
    })
}

/// Reporter writing to stdout as configured.
pub fn stdout_reporter(config: &ReportConfig) -> Reporter {
    let stdout = std::io::stdout();
    let color = uses_color(config.color.resolve_env(stdout.is_terminal()));
    writer_reporter(formatter_for(config.format, color), stdout)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
