// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON format report output.

use super::{ReportFormatter, RunSummary};

/// JSON format report formatter.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, summary: &RunSummary) -> anyhow::Result<String> {
        let mut output = serde_json::to_string_pretty(summary)?;
        output.push('\n');
        Ok(output)
    }
}
