// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text format report output.

use termcolor::{Buffer, WriteColor};

use super::{ReportFormatter, RunSummary};
use crate::color::scheme;
use crate::results::FailureKind;

/// Text format report formatter.
pub struct TextFormatter {
    color: bool,
}

impl TextFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

fn kind_tag(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Assertion => "assertion",
        FailureKind::Runtime => "error",
        FailureKind::Timeout => "timeout",
    }
}

fn write_report(w: &mut dyn WriteColor, summary: &RunSummary) -> std::io::Result<()> {
    for suite in &summary.suites {
        let indent = "  ".repeat(suite.depth);
        w.set_color(&scheme::name())?;
        write!(w, "{indent}{}", suite.description)?;
        w.reset()?;
        if suite.excluded {
            writeln!(w, " (excluded)")?;
        } else {
            writeln!(
                w,
                ": {}/{} passed",
                suite.results.passed_count, suite.results.total_count
            )?;
        }
    }

    if !summary.failures.is_empty() {
        writeln!(w)?;
        writeln!(w, "Failures:")?;
        for (i, spec) in summary.failures.iter().enumerate() {
            writeln!(w)?;
            w.set_color(&scheme::name())?;
            writeln!(w, "{}) {}", i + 1, spec.name)?;
            w.reset()?;
            for failure in &spec.failures {
                write!(w, "   ")?;
                w.set_color(&scheme::kind())?;
                write!(w, "[{}]", kind_tag(failure.kind))?;
                w.set_color(&scheme::message())?;
                writeln!(w, " {}", failure.message)?;
                w.reset()?;
            }
        }
    }

    let results = &summary.results;
    writeln!(w)?;
    write!(
        w,
        "{} specs, {} passed, {} failed",
        results.total_count, results.passed_count, results.failed_count
    )?;
    match summary.elapsed_ms {
        Some(ms) => writeln!(w, " ({ms}ms)")?,
        None => writeln!(w)?,
    }

    if !summary.complete {
        writeln!(w, "INCOMPLETE")?;
    } else if results.passed() {
        w.set_color(&scheme::pass())?;
        write!(w, "PASS")?;
        w.reset()?;
        writeln!(w)?;
    } else {
        w.set_color(&scheme::fail())?;
        write!(w, "FAIL")?;
        w.reset()?;
        writeln!(w)?;
    }
    Ok(())
}

impl ReportFormatter for TextFormatter {
    fn format(&self, summary: &RunSummary) -> anyhow::Result<String> {
        let mut buffer = if self.color {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        };
        write_report(&mut buffer, summary)?;
        Ok(String::from_utf8(buffer.into_inner())?)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
