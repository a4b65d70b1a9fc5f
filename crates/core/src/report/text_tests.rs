// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use similar_asserts::assert_eq;

use super::*;
use crate::runner::Runner;
use crate::test_utils::{failing, fake_runner, ms, passing};

fn define_math(runner: &Runner) {
    runner
        .describe("math", |s| {
            s.it("adds", passing)?;
            s.describe("edge", |s| {
                s.it("breaks", failing)?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();
    runner
        .xdescribe("later", |s| {
            s.it("someday", passing)?;
            Ok(())
        })
        .unwrap();
}

#[test]
fn plain_report_lists_suites_failures_and_totals() {
    let (_clock, runner) = fake_runner();
    define_math(&runner);
    runner.execute().unwrap();

    let output = TextFormatter::new(false)
        .format(&RunSummary::from_runner(&runner))
        .unwrap();
    assert_eq!(
        output,
        "\
math: 1/2 passed
  edge: 0/1 passed
later (excluded)

Failures:

1) math edge breaks
   [assertion] Expected true to equal false.

2 specs, 1 passed, 1 failed (0ms)
FAIL
"
    );
}

#[test]
fn passing_run_ends_with_pass() {
    let (clock, runner) = fake_runner();
    runner
        .describe("slow", |s| {
            s.it("waits", |spec| {
                spec.waits(ms(30));
                passing(spec);
            })?;
            Ok(())
        })
        .unwrap();
    runner.execute().unwrap();
    clock.tick(ms(30));

    let output = TextFormatter::new(false)
        .format(&RunSummary::from_runner(&runner))
        .unwrap();
    assert_eq!(output, "slow: 1/1 passed\n\n1 specs, 1 passed, 0 failed (30ms)\nPASS\n");
}

#[test]
fn unfinished_run_is_marked_incomplete() {
    let (_clock, runner) = fake_runner();
    runner
        .describe("slow", |s| {
            s.it("waits", |spec| {
                spec.waits(ms(30));
            })?;
            Ok(())
        })
        .unwrap();
    runner.execute().unwrap();

    let output = TextFormatter::new(false)
        .format(&RunSummary::from_runner(&runner))
        .unwrap();
    assert!(output.ends_with("0 specs, 0 passed, 0 failed (0ms)\nINCOMPLETE\n"));
}

#[test]
fn timeouts_and_runtime_errors_are_tagged() {
    let (clock, runner) = fake_runner();
    runner
        .describe("io", |s| {
            s.it("hangs", |spec| {
                spec.waits_for_within(ms(20), "the socket", || false);
            })?;
            s.it("errors", |spec| {
                spec.runs(|_| Err(anyhow::anyhow!("disk full")));
            })?;
            Ok(())
        })
        .unwrap();
    runner.execute().unwrap();
    clock.tick(ms(100));

    let output = TextFormatter::new(false)
        .format(&RunSummary::from_runner(&runner))
        .unwrap();
    assert!(output.contains("1) io hangs\n   [timeout] timed out after 20 msec waiting for the socket\n"));
    assert!(output.contains("2) io errors\n   [error] disk full\n"));
}

#[test]
fn colored_report_emits_escape_codes() {
    let (_clock, runner) = fake_runner();
    define_math(&runner);
    runner.execute().unwrap();

    let summary = RunSummary::from_runner(&runner);
    let colored = TextFormatter::new(true).format(&summary).unwrap();
    let plain = TextFormatter::new(false).format(&summary).unwrap();
    assert!(colored.contains("\x1b["));
    assert!(!plain.contains("\x1b["));
}
