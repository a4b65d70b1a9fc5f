//! Run and aggregation behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::prelude::*;

/// > One passing and one failing spec total {2, 1, 1}
#[test]
fn pass_and_fail_aggregate_into_runner_results() {
    let (_clock, runner, log) = observed_runner();
    runner
        .describe("one suite", |s| {
            s.it("passes", passes)?;
            s.it("fails", fails)?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();

    assert!(runner.is_complete());
    assert_eq!(counts(runner.results()), (2, 1, 1));
    assert_eq!(log.final_results(), Some(runner.results()));
}

/// > An xdescribe suite's specs never run and never count
#[test]
fn excluded_suite_is_skipped_entirely() {
    let (_clock, runner, _log) = observed_runner();
    let ran = std::rc::Rc::new(std::cell::Cell::new(false));
    let flag = ran.clone();
    runner
        .describe("kept", |s| {
            s.it("fails", fails)?;
            Ok(())
        })
        .unwrap();
    runner
        .xdescribe("skipped", move |s| {
            s.it("would pass", move |spec| {
                spec.runs(move |_| {
                    flag.set(true);
                    Ok(())
                });
            })?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();

    assert!(!ran.get());
    assert_eq!(counts(runner.results()), (1, 0, 1));
}

/// > Suite results roll up from nested suites
#[test]
fn nested_results_roll_up() {
    let (_clock, runner, _log) = observed_runner();
    let outer = runner
        .describe("outer", |s| {
            s.it("passes", passes)?;
            s.describe("inner", |s| {
                s.it("passes too", passes)?;
                s.it("fails", fails)?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();

    assert_eq!(counts(runner.suite_results(outer)), (3, 2, 1));
    assert_eq!(runner.suite_results(outer), runner.results());
}

/// > suites() lists every suite with full names, nested included
#[test]
fn suites_lists_nested_full_names() {
    let (_clock, runner, _log) = observed_runner();
    runner
        .describe("spec 1", |s| {
            s.describe("nested spec", |s| {
                s.it("passes", passes)?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let names: Vec<String> = runner
        .suites()
        .into_iter()
        .map(|id| runner.suite_full_name(id))
        .collect();
    assert_eq!(names, vec!["spec 1", "spec 1 nested spec"]);
    assert_eq!(runner.top_level_suites().len(), 1);
}

/// > A runner executes once
#[test]
fn second_execute_is_rejected() {
    let (_clock, runner, _log) = observed_runner();
    runner.execute().unwrap();
    assert_eq!(runner.state(), RunnerState::Completed);
    assert!(runner.execute().is_err());
    assert_eq!(runner.queue().start_count(), 1);
}

/// > A runner with no suites completes immediately with zero counts
#[test]
fn empty_runner_completes_with_zero_results() {
    let (_clock, runner, log) = observed_runner();
    runner.execute().unwrap();
    assert!(runner.is_complete());
    assert_eq!(log.final_results(), Some(ResultSet::default()));
}

/// > A step error fails the spec and the run continues
#[test]
fn step_errors_fail_only_their_spec() {
    let (_clock, runner, _log) = observed_runner();
    runner
        .describe("s", |s| {
            s.it("errors", |spec| {
                spec.runs(|_| anyhow::bail!("boom"));
            })?;
            s.it("panics", |spec| {
                spec.runs(|_| panic!("kaboom"));
            })?;
            s.it("passes", passes)?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();

    assert!(runner.is_complete());
    assert_eq!(counts(runner.results()), (3, 1, 2));
}
