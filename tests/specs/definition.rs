//! Suite definition behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use specrun::{DefinitionError, NodeKind};

use crate::prelude::*;

/// > Blank descriptions are rejected
#[test]
fn blank_descriptions_are_rejected() {
    let (_clock, runner, _log) = observed_runner();
    assert_eq!(
        runner.describe("  ", |_| Ok(())).unwrap_err(),
        DefinitionError::EmptyDescription {
            kind: NodeKind::Suite
        }
    );

    let err = runner
        .describe("s", |s| {
            s.it("", passes)?;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::EmptyDescription {
            kind: NodeKind::Spec
        }
    );
}

/// > Nothing can be defined once the runner has started
#[test]
fn definitions_after_start_are_rejected() {
    let (_clock, runner, _log) = observed_runner();
    runner.execute().unwrap();

    let err = runner.describe("late", |_| Ok(())).unwrap_err();
    assert!(matches!(
        err,
        DefinitionError::RunnerNotIdle {
            kind: NodeKind::Suite,
            ..
        }
    ));
    assert!(runner.suites().is_empty());
}

/// > xit specs are defined but never counted
#[test]
fn excluded_specs_are_not_counted() {
    let (_clock, runner, _log) = observed_runner();
    runner
        .describe("s", |s| {
            s.it("passes", passes)?;
            s.xit("fails", fails)?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();

    assert_eq!(counts(runner.results()), (1, 1, 0));
}
