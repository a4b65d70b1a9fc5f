//! Timed wait behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::Cell;
use std::rc::Rc;

use crate::prelude::*;

/// > A 200ms wait holds back the runner results until the clock advances
#[test]
fn reporter_waits_for_clock_to_advance() {
    let (clock, runner, log) = observed_runner();
    runner
        .describe("slow", |s| {
            s.it("waits", |spec| {
                spec.waits(ms(200));
                passes(spec);
            })?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();
    assert!(log.final_results().is_none());
    assert_eq!(runner.state(), RunnerState::Running);

    clock.tick(ms(199));
    assert!(log.final_results().is_none());

    clock.tick(ms(1));
    assert_eq!(log.final_results(), Some(runner.results()));
    assert!(Runner::ptr_eq(&log.last_runner().unwrap(), &runner));
    assert_eq!(counts(runner.results()), (1, 1, 0));
}

/// > waits_for passes once its latch holds
#[test]
fn latch_releases_spec_when_it_holds() {
    let (clock, runner, log) = observed_runner();
    let ready = Rc::new(Cell::new(false));
    let latch = ready.clone();
    runner
        .describe("latch", |s| {
            s.it("holds", move |spec| {
                spec.waits_for("ready", move || latch.get());
                passes(spec);
            })?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();
    clock.tick(ms(50));
    assert!(log.final_results().is_none());

    ready.set(true);
    clock.tick(ms(10));
    assert_eq!(log.final_results().map(counts), Some((1, 1, 0)));
}

/// > waits_for fails the spec after its timeout and moves on
#[test]
fn latch_timeout_fails_spec() {
    let (clock, runner, _log) = observed_runner();
    let spec = runner
        .describe("latch", |s| {
            s.it("never holds", |spec| {
                spec.waits_for_within(ms(100), "", || false);
            })?;
            s.it("runs after", passes)?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();
    clock.tick(ms(100));

    assert!(runner.is_complete());
    assert_eq!(counts(runner.suite_results(spec)), (2, 1, 1));
    let message = runner.with_tree(|tree| {
        let id = tree.spec_ids().next().unwrap();
        tree.spec(id).failures()[0].message.clone()
    });
    assert_eq!(message, "timed out after 100 msec waiting for something to happen");
}
