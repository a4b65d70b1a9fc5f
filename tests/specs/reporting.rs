//! Reporter behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::prelude::*;

/// > runner_starting sees caller metadata; the queue starts exactly once
#[test]
fn runner_starting_sees_metadata() {
    let (_clock, runner, _log) = observed_runner();
    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    runner.set_metadata("arbitraryVariable", "foo");
    runner.add_reporter(Reporter::new("starting").on_runner_starting(move |r| {
        *sink.borrow_mut() = r.metadata("arbitraryVariable");
    }));

    runner.execute().unwrap();

    assert_eq!(*seen.borrow(), Some(serde_json::json!("foo")));
    assert_eq!(runner.queue().start_count(), 1);
}

/// > A reporter without a capability is never called for it
#[test]
fn reporters_only_receive_registered_notifications() {
    let (_clock, runner, _log) = observed_runner();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let starting = calls.clone();
    let reporter = Reporter::new("starting only").on_runner_starting(move |_| {
        starting.borrow_mut().push("starting");
    });
    assert!(!reporter.handles(Capability::RunnerResults));
    runner.add_reporter(reporter);
    runner.add_reporter(Reporter::new("silent"));
    runner
        .describe("s", |s| {
            s.it("passes", passes)?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();

    assert_eq!(*calls.borrow(), vec!["starting"]);
    assert_eq!(runner.reporter_count(), 3);
}

/// > Every reporter is notified in registration order
#[test]
fn reporters_are_notified_in_registration_order() {
    let (_clock, runner, _log) = observed_runner();
    let order = Rc::new(RefCell::new(Vec::new()));
    for name in ["first", "second"] {
        let order = order.clone();
        runner.add_reporter(Reporter::new(name).on_runner_results(move |_| {
            order.borrow_mut().push(name);
        }));
    }

    runner.execute().unwrap();

    assert_eq!(*order.borrow(), vec!["first", "second"]);
}

/// > Spec logs reach reporters that handle them
#[test]
fn spec_logs_reach_reporters() {
    let (_clock, runner, log) = observed_runner();
    runner
        .describe("s", |s| {
            s.it("talks", |spec| {
                spec.runs(|ctx| {
                    ctx.log("hello");
                    Ok(())
                });
            })?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();

    assert!(log.events().contains(&ReportEvent::Log("hello".into())));
}

/// > A panicking reporter does not stop the run or other reporters
#[test]
fn panicking_reporter_is_isolated() {
    let (_clock, runner, log) = observed_runner();
    runner.add_reporter(Reporter::new("broken").on_runner_starting(|_| panic!("reporter bug")));
    runner
        .describe("s", |s| {
            s.it("passes", passes)?;
            Ok(())
        })
        .unwrap();

    runner.execute().unwrap();

    assert!(runner.is_complete());
    assert_eq!(log.final_results().map(counts), Some((1, 1, 0)));
}
