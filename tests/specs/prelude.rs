//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for building runners on a fake clock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::rc::Rc;
use std::time::Duration;

pub use specrun::{
    Capability, EventLog, FakeClock, ReportEvent, Reporter, ResultSet, Runner, RunnerState,
    SpecBuilder,
};

/// A runner on a fresh fake clock, plus an event log already attached.
pub fn observed_runner() -> (Rc<FakeClock>, Runner, EventLog) {
    let clock = Rc::new(FakeClock::new());
    let runner = Runner::new(clock.clone());
    let log = EventLog::new();
    runner.add_reporter(log.reporter());
    (clock, runner, log)
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn passes(spec: &mut SpecBuilder) {
    spec.runs(|ctx| {
        ctx.expect(true).to_equal(true);
        Ok(())
    });
}

pub fn fails(spec: &mut SpecBuilder) {
    spec.runs(|ctx| {
        ctx.expect(true).to_equal(false);
        Ok(())
    });
}

/// `(total, passed, failed)`
pub fn counts(results: ResultSet) -> (usize, usize, usize) {
    (
        results.total_count,
        results.passed_count,
        results.failed_count,
    )
}
