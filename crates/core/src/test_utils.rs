//! Shared unit test utilities.
//!
//! Provides common helpers for unit tests in the specrun crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::rc::Rc;
use std::time::Duration;

use crate::clock::FakeClock;
use crate::results::ResultSet;
use crate::runner::{Runner, SpecBuilder};

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// A runner on a fresh fake clock, with default configuration.
pub fn fake_runner() -> (Rc<FakeClock>, Runner) {
    let clock = Rc::new(FakeClock::new());
    let runner = Runner::new(clock.clone());
    (clock, runner)
}

/// Spec body with one passing expectation.
pub fn passing(spec: &mut SpecBuilder) {
    spec.runs(|ctx| {
        ctx.expect(true).to_equal(true);
        Ok(())
    });
}

/// Spec body with one failing expectation.
pub fn failing(spec: &mut SpecBuilder) {
    spec.runs(|ctx| {
        ctx.expect(true).to_equal(false);
        Ok(())
    });
}

/// `(total, passed, failed)` for compact assertions.
pub fn counts(results: ResultSet) -> (usize, usize, usize) {
    (
        results.total_count,
        results.passed_count,
        results.failed_count,
    )
}
