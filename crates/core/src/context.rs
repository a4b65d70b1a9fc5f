// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Spec steps and the context a running step records into.

use std::fmt::Debug;
use std::time::Duration;

use crate::results::Failure;

/// Body of a `runs` step.
pub type RunBlock = Box<dyn FnMut(&mut SpecContext) -> anyhow::Result<()>>;

/// Condition polled by a `waits_for` step.
pub type Latch = Box<dyn FnMut() -> bool>;

/// One step of a spec, executed in order by the queue.
pub enum Step {
    /// Runs synchronously.
    Run(RunBlock),
    /// Suspends the spec for the given duration.
    Wait(Duration),
    /// Suspends the spec until `latch` returns true. A `None` timeout uses
    /// the runner's configured default.
    WaitFor {
        latch: Latch,
        timeout: Option<Duration>,
        message: String,
    },
}

impl Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Run(_) => f.write_str("Run"),
            Step::Wait(d) => f.debug_tuple("Wait").field(d).finish(),
            Step::WaitFor {
                timeout, message, ..
            } => f
                .debug_struct("WaitFor")
                .field("timeout", timeout)
                .field("message", message)
                .finish(),
        }
    }
}

/// Collects the expectations, failures and log lines of one step.
#[derive(Debug, Default)]
pub struct SpecContext {
    full_name: String,
    pub(crate) expectations: usize,
    pub(crate) failures: Vec<Failure>,
    pub(crate) logs: Vec<String>,
}

impl SpecContext {
    pub(crate) fn new(full_name: String) -> Self {
        Self {
            full_name,
            ..Self::default()
        }
    }

    /// Full name of the running spec.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Start an expectation about `actual`.
    pub fn expect<T: Debug + PartialEq>(&mut self, actual: T) -> Expectation<'_, T> {
        Expectation { ctx: self, actual }
    }

    /// Record an unconditional assertion failure.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.expectations += 1;
        self.failures.push(Failure::assertion(message));
    }

    /// Forward a message to reporters with the log capability.
    pub fn log(&mut self, message: impl Into<String>) {
        self.logs.push(message.into());
    }

    fn record(&mut self, passed: bool, message: impl FnOnce() -> String) -> bool {
        self.expectations += 1;
        if !passed {
            self.failures.push(Failure::assertion(message()));
        }
        passed
    }
}

/// A pending assertion. Each matcher records exactly one expectation and
/// returns whether it held; failures never abort the step.
pub struct Expectation<'a, T> {
    ctx: &'a mut SpecContext,
    actual: T,
}

impl<T: Debug + PartialEq> Expectation<'_, T> {
    pub fn to_equal(self, expected: T) -> bool {
        let passed = self.actual == expected;
        let actual = self.actual;
        self.ctx.record(passed, || {
            format!("Expected {actual:?} to equal {expected:?}.")
        })
    }

    pub fn not_to_equal(self, expected: T) -> bool {
        let passed = self.actual != expected;
        let actual = self.actual;
        self.ctx.record(passed, || {
            format!("Expected {actual:?} not to equal {expected:?}.")
        })
    }
}

impl Expectation<'_, bool> {
    pub fn to_be_true(self) -> bool {
        let passed = self.actual;
        self.ctx.record(passed, || "Expected false to be true.".to_string())
    }

    pub fn to_be_false(self) -> bool {
        let passed = !self.actual;
        self.ctx.record(passed, || "Expected true to be false.".to_string())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
