// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Spec outcomes and aggregated result counts.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::Serialize;

/// Final outcome of one spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecOutcome {
    Passed,
    Failed,
}

/// Aggregated counts. `total_count` is always `passed_count + failed_count`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub total_count: usize,
    pub passed_count: usize,
    pub failed_count: usize,
}

impl ResultSet {
    /// Counts for a single finished spec.
    pub fn from_outcome(outcome: SpecOutcome) -> Self {
        match outcome {
            SpecOutcome::Passed => Self {
                total_count: 1,
                passed_count: 1,
                failed_count: 0,
            },
            SpecOutcome::Failed => Self {
                total_count: 1,
                passed_count: 0,
                failed_count: 1,
            },
        }
    }

    pub fn passed(&self) -> bool {
        self.failed_count == 0
    }
}

impl Add for ResultSet {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            total_count: self.total_count + rhs.total_count,
            passed_count: self.passed_count + rhs.passed_count,
            failed_count: self.failed_count + rhs.failed_count,
        }
    }
}

impl AddAssign for ResultSet {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ResultSet {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Why a spec failed. All kinds count the same; the kind only shows up in
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// A failed expectation or an explicit `fail()`.
    Assertion,
    /// A step returned an error or panicked.
    Runtime,
    /// A `waits_for` latch never held.
    Timeout,
}

/// One recorded failure inside a spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn assertion(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Assertion,
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Runtime,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Timeout,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
