// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized default values for configuration.
//!
//! Config structs delegate to these constants via their `default_*` methods.

/// Queue polling.
pub mod queue {
    /// Interval between latch polls for `waits_for` steps (10ms).
    pub const POLL_INTERVAL_MS: u64 = 10;
}

/// `waits_for` steps.
pub mod waits_for {
    /// Timeout applied when a step does not give its own (5s).
    pub const TIMEOUT_MS: u64 = 5000;
}
