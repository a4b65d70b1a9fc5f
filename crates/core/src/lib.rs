// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test-runner core.
//!
//! Specs are grouped into nested suites and run one step at a time on a
//! sequential queue. Timed waits go through an injectable [`Clock`], so a
//! [`FakeClock`] makes a run fully deterministic. Reporters opt into the
//! notifications they care about and receive the runner itself, including
//! any metadata the caller attached.
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use specrun::{EventLog, FakeClock, Runner};
//!
//! let clock = Rc::new(FakeClock::new());
//! let runner = Runner::new(clock.clone());
//! let log = EventLog::new();
//! runner.add_reporter(log.reporter());
//!
//! runner
//!     .describe("math", |s| {
//!         s.it("adds after a pause", |spec| {
//!             spec.waits(Duration::from_millis(200));
//!             spec.runs(|ctx| {
//!                 ctx.expect(1 + 1).to_equal(2);
//!                 Ok(())
//!             });
//!         })?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! runner.execute().unwrap();
//! assert!(log.final_results().is_none());
//!
//! clock.tick(Duration::from_millis(200));
//! assert_eq!(log.final_results().unwrap().passed_count, 1);
//! ```

pub mod clock;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod queue;
pub mod report;
pub mod reporter;
pub mod results;
pub mod runner;
pub mod tree;

#[cfg(test)]
mod test_utils;

pub use clock::{Clock, FakeClock, SystemClock, TimerHandle};
pub use config::RunnerConfig;
pub use context::{SpecContext, Step};
pub use error::{DefinitionError, NodeKind, RunnerError};
pub use queue::{Queue, QueueStatus};
pub use report::{OutputFormat, ReportFormatter, RunSummary, stdout_reporter, writer_reporter};
pub use reporter::{Capability, EventLog, ReportEvent, Reporter};
pub use results::{Failure, FailureKind, ResultSet, SpecOutcome};
pub use runner::{Runner, RunnerState, SpecBuilder, SuiteBuilder, WeakRunner};
pub use tree::{SpecId, SuiteId, SuiteTree};
