// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reporter capabilities.
//!
//! A reporter is a set of optional handlers. The runner calls a handler only
//! if the reporter registered one; a reporter that only cares about the run
//! starting never sees anything else.

use std::cell::RefCell;
use std::rc::Rc;

use crate::results::{ResultSet, SpecOutcome};
use crate::runner::{Runner, WeakRunner};
use crate::tree::{SpecId, SuiteId};

pub type RunnerHook = Box<dyn FnMut(&Runner)>;
pub type SuiteHook = Box<dyn FnMut(&Runner, SuiteId)>;
pub type SpecHook = Box<dyn FnMut(&Runner, SpecId)>;
pub type LogHook = Box<dyn FnMut(&str)>;

/// A notification a reporter may opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    RunnerStarting,
    RunnerResults,
    SuiteResults,
    SpecStarting,
    SpecResults,
    Log,
}

/// Named set of optional notification handlers.
#[derive(Default)]
pub struct Reporter {
    name: String,
    runner_starting: Option<RunnerHook>,
    runner_results: Option<RunnerHook>,
    suite_results: Option<SuiteHook>,
    spec_starting: Option<SpecHook>,
    spec_results: Option<SpecHook>,
    log: Option<LogHook>,
}

impl Reporter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn on_runner_starting(mut self, hook: impl FnMut(&Runner) + 'static) -> Self {
        self.runner_starting = Some(Box::new(hook));
        self
    }

    pub fn on_runner_results(mut self, hook: impl FnMut(&Runner) + 'static) -> Self {
        self.runner_results = Some(Box::new(hook));
        self
    }

    pub fn on_suite_results(mut self, hook: impl FnMut(&Runner, SuiteId) + 'static) -> Self {
        self.suite_results = Some(Box::new(hook));
        self
    }

    pub fn on_spec_starting(mut self, hook: impl FnMut(&Runner, SpecId) + 'static) -> Self {
        self.spec_starting = Some(Box::new(hook));
        self
    }

    pub fn on_spec_results(mut self, hook: impl FnMut(&Runner, SpecId) + 'static) -> Self {
        self.spec_results = Some(Box::new(hook));
        self
    }

    pub fn on_log(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.log = Some(Box::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handles(&self, capability: Capability) -> bool {
        match capability {
            Capability::RunnerStarting => self.runner_starting.is_some(),
            Capability::RunnerResults => self.runner_results.is_some(),
            Capability::SuiteResults => self.suite_results.is_some(),
            Capability::SpecStarting => self.spec_starting.is_some(),
            Capability::SpecResults => self.spec_results.is_some(),
            Capability::Log => self.log.is_some(),
        }
    }

    /// The capabilities this reporter registered, in declaration order.
    pub fn capabilities(&self) -> Vec<Capability> {
        [
            Capability::RunnerStarting,
            Capability::RunnerResults,
            Capability::SuiteResults,
            Capability::SpecStarting,
            Capability::SpecResults,
            Capability::Log,
        ]
        .into_iter()
        .filter(|&c| self.handles(c))
        .collect()
    }

    pub(crate) fn notify_runner_starting(&mut self, runner: &Runner) {
        if let Some(hook) = self.runner_starting.as_mut() {
            hook(runner);
        }
    }

    pub(crate) fn notify_runner_results(&mut self, runner: &Runner) {
        if let Some(hook) = self.runner_results.as_mut() {
            hook(runner);
        }
    }

    pub(crate) fn notify_suite_results(&mut self, runner: &Runner, suite: SuiteId) {
        if let Some(hook) = self.suite_results.as_mut() {
            hook(runner, suite);
        }
    }

    pub(crate) fn notify_spec_starting(&mut self, runner: &Runner, spec: SpecId) {
        if let Some(hook) = self.spec_starting.as_mut() {
            hook(runner, spec);
        }
    }

    pub(crate) fn notify_spec_results(&mut self, runner: &Runner, spec: SpecId) {
        if let Some(hook) = self.spec_results.as_mut() {
            hook(runner, spec);
        }
    }

    pub(crate) fn notify_log(&mut self, message: &str) {
        if let Some(hook) = self.log.as_mut() {
            hook(message);
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

/// A notification as seen by [`EventLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    RunnerStarting,
    RunnerResults(ResultSet),
    SuiteResults { name: String, results: ResultSet },
    SpecStarting(String),
    SpecResults { name: String, outcome: SpecOutcome },
    Log(String),
}

/// Collects every notification for programmatic inspection after (or
/// during) a run.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<ReportEvent>>>,
    last_runner: Rc<RefCell<Option<WeakRunner>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter with every capability, feeding this log.
    pub fn reporter(&self) -> Reporter {
        let starting = self.clone();
        let results = self.clone();
        let suites = self.clone();
        let spec_start = self.clone();
        let specs = self.clone();
        let logs = self.clone();
        Reporter::new("event-log")
            .on_runner_starting(move |runner| {
                starting.saw(runner);
                starting.push(ReportEvent::RunnerStarting);
            })
            .on_runner_results(move |runner| {
                results.saw(runner);
                results.push(ReportEvent::RunnerResults(runner.results()));
            })
            .on_suite_results(move |runner, id| {
                suites.push(ReportEvent::SuiteResults {
                    name: runner.suite_full_name(id),
                    results: runner.suite_results(id),
                });
            })
            .on_spec_starting(move |runner, id| {
                spec_start.push(ReportEvent::SpecStarting(runner.spec_full_name(id)));
            })
            .on_spec_results(move |runner, id| {
                let outcome = runner.with_tree(|tree| tree.spec(id).outcome());
                if let Some(outcome) = outcome {
                    specs.push(ReportEvent::SpecResults {
                        name: runner.spec_full_name(id),
                        outcome,
                    });
                }
            })
            .on_log(move |message| logs.push(ReportEvent::Log(message.to_string())))
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.borrow().clone()
    }

    /// Final counts, once the run has completed.
    pub fn final_results(&self) -> Option<ResultSet> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            ReportEvent::RunnerResults(results) => Some(*results),
            _ => None,
        })
    }

    /// The runner passed to the most recent runner-level notification, if
    /// it is still alive.
    pub fn last_runner(&self) -> Option<Runner> {
        self.last_runner.borrow().as_ref().and_then(WeakRunner::upgrade)
    }

    fn push(&self, event: ReportEvent) {
        self.events.borrow_mut().push(event);
    }

    fn saw(&self, runner: &Runner) {
        *self.last_runner.borrow_mut() = Some(runner.downgrade());
    }
}

#[cfg(test)]
#[path = "reporter_tests.rs"]
mod tests;
