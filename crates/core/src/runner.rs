// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run orchestration.
//!
//! The runner owns the suite tree, a queue and the registered reporters.
//! `execute` walks `Idle → Starting → Running → Completed`; a run always
//! completes and always delivers exactly one runner-results notification,
//! whatever the specs do.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::clock::Clock;
use crate::config::RunnerConfig;
use crate::context::{Latch, RunBlock, SpecContext, Step};
use crate::error::{DefinitionError, NodeKind, RunnerError};
use crate::queue::{Block, Queue, Until};
use crate::reporter::Reporter;
use crate::results::{Failure, ResultSet, SpecOutcome};
use crate::tree::{Node, SpecId, SuiteId, SuiteTree};

/// Lifecycle of a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Starting,
    Running,
    Completed,
}

struct RunnerInner {
    clock: Rc<dyn Clock>,
    config: RunnerConfig,
    queue: Queue,
    tree: RefCell<SuiteTree>,
    reporters: RefCell<Vec<Reporter>>,
    metadata: RefCell<BTreeMap<String, serde_json::Value>>,
    state: Cell<RunnerState>,
    started_at: Cell<Option<Duration>>,
    finished_at: Cell<Option<Duration>>,
}

/// Handle to a runner. Clones share one runner, and reporters receive the
/// same handle the caller holds.
#[derive(Clone)]
pub struct Runner {
    inner: Rc<RunnerInner>,
}

/// Non-owning runner handle, used by queued blocks and reporters that
/// outlive a notification.
#[derive(Clone)]
pub struct WeakRunner {
    inner: Weak<RunnerInner>,
}

impl WeakRunner {
    pub fn upgrade(&self) -> Option<Runner> {
        self.inner.upgrade().map(|inner| Runner { inner })
    }
}

impl Runner {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self::with_config(clock, RunnerConfig::default())
    }

    pub fn with_config(clock: Rc<dyn Clock>, config: RunnerConfig) -> Self {
        let queue = Queue::new(clock.clone(), config.queue.poll_interval());
        Self {
            inner: Rc::new(RunnerInner {
                clock,
                config,
                queue,
                tree: RefCell::new(SuiteTree::default()),
                reporters: RefCell::new(Vec::new()),
                metadata: RefCell::new(BTreeMap::new()),
                state: Cell::new(RunnerState::Idle),
                started_at: Cell::new(None),
                finished_at: Cell::new(None),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakRunner {
        WeakRunner {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same runner.
    pub fn ptr_eq(a: &Runner, b: &Runner) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.inner.clock
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.inner.config
    }

    pub fn queue(&self) -> &Queue {
        &self.inner.queue
    }

    pub fn state(&self) -> RunnerState {
        self.inner.state.get()
    }

    pub fn is_complete(&self) -> bool {
        self.state() == RunnerState::Completed
    }

    // --- definition ---

    /// Define a top-level suite. `define` receives a builder for the suite's
    /// children.
    pub fn describe(
        &self,
        description: impl Into<String>,
        define: impl FnOnce(&mut SuiteBuilder<'_>) -> Result<(), DefinitionError>,
    ) -> Result<SuiteId, DefinitionError> {
        self.define_suite(None, description.into(), false, define)
    }

    /// Define a top-level suite that is built but never run or counted.
    pub fn xdescribe(
        &self,
        description: impl Into<String>,
        define: impl FnOnce(&mut SuiteBuilder<'_>) -> Result<(), DefinitionError>,
    ) -> Result<SuiteId, DefinitionError> {
        self.define_suite(None, description.into(), true, define)
    }

    fn check_definable(&self, kind: NodeKind, description: &str) -> Result<(), DefinitionError> {
        if self.state() != RunnerState::Idle {
            return Err(DefinitionError::RunnerNotIdle {
                kind,
                description: description.to_string(),
            });
        }
        if description.trim().is_empty() {
            return Err(DefinitionError::EmptyDescription { kind });
        }
        Ok(())
    }

    fn define_suite(
        &self,
        parent: Option<SuiteId>,
        description: String,
        excluded: bool,
        define: impl FnOnce(&mut SuiteBuilder<'_>) -> Result<(), DefinitionError>,
    ) -> Result<SuiteId, DefinitionError> {
        self.check_definable(NodeKind::Suite, &description)?;
        let (mark, id) = {
            let mut tree = self.inner.tree.borrow_mut();
            let mark = tree.mark();
            (mark, tree.add_suite(parent, description, excluded))
        };
        let mut builder = SuiteBuilder {
            runner: self,
            suite: id,
        };
        if let Err(err) = define(&mut builder) {
            self.inner.tree.borrow_mut().rollback(mark);
            return Err(err);
        }
        Ok(id)
    }

    fn define_spec(
        &self,
        suite: SuiteId,
        description: String,
        excluded: bool,
        define: impl FnOnce(&mut SpecBuilder),
    ) -> Result<SpecId, DefinitionError> {
        self.check_definable(NodeKind::Spec, &description)?;
        let mut builder = SpecBuilder::default();
        define(&mut builder);
        Ok(self
            .inner
            .tree
            .borrow_mut()
            .add_spec(suite, description, builder.steps, excluded))
    }

    // --- inspection ---

    /// Read access to the suite tree. Do not call back into definition or
    /// execution from `read`.
    pub fn with_tree<R>(&self, read: impl FnOnce(&SuiteTree) -> R) -> R {
        read(&*self.inner.tree.borrow())
    }

    /// Every suite, included or excluded, depth-first pre-order.
    pub fn suites(&self) -> Vec<SuiteId> {
        self.with_tree(SuiteTree::flatten)
    }

    pub fn top_level_suites(&self) -> Vec<SuiteId> {
        self.with_tree(|tree| tree.roots().to_vec())
    }

    pub fn suite_full_name(&self, id: SuiteId) -> String {
        self.with_tree(|tree| tree.suite_full_name(id))
    }

    pub fn spec_full_name(&self, id: SpecId) -> String {
        self.with_tree(|tree| tree.spec_full_name(id))
    }

    /// Counts over every finished, non-excluded spec. Safe to call at any
    /// point, including from reporters and steps.
    pub fn results(&self) -> ResultSet {
        self.with_tree(SuiteTree::results)
    }

    pub fn suite_results(&self, id: SuiteId) -> ResultSet {
        self.with_tree(|tree| tree.suite_results(id))
    }

    pub fn spec_results(&self, id: SpecId) -> ResultSet {
        self.with_tree(|tree| tree.spec(id).results())
    }

    /// Clock time between `execute` and completion.
    pub fn elapsed(&self) -> Option<Duration> {
        let start = self.inner.started_at.get()?;
        let end = self
            .inner
            .finished_at
            .get()
            .unwrap_or_else(|| self.inner.clock.now());
        Some(end.saturating_sub(start))
    }

    // --- metadata & reporters ---

    /// Attach an arbitrary value, visible to reporters through the runner
    /// they receive.
    pub fn set_metadata(&self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.inner
            .metadata
            .borrow_mut()
            .insert(key.into(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<serde_json::Value> {
        self.inner.metadata.borrow().get(key).cloned()
    }

    /// Copy of every attached value, ordered by key.
    pub fn metadata_snapshot(&self) -> BTreeMap<String, serde_json::Value> {
        self.inner.metadata.borrow().clone()
    }

    pub fn add_reporter(&self, reporter: Reporter) {
        tracing::debug!(
            "reporter {} registered: {:?}",
            reporter.name(),
            reporter.capabilities()
        );
        self.inner.reporters.borrow_mut().push(reporter);
    }

    pub fn reporter_count(&self) -> usize {
        self.inner.reporters.borrow().len()
    }

    /// Deliver one notification to every reporter. Reporters are taken out
    /// for the duration so handlers may register more reporters; a panicking
    /// handler is logged and the rest still run.
    fn dispatch(&self, mut notify: impl FnMut(&mut Reporter)) {
        let mut reporters = std::mem::take(&mut *self.inner.reporters.borrow_mut());
        for reporter in &mut reporters {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| notify(reporter)));
            if let Err(payload) = outcome {
                tracing::warn!(
                    "reporter {} panicked: {}",
                    reporter.name(),
                    panic_message(payload.as_ref())
                );
            }
        }
        let mut slot = self.inner.reporters.borrow_mut();
        let added = std::mem::replace(&mut *slot, reporters);
        slot.extend(added);
    }

    // --- execution ---

    /// Start the run. Reporters hear "runner starting" before anything
    /// executes; specs without waits finish before this returns.
    pub fn execute(&self) -> Result<(), RunnerError> {
        let state = self.state();
        if state != RunnerState::Idle {
            return Err(RunnerError::AlreadyStarted { state });
        }
        self.inner.state.set(RunnerState::Starting);
        self.inner.started_at.set(Some(self.inner.clock.now()));
        tracing::debug!("runner starting");
        self.dispatch(|r| r.notify_runner_starting(self));

        let roots: Vec<SuiteId> = self.with_tree(|tree| {
            tree.roots()
                .iter()
                .copied()
                .filter(|&id| !tree.is_suite_excluded(id))
                .collect()
        });
        for id in roots {
            self.inner.queue.add(self.suite_block(id));
        }
        let weak = self.downgrade();
        self.inner.queue.on_complete(move || {
            if let Some(runner) = weak.upgrade() {
                runner.finish();
            }
        });

        self.inner.state.set(RunnerState::Running);
        self.inner.queue.start();
        Ok(())
    }

    fn finish(&self) {
        self.inner.finished_at.set(Some(self.inner.clock.now()));
        self.inner.state.set(RunnerState::Completed);
        let results = self.results();
        tracing::debug!(
            "runner completed: {} total, {} passed, {} failed",
            results.total_count,
            results.passed_count,
            results.failed_count
        );
        self.dispatch(|r| r.notify_runner_results(self));
    }

    /// Wrap `action` so it runs against this runner if it is still alive.
    fn deferred(&self, action: impl FnOnce(&Runner) + 'static) -> Box<dyn FnOnce()> {
        let weak = self.downgrade();
        Box::new(move || {
            if let Some(runner) = weak.upgrade() {
                action(&runner);
            }
        })
    }

    fn suite_block(&self, id: SuiteId) -> Block {
        let weak = self.downgrade();
        Block::Expand(Box::new(move || match weak.upgrade() {
            Some(runner) => runner.suite_blocks(id),
            None => Vec::new(),
        }))
    }

    fn suite_blocks(&self, id: SuiteId) -> Vec<Block> {
        let children: Vec<Node> = self.with_tree(|tree| {
            tree.suite(id)
                .children()
                .iter()
                .copied()
                .filter(|node| match *node {
                    Node::Suite(child) => !tree.is_suite_excluded(child),
                    Node::Spec(spec) => !tree.is_spec_excluded(spec),
                })
                .collect()
        });
        tracing::trace!("suite {} starting", self.suite_full_name(id));

        let mut blocks: Vec<Block> = children
            .into_iter()
            .map(|node| match node {
                Node::Suite(child) => self.suite_block(child),
                Node::Spec(spec) => self.spec_block(spec),
            })
            .collect();
        blocks.push(Block::Sync(self.deferred(move |runner| {
            runner.dispatch(|r| r.notify_suite_results(runner, id));
        })));
        blocks
    }

    fn spec_block(&self, id: SpecId) -> Block {
        let weak = self.downgrade();
        Block::Expand(Box::new(move || match weak.upgrade() {
            Some(runner) => runner.spec_blocks(id),
            None => Vec::new(),
        }))
    }

    fn spec_blocks(&self, id: SpecId) -> Vec<Block> {
        let steps = std::mem::take(&mut self.inner.tree.borrow_mut().spec_mut(id).steps);
        tracing::debug!("spec {} starting", self.spec_full_name(id));

        let mut blocks = Vec::with_capacity(steps.len() + 2);
        blocks.push(Block::Sync(self.deferred(move |runner| {
            runner.dispatch(|r| r.notify_spec_starting(runner, id));
        })));
        for step in steps {
            blocks.push(match step {
                Step::Run(block) => {
                    Block::Sync(self.deferred(move |runner| runner.run_step(id, block)))
                }
                Step::Wait(delay) => Block::Wait(delay),
                Step::WaitFor {
                    latch,
                    timeout,
                    message,
                } => Block::Until(self.latch_wait(id, latch, timeout, message)),
            });
        }
        blocks.push(Block::Sync(
            self.deferred(move |runner| runner.finish_spec(id)),
        ));
        blocks
    }

    fn run_step(&self, id: SpecId, mut block: RunBlock) {
        let mut ctx = SpecContext::new(self.spec_full_name(id));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| block(&mut ctx)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => ctx.failures.push(Failure::runtime(format!("{err:#}"))),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!("step in {} panicked: {}", ctx.full_name(), message);
                ctx.failures
                    .push(Failure::runtime(format!("step panicked: {message}")));
            }
        }

        let SpecContext {
            expectations,
            failures,
            logs,
            ..
        } = ctx;
        {
            let mut tree = self.inner.tree.borrow_mut();
            let spec = tree.spec_mut(id);
            spec.expectations += expectations;
            spec.failures.extend(failures);
        }
        for line in logs {
            self.dispatch(|r| r.notify_log(&line));
        }
    }

    fn record_failure(&self, id: SpecId, failure: Failure) {
        self.inner
            .tree
            .borrow_mut()
            .spec_mut(id)
            .failures
            .push(failure);
    }

    fn latch_wait(
        &self,
        id: SpecId,
        mut latch: Latch,
        timeout: Option<Duration>,
        message: String,
    ) -> Until {
        let timeout = timeout.unwrap_or_else(|| self.inner.config.waits_for.timeout());
        let weak = self.downgrade();
        let guarded: Latch = Box::new(move || {
            match panic::catch_unwind(AssertUnwindSafe(|| latch())) {
                Ok(holds) => holds,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    if let Some(runner) = weak.upgrade() {
                        runner.record_failure(
                            id,
                            Failure::runtime(format!("latch panicked: {message}")),
                        );
                    }
                    true
                }
            }
        });
        let waiting_for = if message.trim().is_empty() {
            "something to happen".to_string()
        } else {
            message
        };
        Until {
            latch: guarded,
            timeout,
            on_timeout: self.deferred(move |runner| {
                runner.record_failure(
                    id,
                    Failure::timeout(format!(
                        "timed out after {} msec waiting for {waiting_for}",
                        timeout.as_millis()
                    )),
                );
            }),
        }
    }

    fn finish_spec(&self, id: SpecId) {
        let outcome = {
            let mut tree = self.inner.tree.borrow_mut();
            let spec = tree.spec_mut(id);
            let outcome = if spec.failures.is_empty() {
                SpecOutcome::Passed
            } else {
                SpecOutcome::Failed
            };
            spec.outcome = Some(outcome);
            outcome
        };
        tracing::debug!("spec {} {:?}", self.spec_full_name(id), outcome);
        self.dispatch(|r| r.notify_spec_results(self, id));
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("state", &self.state())
            .field("results", &self.results())
            .field("metadata", &*self.inner.metadata.borrow())
            .finish_non_exhaustive()
    }
}

/// Definition context for one suite's children.
pub struct SuiteBuilder<'a> {
    runner: &'a Runner,
    suite: SuiteId,
}

impl SuiteBuilder<'_> {
    /// The suite being defined.
    pub fn id(&self) -> SuiteId {
        self.suite
    }

    pub fn describe(
        &mut self,
        description: impl Into<String>,
        define: impl FnOnce(&mut SuiteBuilder<'_>) -> Result<(), DefinitionError>,
    ) -> Result<SuiteId, DefinitionError> {
        self.runner
            .define_suite(Some(self.suite), description.into(), false, define)
    }

    pub fn xdescribe(
        &mut self,
        description: impl Into<String>,
        define: impl FnOnce(&mut SuiteBuilder<'_>) -> Result<(), DefinitionError>,
    ) -> Result<SuiteId, DefinitionError> {
        self.runner
            .define_suite(Some(self.suite), description.into(), true, define)
    }

    pub fn it(
        &mut self,
        description: impl Into<String>,
        define: impl FnOnce(&mut SpecBuilder),
    ) -> Result<SpecId, DefinitionError> {
        self.runner
            .define_spec(self.suite, description.into(), false, define)
    }

    /// Define a spec that is built but never run or counted.
    pub fn xit(
        &mut self,
        description: impl Into<String>,
        define: impl FnOnce(&mut SpecBuilder),
    ) -> Result<SpecId, DefinitionError> {
        self.runner
            .define_spec(self.suite, description.into(), true, define)
    }
}

/// Collects a spec's steps in order.
#[derive(Default)]
pub struct SpecBuilder {
    steps: Vec<Step>,
}

impl SpecBuilder {
    pub fn runs(
        &mut self,
        block: impl FnMut(&mut SpecContext) -> anyhow::Result<()> + 'static,
    ) -> &mut Self {
        self.steps.push(Step::Run(Box::new(block)));
        self
    }

    pub fn waits(&mut self, delay: Duration) -> &mut Self {
        self.steps.push(Step::Wait(delay));
        self
    }

    /// Wait until `latch` holds, failing the spec after the configured
    /// default timeout.
    pub fn waits_for(
        &mut self,
        message: impl Into<String>,
        latch: impl FnMut() -> bool + 'static,
    ) -> &mut Self {
        self.push_latch(message.into(), None, Box::new(latch))
    }

    pub fn waits_for_within(
        &mut self,
        timeout: Duration,
        message: impl Into<String>,
        latch: impl FnMut() -> bool + 'static,
    ) -> &mut Self {
        self.push_latch(message.into(), Some(timeout), Box::new(latch))
    }

    fn push_latch(&mut self, message: String, timeout: Option<Duration>, latch: Latch) -> &mut Self {
        self.steps.push(Step::WaitFor {
            latch,
            timeout,
            message,
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
