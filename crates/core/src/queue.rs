// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential block executor.
//!
//! Blocks run one at a time in order. Synchronous blocks run to completion
//! on the spot; waits hand control back to the clock and the queue resumes
//! from the clock callback. Nothing here knows about suites or specs: the
//! runner expresses them as [`Block::Expand`] blocks that unfold lazily.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::clock::{Clock, TimerHandle};
use crate::context::Latch;

/// A unit of work for the queue.
pub enum Block {
    /// Runs immediately.
    Sync(Box<dyn FnOnce()>),
    /// Suspends the queue until the clock has advanced by the duration.
    Wait(Duration),
    /// Produces blocks that run before anything already queued after it.
    Expand(Box<dyn FnOnce() -> Vec<Block>>),
    /// Suspends the queue until a latch holds or its timeout elapses.
    Until(Until),
}

/// Latch wait: polled immediately, then on every poll interval.
pub struct Until {
    pub latch: Latch,
    pub timeout: Duration,
    /// Runs once if the timeout elapses before the latch holds.
    pub on_timeout: Box<dyn FnOnce()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    Idle,
    Running,
    /// Suspended on a wait or latch.
    Waiting,
    Completed,
}

struct Polling {
    until: Until,
    deadline: Duration,
    handle: Option<TimerHandle>,
}

struct QueueState {
    pending: VecDeque<Block>,
    status: QueueStatus,
    on_complete: Option<Box<dyn FnOnce()>>,
    polling: Option<Polling>,
}

struct QueueInner {
    clock: Rc<dyn Clock>,
    poll_interval: Duration,
    state: RefCell<QueueState>,
    starts: Cell<usize>,
}

/// Handle to a queue. Clones share the same queue.
#[derive(Clone)]
pub struct Queue {
    inner: Rc<QueueInner>,
}

impl Queue {
    pub fn new(clock: Rc<dyn Clock>, poll_interval: Duration) -> Self {
        Self {
            inner: Rc::new(QueueInner {
                clock,
                poll_interval,
                state: RefCell::new(QueueState {
                    pending: VecDeque::new(),
                    status: QueueStatus::Idle,
                    on_complete: None,
                    polling: None,
                }),
                starts: Cell::new(0),
            }),
        }
    }

    /// Append a block after everything already queued.
    pub fn add(&self, block: Block) {
        self.inner.state.borrow_mut().pending.push_back(block);
    }

    /// Set the callback run once when the last block finishes.
    pub fn on_complete(&self, callback: impl FnOnce() + 'static) {
        self.inner.state.borrow_mut().on_complete = Some(Box::new(callback));
    }

    /// Begin executing from the first block. Only an idle queue starts;
    /// later calls are counted but otherwise ignored.
    pub fn start(&self) {
        self.inner.starts.set(self.inner.starts.get() + 1);
        {
            let mut state = self.inner.state.borrow_mut();
            if state.status != QueueStatus::Idle {
                tracing::warn!("queue start ignored: already {:?}", state.status);
                return;
            }
            state.status = QueueStatus::Running;
        }
        tracing::debug!("queue started");
        drive(&self.inner);
    }

    /// How many times [`Queue::start`] has been called.
    pub fn start_count(&self) -> usize {
        self.inner.starts.get()
    }

    pub fn status(&self) -> QueueStatus {
        self.inner.state.borrow().status
    }

    /// Blocks not yet taken off the queue. Unexpanded blocks count as one.
    pub fn pending(&self) -> usize {
        self.inner.state.borrow().pending.len()
    }
}

fn set_status(inner: &QueueInner, status: QueueStatus) {
    inner.state.borrow_mut().status = status;
}

/// Run blocks until the queue drains or suspends. Never holds the state
/// borrow while a block runs, so blocks may add to or inspect the queue.
fn drive(inner: &Rc<QueueInner>) {
    loop {
        let next = inner.state.borrow_mut().pending.pop_front();
        match next {
            None => {
                complete(inner);
                return;
            }
            Some(Block::Sync(run)) => run(),
            Some(Block::Expand(expand)) => {
                let blocks = expand();
                let mut state = inner.state.borrow_mut();
                for block in blocks.into_iter().rev() {
                    state.pending.push_front(block);
                }
            }
            Some(Block::Wait(delay)) => {
                set_status(inner, QueueStatus::Waiting);
                tracing::trace!("queue waiting {:?}", delay);
                let weak = Rc::downgrade(inner);
                inner.clock.schedule_delay(
                    delay,
                    Box::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            set_status(&inner, QueueStatus::Running);
                            drive(&inner);
                        }
                    }),
                );
                return;
            }
            Some(Block::Until(mut until)) => {
                if (until.latch)() {
                    continue;
                }
                suspend_on_latch(inner, until);
                return;
            }
        }
    }
}

fn suspend_on_latch(inner: &Rc<QueueInner>, until: Until) {
    let deadline = inner.clock.now() + until.timeout;
    {
        let mut state = inner.state.borrow_mut();
        state.status = QueueStatus::Waiting;
        state.polling = Some(Polling {
            until,
            deadline,
            handle: None,
        });
    }
    tracing::trace!("queue polling latch until {:?}", deadline);
    let weak: Weak<QueueInner> = Rc::downgrade(inner);
    let handle = inner.clock.schedule_repeating(
        inner.poll_interval,
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                poll(&inner);
            }
        }),
    );
    if let Some(polling) = inner.state.borrow_mut().polling.as_mut() {
        polling.handle = Some(handle);
    }
}

fn poll(inner: &Rc<QueueInner>) {
    let polling = inner.state.borrow_mut().polling.take();
    let Some(mut polling) = polling else {
        return;
    };
    let holds = (polling.until.latch)();
    let timed_out = !holds && inner.clock.now() >= polling.deadline;
    if !holds && !timed_out {
        inner.state.borrow_mut().polling = Some(polling);
        return;
    }
    if let Some(handle) = polling.handle {
        inner.clock.cancel_repeating(handle);
    }
    if timed_out {
        tracing::debug!("latch timed out after {:?}", polling.until.timeout);
        (polling.until.on_timeout)();
    }
    set_status(inner, QueueStatus::Running);
    drive(inner);
}

fn complete(inner: &QueueInner) {
    let callback = {
        let mut state = inner.state.borrow_mut();
        state.status = QueueStatus::Completed;
        state.on_complete.take()
    };
    tracing::debug!("queue completed");
    if let Some(callback) = callback {
        callback();
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
