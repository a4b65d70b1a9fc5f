// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Delay and repeating-timer scheduling.
//!
//! The queue never touches a concrete timer. It schedules through the
//! [`Clock`] trait, so tests swap in [`FakeClock`] and advance virtual time
//! by hand, while real runs use [`SystemClock`].

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

/// Identifies a scheduled timer for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Scheduling capability consumed by the queue.
///
/// All methods take `&self`: clocks are shared behind `Rc<dyn Clock>` and
/// callbacks routinely schedule further timers while a clock is firing.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;

    /// Run `callback` once, `delay` from now.
    fn schedule_delay(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;

    /// Cancel a pending delay. Unknown or already-fired handles are ignored.
    fn cancel_delay(&self, handle: TimerHandle);

    /// Run `callback` every `interval` until cancelled.
    fn schedule_repeating(&self, interval: Duration, callback: Box<dyn FnMut()>) -> TimerHandle;

    /// Cancel a repeating timer, including from inside its own callback.
    fn cancel_repeating(&self, handle: TimerHandle);
}

/// Repeating timers never fire more often than this, so a zero interval
/// cannot spin a tick forever.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

enum TimerKind {
    Once(Box<dyn FnOnce()>),
    Repeating {
        interval: Duration,
        callback: Box<dyn FnMut()>,
    },
}

struct Timer {
    id: u64,
    deadline: Duration,
    seq: u64,
    kind: TimerKind,
}

/// Pending timers, shared by both clock implementations.
#[derive(Default)]
struct Timers {
    entries: Vec<Timer>,
    next_id: u64,
    next_seq: u64,
    /// Repeating timer currently out of the table being fired, and whether
    /// it was cancelled while its callback ran.
    firing: Option<(u64, bool)>,
}

impl Timers {
    fn insert(&mut self, deadline: Duration, kind: TimerKind) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.push(id, deadline, kind);
        TimerHandle(id)
    }

    fn push(&mut self, id: u64, deadline: Duration, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Timer { id, deadline, seq, kind });
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(pos) = self.entries.iter().position(|t| t.id == handle.0) {
            self.entries.remove(pos);
        } else if let Some((id, cancelled)) = self.firing.as_mut()
            && *id == handle.0
        {
            *cancelled = true;
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|t| t.deadline).min()
    }

    /// Remove the earliest timer due at or before `now`. Ties go to the
    /// timer registered first.
    fn pop_due(&mut self, now: Duration) -> Option<Timer> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(i, _)| i)?;
        Some(self.entries.remove(pos))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Invoke a popped timer without holding the table borrow, so the callback
/// may schedule or cancel freely.
fn fire(timers: &RefCell<Timers>, timer: Timer) {
    match timer.kind {
        TimerKind::Once(callback) => callback(),
        TimerKind::Repeating {
            interval,
            mut callback,
        } => {
            timers.borrow_mut().firing = Some((timer.id, false));
            callback();
            let mut table = timers.borrow_mut();
            let cancelled = matches!(table.firing.take(), Some((_, true)));
            if !cancelled {
                table.push(
                    timer.id,
                    timer.deadline + interval,
                    TimerKind::Repeating { interval, callback },
                );
            }
        }
    }
}

/// Deterministic clock whose time only moves when [`FakeClock::tick`] is
/// called.
#[derive(Default)]
pub struct FakeClock {
    now: Cell<Duration>,
    timers: RefCell<Timers>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance virtual time by `by`, firing every timer whose deadline falls
    /// inside the window in deadline order.
    ///
    /// During a callback, [`Clock::now`] reads as that timer's deadline, so
    /// timers scheduled from a callback are relative to when it fired and
    /// fire in this same tick if they land inside the window.
    pub fn tick(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let due = self.timers.borrow_mut().pop_due(target);
            let Some(timer) = due else {
                break;
            };
            if timer.deadline > self.now.get() {
                self.now.set(timer.deadline);
            }
            fire(&self.timers, timer);
        }
        // A callback may have ticked further ahead.
        self.now.set(target.max(self.now.get()));
    }

    /// Number of timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn schedule_delay(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let deadline = self.now.get() + delay;
        self.timers
            .borrow_mut()
            .insert(deadline, TimerKind::Once(callback))
    }

    fn cancel_delay(&self, handle: TimerHandle) {
        self.timers.borrow_mut().cancel(handle);
    }

    fn schedule_repeating(&self, interval: Duration, callback: Box<dyn FnMut()>) -> TimerHandle {
        let interval = interval.max(MIN_INTERVAL);
        let deadline = self.now.get() + interval;
        self.timers
            .borrow_mut()
            .insert(deadline, TimerKind::Repeating { interval, callback })
    }

    fn cancel_repeating(&self, handle: TimerHandle) {
        self.timers.borrow_mut().cancel(handle);
    }
}

/// Wall-clock timers fired from [`SystemClock::run_until_idle`].
pub struct SystemClock {
    origin: Instant,
    timers: RefCell<Timers>,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            timers: RefCell::new(Timers::default()),
        }
    }

    /// Sleep until each pending timer is due and fire it, returning once no
    /// timers remain. Never returns while an uncancelled repeating timer
    /// exists.
    pub fn run_until_idle(&self) {
        loop {
            let next = self.timers.borrow().next_deadline();
            let Some(deadline) = next else {
                return;
            };
            let now = self.now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            loop {
                let due = self.timers.borrow_mut().pop_due(self.now());
                let Some(timer) = due else {
                    break;
                };
                fire(&self.timers, timer);
            }
        }
    }

    /// Whether any timer is still waiting to fire.
    pub fn has_pending(&self) -> bool {
        self.timers.borrow().len() > 0
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn schedule_delay(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let deadline = self.now() + delay;
        self.timers
            .borrow_mut()
            .insert(deadline, TimerKind::Once(callback))
    }

    fn cancel_delay(&self, handle: TimerHandle) {
        self.timers.borrow_mut().cancel(handle);
    }

    fn schedule_repeating(&self, interval: Duration, callback: Box<dyn FnMut()>) -> TimerHandle {
        let interval = interval.max(MIN_INTERVAL);
        let deadline = self.now() + interval;
        self.timers
            .borrow_mut()
            .insert(deadline, TimerKind::Repeating { interval, callback })
    }

    fn cancel_repeating(&self, handle: TimerHandle) {
        self.timers.borrow_mut().cancel(handle);
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
