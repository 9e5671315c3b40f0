use std::{collections::BTreeMap, fmt};

use super::{Callback, Duration, Instant, Timer};
use crate::sync::{lock, Arc, Mutex};

/// Timer driven by a virtual clock
///
/// Time only moves when [`ManualTimer::advance`] is called, which fires every due
/// callback in order of its due time, so sequences of calls can be replayed
/// deterministically. Clones share the same clock and queue.
///
/// Queued adapter callbacks keep their adapter alive, and the adapter keeps
/// a clone of this timer, so a queue that is never advanced holds on to both.
/// Call [`ManualTimer::clear`] to drop every queued callback.
///
/// # Example
/// ```
/// use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
/// use pacekit::time::{Duration, ManualTimer, Timer};
///
/// let timer = ManualTimer::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = fired.clone();
///
/// timer.schedule(Box::new(move || flag.store(true, Ordering::SeqCst)), Duration::from_millis(10));
///
/// timer.advance(Duration::from_millis(9));
/// assert!(!fired.load(Ordering::SeqCst));
/// timer.advance(Duration::from_millis(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Clone)]
pub struct ManualTimer {
    schedule: Arc<Mutex<Schedule>>,
}

/// Handle of a callback scheduled on [`ManualTimer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualTimerHandle {
    due: Instant,
    id: u64,
}

struct Schedule {
    now: Instant,
    slack: Duration,
    sequence: u64,
    queue: BTreeMap<(Instant, u64), Callback>,
}

impl ManualTimer {
    /// Creates timer with virtual clock starting at the current moment
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates timer with virtual clock starting at provided instant
    pub fn starting_at(now: Instant) -> Self {
        Self {
            schedule: Arc::new(Mutex::new(Schedule {
                now,
                slack: Duration::ZERO,
                sequence: 0,
                queue: BTreeMap::new(),
            })),
        }
    }

    /// Makes every callback fire `slack` later than requested
    ///
    /// Reproduces a host scheduler that is busy when timers become due.
    pub fn with_slack(self, slack: Duration) -> Self {
        lock(&self.schedule).slack = slack;
        self
    }

    /// Moves the clock forward by `by`, firing due callbacks on the way
    ///
    /// Each callback observes [`Timer::now`] equal to its due time.
    /// Callbacks scheduled while advancing fire within the same call when
    /// they become due before the target time.
    pub fn advance(&self, by: Duration) {
        let target = lock(&self.schedule).now + by;

        while let Some(callback) = self.next_due(target) {
            callback();
        }

        let mut schedule = lock(&self.schedule);
        schedule.now = schedule.now.max(target);
    }

    /// Fires callbacks that are due without moving the clock
    pub fn run_due(&self) {
        self.advance(Duration::ZERO)
    }

    /// Number of callbacks waiting to fire
    pub fn pending(&self) -> usize {
        lock(&self.schedule).queue.len()
    }

    /// Drops every queued callback without firing it
    pub fn clear(&self) {
        let queue = std::mem::take(&mut lock(&self.schedule).queue);
        drop(queue);
    }

    fn next_due(&self, target: Instant) -> Option<Callback> {
        let mut schedule = lock(&self.schedule);
        let due = schedule.queue.first_key_value().map(|((due, _), _)| *due)?;

        if due > target {
            return None;
        }

        schedule.now = schedule.now.max(due);
        schedule.queue.pop_first().map(|(_, callback)| callback)
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schedule = lock(&self.schedule);
        f.debug_struct("ManualTimer")
            .field("now", &schedule.now)
            .field("slack", &schedule.slack)
            .field("pending", &schedule.queue.len())
            .finish()
    }
}

impl Timer for ManualTimer {
    type Handle = ManualTimerHandle;

    fn now(&self) -> Instant {
        lock(&self.schedule).now
    }

    fn schedule(&self, callback: Callback, delay: Duration) -> Self::Handle {
        let mut schedule = lock(&self.schedule);
        let due = schedule.now + delay + schedule.slack;
        let id = schedule.sequence;

        schedule.sequence += 1;
        schedule.queue.insert((due, id), callback);

        ManualTimerHandle { due, id }
    }

    fn cancel(&self, handle: Self::Handle) {
        lock(&self.schedule).queue.remove(&(handle.due, handle.id));
    }
}
