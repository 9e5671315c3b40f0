//! Throttle adapter.
//!
//! Runs the wrapped action at most once per `window`, measured from the
//! previous run. The first call after an idle window runs right away
//! (leading edge), the latest call made inside a window runs once the
//! window is over (trailing edge). Arguments of calls in between are dropped.

use std::fmt;

use tracing::{debug, trace};

use crate::{
    pending::PendingSlot,
    sync::{lock, Arc, Mutex},
    time::{Callback, Duration, Instant, Timer, TokioTimer},
    Action, PacingError,
};

/// Throttled action
///
/// Clones share the same window, separately created adapters never
/// interfere with each other.
pub struct Throttled<Args, Tm: Timer = TokioTimer> {
    inner: Arc<Inner<Args, Tm>>,
}

struct Inner<Args, Tm: Timer> {
    timer: Tm,
    window: Duration,
    action: Action<Args>,
    state: Mutex<ThrottleState<Tm::Handle>>,
}

struct ThrottleState<H> {
    last_run_at: Option<Instant>,
    trailing: PendingSlot<H>,
}

impl<H> ThrottleState<H> {
    /// Time left in the current window, `None` when the action may run now
    fn remaining(&self, now: Instant, window: Duration) -> Option<Duration> {
        let last_run_at = self.last_run_at?;

        window
            .checked_sub(now.saturating_duration_since(last_run_at))
            .filter(|remaining| !remaining.is_zero())
    }

    fn mark_run(&mut self, now: Instant) {
        self.last_run_at = Some(self.last_run_at.map_or(now, |last| last.max(now)));
    }
}

impl<Args> Throttled<Args, TokioTimer>
where
    Args: Send + 'static,
{
    /// Creates throttled action driven by the current tokio runtime
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use pacekit::prelude::*;
    ///
    /// #[tokio::main(flavor = "current_thread", start_paused = true)]
    /// async fn main() {
    ///     let positions = Arc::new(Mutex::new(Vec::new()));
    ///     let sink = positions.clone();
    ///     let on_scroll = Throttled::new(Duration::from_millis(100), move |offset: u32| {
    ///         sink.lock().unwrap().push(offset)
    ///     })
    ///     .unwrap();
    ///
    ///     on_scroll.call(0);
    ///     on_scroll.call(10);
    ///     on_scroll.call(20);
    ///     assert_eq!(*positions.lock().unwrap(), vec![0]);
    ///
    ///     tokio::time::sleep(Duration::from_millis(101)).await;
    ///     assert_eq!(*positions.lock().unwrap(), vec![0, 20]);
    /// }
    /// ```
    pub fn new<F>(window: Duration, action: F) -> Result<Self, PacingError>
    where
        F: Fn(Args) + Send + Sync + 'static,
    {
        Ok(Self::with_timer(TokioTimer::current()?, window, action))
    }
}

impl<Args, Tm> Throttled<Args, Tm>
where
    Args: Send + 'static,
    Tm: Timer,
{
    /// Creates throttled action that schedules trailing calls on `timer`
    pub fn with_timer<F>(timer: Tm, window: Duration, action: F) -> Self
    where
        F: Fn(Args) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                timer,
                window,
                action: Box::new(action),
                state: Mutex::new(ThrottleState {
                    last_run_at: None,
                    trailing: PendingSlot::new(),
                }),
            }),
        }
    }

    /// Creates throttled action from a window in signed milliseconds
    ///
    /// Negative window is rejected with [`PacingError::NegativeDelay`].
    pub fn from_millis<F>(timer: Tm, window_ms: i64, action: F) -> Result<Self, PacingError>
    where
        F: Fn(Args) + Send + Sync + 'static,
    {
        Ok(Self::with_timer(
            timer,
            PacingError::check_millis(window_ms)?,
            action,
        ))
    }

    /// Runs the action now or queues `args` for the end of the current window
    pub fn call(&self, args: Args) {
        let inner = &self.inner;
        let now = inner.timer.now();
        let mut state = lock(&inner.state);

        match state.remaining(now, inner.window) {
            None => {
                state.trailing.cancel(&inner.timer);
                state.mark_run(now);
                drop(state);

                trace!("running throttled action on leading edge");
                (inner.action)(args);
            }
            Some(remaining) => Inner::arm(inner, &mut state, remaining, args),
        }
    }

    /// Returns `true` when a trailing call waits for the window to end
    pub fn is_pending(&self) -> bool {
        lock(&self.inner.state).trailing.is_pending()
    }

    /// Moment of the most recent run, `None` when the action never ran
    pub fn last_run_at(&self) -> Option<Instant> {
        lock(&self.inner.state).last_run_at
    }

    /// Minimum time between two runs
    pub fn window(&self) -> Duration {
        self.inner.window
    }
}

impl<Args, Tm> Inner<Args, Tm>
where
    Args: Send + 'static,
    Tm: Timer,
{
    fn arm(this: &Arc<Self>, state: &mut ThrottleState<Tm::Handle>, delay: Duration, args: Args) {
        state.trailing.replace(&this.timer, delay, |generation| -> Callback {
            let inner = this.clone();
            Box::new(move || Self::fire(&inner, generation, args))
        });
    }

    fn fire(this: &Arc<Self>, generation: u64, args: Args) {
        let now = this.timer.now();
        let mut state = lock(&this.state);

        if !state.trailing.release(generation) {
            return;
        }

        if let Some(remaining) = state.remaining(now, this.window) {
            debug!(?remaining, "trailing timer fired early, re-arming");
            Self::arm(this, &mut state, remaining, args);
            return;
        }

        state.mark_run(now);
        drop(state);

        trace!(generation, "running throttled action on trailing edge");
        (this.action)(args);
    }
}

impl<Args, Tm: Timer> Clone for Throttled<Args, Tm> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<Args, Tm: Timer> fmt::Debug for Throttled<Args, Tm> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.inner.state);
        f.debug_struct("Throttled")
            .field("window", &self.inner.window)
            .field("last_run_at", &state.last_run_at)
            .field("pending", &state.trailing.is_pending())
            .finish()
    }
}
