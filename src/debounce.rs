//! Debounce adapter.
//!
//! Collapses a burst of calls into a single run of the wrapped action
//! with the arguments of the last call, once the calls stop for `delay`.

use std::fmt;

use tracing::trace;

use crate::{
    pending::PendingSlot,
    sync::{lock, Arc, Mutex},
    time::{Callback, Duration, Timer, TokioTimer},
    Action, PacingError,
};

/// Debounced action
///
/// Clones share the same pending call, separately created adapters never
/// interfere with each other.
pub struct Debounced<Args, Tm: Timer = TokioTimer> {
    inner: Arc<Inner<Args, Tm>>,
}

struct Inner<Args, Tm: Timer> {
    timer: Tm,
    delay: Duration,
    action: Action<Args>,
    state: Mutex<PendingSlot<Tm::Handle>>,
}

impl<Args> Debounced<Args, TokioTimer>
where
    Args: Send + 'static,
{
    /// Creates debounced action driven by the current tokio runtime
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use pacekit::prelude::*;
    ///
    /// #[tokio::main(flavor = "current_thread", start_paused = true)]
    /// async fn main() {
    ///     let saved = Arc::new(Mutex::new(Vec::new()));
    ///     let sink = saved.clone();
    ///     let save = Debounced::new(Duration::from_millis(300), move |text: &'static str| {
    ///         sink.lock().unwrap().push(text)
    ///     })
    ///     .unwrap();
    ///
    ///     save.call("h");
    ///     save.call("he");
    ///     save.call("hello");
    ///     tokio::time::sleep(Duration::from_millis(301)).await;
    ///
    ///     assert_eq!(*saved.lock().unwrap(), vec!["hello"]);
    /// }
    /// ```
    pub fn new<F>(delay: Duration, action: F) -> Result<Self, PacingError>
    where
        F: Fn(Args) + Send + Sync + 'static,
    {
        Ok(Self::with_timer(TokioTimer::current()?, delay, action))
    }
}

impl<Args, Tm> Debounced<Args, Tm>
where
    Args: Send + 'static,
    Tm: Timer,
{
    /// Creates debounced action that schedules its calls on `timer`
    pub fn with_timer<F>(timer: Tm, delay: Duration, action: F) -> Self
    where
        F: Fn(Args) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                timer,
                delay,
                action: Box::new(action),
                state: Mutex::new(PendingSlot::new()),
            }),
        }
    }

    /// Creates debounced action from a delay in signed milliseconds
    ///
    /// Negative delay is rejected with [`PacingError::NegativeDelay`].
    pub fn from_millis<F>(timer: Tm, delay_ms: i64, action: F) -> Result<Self, PacingError>
    where
        F: Fn(Args) + Send + Sync + 'static,
    {
        Ok(Self::with_timer(
            timer,
            PacingError::check_millis(delay_ms)?,
            action,
        ))
    }

    /// Schedules the action with `args`, superseding the pending call
    pub fn call(&self, args: Args) {
        let inner = &self.inner;
        let mut state = lock(&inner.state);

        state.replace(&inner.timer, inner.delay, |generation| -> Callback {
            let inner = inner.clone();
            Box::new(move || Inner::fire(&inner, generation, args))
        });
    }

    /// Returns `true` when a call waits for the quiet period to pass
    pub fn is_pending(&self) -> bool {
        lock(&self.inner.state).is_pending()
    }

    /// Quiet period after the last call
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}

impl<Args, Tm: Timer> Inner<Args, Tm> {
    fn fire(this: &Arc<Self>, generation: u64, args: Args) {
        if !lock(&this.state).release(generation) {
            return;
        }

        trace!(generation, "running debounced action");
        (this.action)(args);
    }
}

impl<Args, Tm: Timer> Clone for Debounced<Args, Tm> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<Args, Tm: Timer> fmt::Debug for Debounced<Args, Tm> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.inner.delay)
            .field("pending", &lock(&self.inner.state).is_pending())
            .finish()
    }
}
