use tokio::{runtime::Handle, task::AbortHandle, time::sleep};

use super::{Callback, Duration, Instant, Timer};
use crate::PacingError;

/// Timer implementation with usage tokio internal library time management
///
/// Each scheduled callback is a spawned task that sleeps for the requested delay.
/// You can use [`tokio::time::pause`] to stop clock and [`tokio::time::advance`] in order
/// to affect values returned by [`Timer::now`] and the moment callbacks fire
#[derive(Debug, Clone)]
pub struct TokioTimer {
    runtime: Handle,
}

impl TokioTimer {
    /// Creates timer that spawns callbacks on provided runtime
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Creates timer bound to the runtime of the current context
    ///
    /// # Example
    /// ```
    /// use tokio::time::advance;
    /// use pacekit::time::{Duration, InstantOffset, Timer, TokioTimer};
    ///
    /// #[tokio::main(flavor = "current_thread", start_paused = true)]
    /// async fn main() {
    ///     let timer = TokioTimer::current().unwrap();
    ///     let time = timer.now();
    ///     assert_eq!(timer.now(), time);
    ///     advance(Duration::from_millis(10)).await;
    ///     assert_eq!(timer.now(), time.with_millis(10));
    /// }
    /// ```
    pub fn current() -> Result<Self, PacingError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| PacingError::NoRuntime)
    }
}

impl Timer for TokioTimer {
    type Handle = AbortHandle;

    /// Returns current monotonic time
    /// Affected by tokio time library testing helpers
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn schedule(&self, callback: Callback, delay: Duration) -> Self::Handle {
        self.runtime
            .spawn(async move {
                sleep(delay).await;
                callback();
            })
            .abort_handle()
    }

    fn cancel(&self, handle: Self::Handle) {
        handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use tokio::time::advance;

    use super::*;

    fn counting_callback(counter: &Arc<AtomicUsize>) -> Callback {
        let counter = counter.clone();
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn reports_missing_runtime() {
        assert!(matches!(TokioTimer::current(), Err(PacingError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn fires_callback_after_delay() {
        let timer = TokioTimer::current().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        timer.schedule(counting_callback(&counter), Duration::from_millis(50));

        sleep(Duration::from_millis(49)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_callback_runs_after_schedule_returns() {
        let timer = TokioTimer::current().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        timer.schedule(counting_callback(&counter), Duration::ZERO);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_callback_never_fires() {
        let timer = TokioTimer::current().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let handle = timer.schedule(counting_callback(&counter), Duration::from_millis(10));
        timer.cancel(handle);

        sleep(Duration::from_millis(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_firing_is_noop() {
        let timer = TokioTimer::current().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let handle = timer.schedule(counting_callback(&counter), Duration::from_millis(10));
        sleep(Duration::from_millis(20)).await;

        timer.cancel(handle);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn now_follows_paused_clock() {
        let timer = TokioTimer::current().unwrap();
        let start = timer.now();

        advance(Duration::from_millis(25)).await;

        assert_eq!(timer.now() - start, Duration::from_millis(25));
    }
}
