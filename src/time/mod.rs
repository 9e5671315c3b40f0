//! Timer capability consumed by the rate limiting adapters.
//!
//! Adapters never touch a global clock or spawn tasks on their own,
//! every moment and every deferred callback goes through a [`Timer`].

use std::cmp::Ordering;
#[doc(hidden)]
pub use std::time::{Duration, Instant};

pub use clock::TokioTimer;
pub use manual::{ManualTimer, ManualTimerHandle};

mod clock;
mod instant;
mod manual;

/// Deferred work handed over to a [`Timer`]
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Host timer service
///
/// Schedules single-shot callbacks and reports the current monotonic time.
pub trait Timer: Send + Sync + 'static {
    /// Opaque handle of a scheduled callback
    type Handle: Send + 'static;

    /// Returns current monotonic time
    fn now(&self) -> Instant;

    /// Fires `callback` once, no sooner than `delay` from now
    ///
    /// The callback must never run before `schedule` returns, adapters call
    /// it while holding their state lock. A zero `delay` means the next turn
    /// of the host scheduler, not an inline call.
    fn schedule(&self, callback: Callback, delay: Duration) -> Self::Handle;

    /// Discards scheduled callback
    ///
    /// Must be a no-op when the callback already fired or was cancelled before.
    fn cancel(&self, handle: Self::Handle);
}

impl<T: Timer> Timer for std::sync::Arc<T> {
    type Handle = T::Handle;

    fn now(&self) -> Instant {
        (**self).now()
    }

    fn schedule(&self, callback: Callback, delay: Duration) -> Self::Handle {
        (**self).schedule(callback, delay)
    }

    fn cancel(&self, handle: Self::Handle) {
        (**self).cancel(handle)
    }
}

/// Extends [Instant][`std::time::Instant`] with addition methods
pub trait InstantOffset {
    /// Returns instant shifted by milliseconds
    fn with_millis(&self, value: u64) -> Self;
    /// Returns instant shifted by microseconds
    fn with_micros(&self, value: u64) -> Self;
}

/// Compares two [Instant][`std::time::Instant`] instances with
/// [delta][`std::time::Duration`] offset to allow time drift.
///
/// # Example
/// ```
/// use pacekit::time::cmp_instant_with_delta;
/// use std::time::Instant;
/// use std::time::Duration;
///
/// assert!(
///    cmp_instant_with_delta(
///        &Instant::now(),
///        &Instant::now(),
///        &Duration::from_micros(10)
///    )
/// );
/// ```
pub fn cmp_instant_with_delta(left: &Instant, right: &Instant, delta: &Duration) -> bool {
    match left.cmp(right) {
        Ordering::Equal => true,
        Ordering::Less => *right - *left <= *delta,
        Ordering::Greater => *left - *right <= *delta,
    }
}
