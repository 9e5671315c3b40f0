//! Rate limiting adapters for callbacks of an interactive host, plus small
//! helpers around host capabilities.
//!
//! [`Debounced`] collapses a burst of calls into the last one,
//! [`Throttled`] runs at most once per window with leading and trailing calls.
//! Both schedule their deferred work on an injected [`Timer`](time::Timer).
#![warn(missing_debug_implementations, unreachable_pub)]

mod debounce;
mod error;
mod pending;
mod settings;
mod sync;
mod throttle;

pub mod host;
pub mod time;

#[cfg(any(feature = "test_util", test))]
pub mod test_util;

pub use debounce::Debounced;
pub use error::PacingError;
pub use settings::PacingSettings;
pub use throttle::Throttled;

use time::Duration;

/// Wrapped action of an adapter
pub(crate) type Action<Args> = Box<dyn Fn(Args) + Send + Sync + 'static>;

pub mod prelude {
    //! Adapters, timers and settings in one import.
    pub use crate::{
        debounce, throttle,
        time::{Duration, Instant, ManualTimer, Timer, TokioTimer},
        Debounced, PacingError, PacingSettings, Throttled,
    };
}

/// Creates debounced action on the current tokio runtime
///
/// Multiple arguments are passed as a tuple.
pub fn debounce<Args, F>(action: F, delay: Duration) -> Result<Debounced<Args>, PacingError>
where
    Args: Send + 'static,
    F: Fn(Args) + Send + Sync + 'static,
{
    Debounced::new(delay, action)
}

/// Creates debounced action from a delay in signed milliseconds
pub fn debounce_millis<Args, F>(action: F, delay_ms: i64) -> Result<Debounced<Args>, PacingError>
where
    Args: Send + 'static,
    F: Fn(Args) + Send + Sync + 'static,
{
    Debounced::from_millis(time::TokioTimer::current()?, delay_ms, action)
}

/// Creates throttled action on the current tokio runtime
pub fn throttle<Args, F>(action: F, window: Duration) -> Result<Throttled<Args>, PacingError>
where
    Args: Send + 'static,
    F: Fn(Args) + Send + Sync + 'static,
{
    Throttled::new(window, action)
}

/// Creates throttled action from a window in signed milliseconds
pub fn throttle_millis<Args, F>(action: F, window_ms: i64) -> Result<Throttled<Args>, PacingError>
where
    Args: Send + 'static,
    F: Fn(Args) + Send + Sync + 'static,
{
    Throttled::from_millis(time::TokioTimer::current()?, window_ms, action)
}
