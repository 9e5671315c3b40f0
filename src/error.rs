use thiserror::Error;

/// Errors raised while constructing rate limiting adapters
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PacingError {
    #[error("Delay must not be negative, got {0}ms")]
    NegativeDelay(i64),

    #[error("Tokio timer requires a running runtime")]
    NoRuntime,
}

impl PacingError {
    /// Validates signed milliseconds into [`Duration`](std::time::Duration)
    pub(crate) fn check_millis(value: i64) -> Result<std::time::Duration, Self> {
        u64::try_from(value)
            .map(std::time::Duration::from_millis)
            .map_err(|_| Self::NegativeDelay(value))
    }
}
