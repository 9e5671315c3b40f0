use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{time::Timer, Debounced, PacingError, Throttled};

/// Delays used to build rate limiting adapters
///
/// Serialized with durations as whole milliseconds:
///
/// ```
/// use pacekit::PacingSettings;
///
/// let settings: PacingSettings =
///     serde_json::from_str(r#"{"debounce_ms": 250, "throttle_ms": 50}"#).unwrap();
///
/// assert_eq!(settings, PacingSettings::from_millis(250, 50).unwrap());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingSettings {
    #[serde(rename = "debounce_ms", with = "millis")]
    debounce: Duration,
    #[serde(rename = "throttle_ms", with = "millis")]
    throttle: Duration,
}

impl PacingSettings {
    /// Creates settings from signed milliseconds, rejecting negative values
    ///
    /// # Arguments
    ///
    /// * `debounce_ms`: quiet period for debounced actions
    /// * `throttle_ms`: window for throttled actions
    pub fn from_millis(debounce_ms: i64, throttle_ms: i64) -> Result<Self, PacingError> {
        Ok(Self {
            debounce: PacingError::check_millis(debounce_ms)?,
            throttle: PacingError::check_millis(throttle_ms)?,
        })
    }

    /// Changes quiet period for debounced actions
    pub fn with_debounce(self, debounce: Duration) -> Self {
        Self { debounce, ..self }
    }

    /// Changes window for throttled actions
    pub fn with_throttle(self, throttle: Duration) -> Self {
        Self { throttle, ..self }
    }

    /// Returns current debounce delay
    pub fn debounce(&self) -> &Duration {
        &self.debounce
    }

    /// Returns current throttle window
    pub fn throttle(&self) -> &Duration {
        &self.throttle
    }

    /// Builds debounced action with configured delay
    pub fn debounced<Args, Tm, F>(&self, timer: Tm, action: F) -> Debounced<Args, Tm>
    where
        Args: Send + 'static,
        Tm: Timer,
        F: Fn(Args) + Send + Sync + 'static,
    {
        Debounced::with_timer(timer, self.debounce, action)
    }

    /// Builds throttled action with configured window
    pub fn throttled<Args, Tm, F>(&self, timer: Tm, action: F) -> Throttled<Args, Tm>
    where
        Args: Send + 'static,
        Tm: Timer,
        F: Fn(Args) + Send + Sync + 'static,
    {
        Throttled::with_timer(timer, self.throttle, action)
    }
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            throttle: Duration::from_millis(100),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};

    use crate::PacingError;

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(value.as_millis()).map_err(S::Error::custom)?)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        PacingError::check_millis(i64::deserialize(deserializer)?).map_err(D::Error::custom)
    }
}
