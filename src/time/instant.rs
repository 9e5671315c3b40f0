use super::{Duration, Instant, InstantOffset};

impl InstantOffset for Instant {
    fn with_millis(&self, value: u64) -> Self {
        *self + Duration::from_millis(value)
    }

    fn with_micros(&self, value: u64) -> Self {
        *self + Duration::from_micros(value)
    }
}
