use tracing::trace;

use crate::time::{Callback, Duration, Timer};

/// Slot for the single timer an adapter instance may have armed
///
/// Every armed timer gets a generation number. A callback that wakes up with
/// a generation that is no longer current was superseded and must do nothing,
/// even if the host failed to cancel it in time.
#[derive(Debug)]
pub(crate) struct PendingSlot<H> {
    pending: Option<(H, u64)>,
    generation: u64,
}

impl<H> PendingSlot<H> {
    pub(crate) fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancels armed timer, no-op when nothing is armed
    pub(crate) fn cancel<T>(&mut self, timer: &T)
    where
        T: Timer<Handle = H>,
    {
        if let Some((handle, generation)) = self.pending.take() {
            trace!(generation, "cancelled pending timer");
            timer.cancel(handle);
        }
    }

    /// Cancels armed timer and arms a new one built by `callback`
    pub(crate) fn replace<T, F>(&mut self, timer: &T, delay: Duration, callback: F)
    where
        T: Timer<Handle = H>,
        F: FnOnce(u64) -> Callback,
    {
        self.cancel(timer);
        self.generation += 1;

        let generation = self.generation;
        trace!(generation, ?delay, "armed timer");
        self.pending = Some((timer.schedule(callback(generation), delay), generation));
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        matches!(self.pending, Some((_, current)) if current == generation)
    }

    /// Clears the slot when `generation` is still the armed one
    pub(crate) fn release(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            trace!(generation, "ignored stale timer");
            return false;
        }

        self.pending = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::time::ManualTimer;

    use super::*;

    fn noop(_: u64) -> Callback {
        Box::new(|| {})
    }

    #[test]
    fn starts_without_pending_timer() {
        let slot = PendingSlot::<()>::new();

        assert!(!slot.is_pending());
        assert!(!slot.is_current(0));
    }

    #[test]
    fn replacing_keeps_single_timer_armed() {
        let timer = ManualTimer::new();
        let mut slot = PendingSlot::new();

        slot.replace(&timer, Duration::from_millis(10), noop);
        slot.replace(&timer, Duration::from_millis(10), noop);
        slot.replace(&timer, Duration::from_millis(10), noop);

        assert_eq!(timer.pending(), 1);
        assert!(slot.is_current(3));
        assert!(!slot.is_current(2));
    }

    #[test]
    fn cancel_without_timer_is_noop() {
        let timer = ManualTimer::new();
        let mut slot = PendingSlot::new();

        slot.cancel(&timer);
        slot.cancel(&timer);

        assert!(!slot.is_pending());
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn releases_only_current_generation() {
        let timer = ManualTimer::new();
        let mut slot = PendingSlot::new();

        slot.replace(&timer, Duration::from_millis(10), noop);
        slot.replace(&timer, Duration::from_millis(10), noop);

        assert!(!slot.release(1));
        assert!(slot.is_pending());
        assert!(slot.release(2));
        assert!(!slot.is_pending());
        assert!(!slot.release(2));
    }
}
