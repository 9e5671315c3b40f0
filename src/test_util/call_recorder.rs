use std::sync::{Arc, Mutex};

use crate::time::{Duration, Instant, Timer};

/// Records every invocation of a wrapped action together with its time
#[derive(Debug)]
pub struct CallRecorder<T> {
    calls: Arc<Mutex<Vec<(Instant, T)>>>,
}

impl<T> Clone for CallRecorder<T> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
        }
    }
}

impl<T> Default for CallRecorder<T> {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> CallRecorder<T>
where
    T: Clone + Send + 'static,
{
    /// Creates empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns action that records its arguments with the time reported by `timer`
    pub fn action<Tm>(&self, timer: &Tm) -> impl Fn(T) + Send + Sync + 'static
    where
        Tm: Timer + Clone,
    {
        let calls = self.calls.clone();
        let timer = timer.clone();
        move |args| {
            calls
                .lock()
                .expect("recorder lock")
                .push((timer.now(), args))
        }
    }

    /// Arguments of every recorded call in order
    pub fn args(&self) -> Vec<T> {
        self.calls().into_iter().map(|(_, args)| args).collect()
    }

    /// Offsets of every recorded call from `origin`
    pub fn offsets(&self, origin: Instant) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .map(|(time, _)| time.saturating_duration_since(origin))
            .collect()
    }

    /// Recorded calls
    pub fn calls(&self) -> Vec<(Instant, T)> {
        self.calls.lock().expect("recorder lock").clone()
    }

    /// Number of recorded calls
    pub fn len(&self) -> usize {
        self.calls.lock().expect("recorder lock").len()
    }

    /// Returns `true` when nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
