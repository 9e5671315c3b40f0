//! Module that automatically chooses which sync structs to import
//!
//! Used to facilitate [loom][`loom::model`] model tests

#[cfg(loom)]
pub(crate) use loom::sync::{Arc, Mutex, MutexGuard};

#[cfg(not(loom))]
pub(crate) use std::sync::{Arc, Mutex, MutexGuard};

use std::sync::PoisonError;

/// Locks the mutex, recovering the guard if a previous holder panicked.
///
/// Adapter state is always left consistent before user code runs,
/// so a poisoned lock carries no torn state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
