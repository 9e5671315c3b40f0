//! Helpers to observe wrapped actions in tests.

mod call_recorder;

pub use call_recorder::*;
