//! Thin wrappers over host capabilities used next to the rate limiters.
//!
//! Each module stands on its own: reading files into bytes, JSON values in a
//! key-value store, custom style properties of the root element and random colors.

pub mod color;
pub mod file;
pub mod storage;
pub mod style;
