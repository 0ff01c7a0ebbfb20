//! Platform-specific shared memory primitives.

pub mod linux;

pub use linux::*;
