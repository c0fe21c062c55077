//! Utility functions for common conversions.

pub mod formatting;

pub use formatting::without_0x_prefix;
