//! Competition analysis.
//!
//! Turns raw sheet rows into ranked standings per category.

pub mod aggregator;

pub use aggregator::*;
