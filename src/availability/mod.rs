//! Availability module: turns status-change events into a daily series.

mod aggregator;
mod day;

pub use aggregator::*;
pub use day::*;
