//! Analysis modules.
//!
//! Aggregation of funding records into chart-ready structures.

pub mod aggregator;

pub use aggregator::*;
