//! Mergeable cardinality sketches.
//!
//! The streaming anonymity-set engines only need three operations from a sketch:
//! insert an item, merge another sketch in, and estimate the number of distinct
//! items seen. [`CardinalitySketch`] captures exactly that, so an exact set can be
//! swapped in wherever the probabilistic counter is used.

pub mod error;
pub mod exact;
pub mod hyperloglog;

pub use error::SketchError;
pub use exact::ExactSet;
pub use hyperloglog::{HyperLogLog, DEFAULT_PRECISION, MAX_PRECISION, MIN_PRECISION};

/// A set-like summary supporting insertion, union and distinct-count estimation.
pub trait CardinalitySketch: Clone {
    /// Add one item.
    fn insert(&mut self, item: u64);

    /// Union `other` into `self`. Merging is idempotent and commutative.
    fn merge(&mut self, other: &Self);

    /// Estimated number of distinct items inserted (directly or through merges).
    fn estimate(&self) -> f64;

    /// Estimate rounded to the nearest integer.
    fn count(&self) -> u64 {
        self.estimate().round() as u64
    }
}
