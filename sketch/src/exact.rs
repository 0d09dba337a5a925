//! Exact reference implementation of [`CardinalitySketch`].

use std::collections::HashSet;

use crate::CardinalitySketch;

/// Stores every item. Memory grows with the set, so this is meant for tests and
/// for validating the probabilistic sketch on small snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExactSet {
    items: HashSet<u64>,
}

impl ExactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: u64) -> bool {
        self.items.contains(&item)
    }
}

impl CardinalitySketch for ExactSet {
    fn insert(&mut self, item: u64) {
        self.items.insert(item);
    }

    fn merge(&mut self, other: &Self) {
        self.items.extend(other.items.iter().copied());
    }

    fn estimate(&self) -> f64 {
        self.items.len() as f64
    }

    fn count(&self) -> u64 {
        self.items.len() as u64
    }
}
