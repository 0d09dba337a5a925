//! Reference-counted sketch cache for the streaming passes.
//!
//! Each resolved mix leaves its sketch behind for the neighbours that still have
//! to read it. Every read releases one reference, and the entry is removed the
//! moment its count reaches zero, so the cache holds only the current "frontier"
//! of the graph rather than its whole history.

use std::collections::HashMap;

use wst_sketch::CardinalitySketch;
use wst_types::Tiid;

/// Cache occupancy figures for one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Largest number of entries held at once.
    pub high_water: usize,
    /// Entries still held when the pass finished.
    pub residual: usize,
}

struct Entry<S> {
    pending: usize,
    sketch: S,
}

pub(crate) struct SketchCache<S> {
    entries: HashMap<Tiid, Entry<S>>,
    high_water: usize,
}

impl<S: CardinalitySketch> SketchCache<S> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            high_water: 0,
        }
    }

    /// Keep `sketch` for `pending` future reads. Nothing is kept when no read will come.
    pub(crate) fn store(&mut self, tiid: Tiid, pending: usize, sketch: S) {
        if pending == 0 {
            return;
        }
        self.entries.insert(tiid, Entry { pending, sketch });
        self.high_water = self.high_water.max(self.entries.len());
    }

    /// Merge the sketch stored for `tiid` into `target` and release one reference.
    /// Returns false when nothing is stored for `tiid`.
    pub(crate) fn consume_into(&mut self, tiid: Tiid, target: &mut S) -> bool {
        let Some(entry) = self.entries.get_mut(&tiid) else {
            return false;
        };
        target.merge(&entry.sketch);
        entry.pending -= 1;
        if entry.pending == 0 {
            self.entries.remove(&tiid);
        }
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            high_water: self.high_water,
            residual: self.entries.len(),
        }
    }
}
