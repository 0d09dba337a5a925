//! Dense transaction ids.
//!
//! A tiid is assigned in strict confirmation order across a whole snapshot, so
//! comparing two tiids compares when the transactions entered the graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense, chronologically ordered transaction id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tiid(u32);

impl Tiid {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Position of this id inside an arena indexed by tiid.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Tiid {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Tiid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
