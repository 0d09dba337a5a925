//! Holds the snapshot currently under analysis.

use tracing::info;
use wst_types::Denomination;

use crate::{GraphError, GraphSnapshot, SnapshotSource};

/// Owns at most one loaded snapshot. Loading another denomination drops the
/// previous graph before the new one is read, so a failed reload leaves the
/// session empty rather than half-updated.
pub struct Session<S> {
    source: S,
    loaded: Option<GraphSnapshot>,
}

impl<S: SnapshotSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            loaded: None,
        }
    }

    pub fn load(&mut self, denomination: Denomination) -> Result<&GraphSnapshot, GraphError> {
        if let Some(previous) = self.loaded.take() {
            info!(
                previous = previous.denomination().map(|d| d.code()).unwrap_or("-"),
                next = denomination.code(),
                "replacing loaded snapshot"
            );
        }
        let snapshot = self.source.load(denomination)?;
        Ok(self.loaded.insert(snapshot))
    }

    pub fn current(&self) -> Option<&GraphSnapshot> {
        self.loaded.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
