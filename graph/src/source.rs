//! Where snapshots come from.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;
use wst_types::Denomination;

use crate::records::Stream;
use crate::{load_snapshot, GraphError, GraphSnapshot};

/// Anything able to produce the snapshot of a pool.
pub trait SnapshotSource {
    fn load(&self, denomination: Denomination) -> Result<GraphSnapshot, GraphError>;
}

/// Reads `whirlpool_{mix_txs,tx0s,links}_<denom>.csv` from one directory.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    dir: PathBuf,
    participants: u32,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, participants: u32) -> Self {
        Self {
            dir: dir.into(),
            participants,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stream_path(&self, stream: Stream, denomination: Denomination) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", stream.file_stem(), denomination.code()))
    }

    fn open(&self, stream: Stream, denomination: Denomination) -> Result<BufReader<File>, GraphError> {
        let path = self.stream_path(stream, denomination);
        debug!(path = %path.display(), "opening snapshot stream");
        File::open(&path)
            .map(BufReader::new)
            .map_err(|source| GraphError::Open { path, source })
    }
}

impl SnapshotSource for DirectorySource {
    fn load(&self, denomination: Denomination) -> Result<GraphSnapshot, GraphError> {
        let mixes = self.open(Stream::MixTxs, denomination)?;
        let funding = self.open(Stream::Tx0s, denomination)?;
        let links = self.open(Stream::Links, denomination)?;
        load_snapshot(Some(denomination), self.participants, mixes, funding, links)
    }
}

/// Snapshots already held in memory, keyed by denomination.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    snapshots: HashMap<Denomination, GraphSnapshot>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, denomination: Denomination, snapshot: GraphSnapshot) {
        self.snapshots.insert(denomination, snapshot);
    }
}

impl SnapshotSource for MemorySource {
    fn load(&self, denomination: Denomination) -> Result<GraphSnapshot, GraphError> {
        self.snapshots
            .get(&denomination)
            .cloned()
            .ok_or(GraphError::MissingSnapshot(denomination))
    }
}
