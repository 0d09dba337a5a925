//! Graph loading errors.

use std::path::PathBuf;
use thiserror::Error;

use wst_types::{Denomination, Tiid, TxPrefix};

use crate::Stream;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed record in {stream} stream at row {row}: {reason}")]
    MalformedRecord {
        stream: Stream,
        row: usize,
        reason: String,
    },

    #[error("{stream} stream row {row} references unknown tiid {tiid}")]
    DanglingReference { stream: Stream, row: usize, tiid: Tiid },

    #[error("tiid {tiid} at {stream} row {row} is already loaded")]
    DuplicateTiid { stream: Stream, row: usize, tiid: Tiid },

    #[error("txid prefix {prefix} at {stream} row {row} collides with tiid {existing}")]
    DuplicatePrefix {
        stream: Stream,
        row: usize,
        prefix: TxPrefix,
        existing: Tiid,
    },

    #[error("tiid {tiid} at {stream} row {row} does not follow {previous}")]
    NonAscendingTiid {
        stream: Stream,
        row: usize,
        tiid: Tiid,
        previous: Tiid,
    },

    #[error("edge {source_tiid} -> {target_tiid} at row {row} is invalid: {reason}")]
    InvalidEdge {
        row: usize,
        source_tiid: Tiid,
        target_tiid: Tiid,
        reason: &'static str,
    },

    #[error("no snapshot available for denomination {0}")]
    MissingSnapshot(Denomination),

    #[error("failed reading {stream} stream: {source}")]
    Read {
        stream: Stream,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GraphError {
    /// Whether the snapshot files simply do not exist (as opposed to being corrupt).
    pub fn is_missing(&self) -> bool {
        match self {
            Self::MissingSnapshot(_) => true,
            Self::Open { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
