//! Input records and their semicolon-delimited row format.

use std::fmt;
use std::str::FromStr;

use wst_types::{Tiid, Timestamp, TxPrefix};

use crate::GraphError;

/// The three record streams composing a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    MixTxs,
    Tx0s,
    Links,
}

impl Stream {
    pub const ALL: [Self; 3] = [Self::MixTxs, Self::Tx0s, Self::Links];

    /// File name stem used by snapshot directories.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::MixTxs => "whirlpool_mix_txs",
            Self::Tx0s => "whirlpool_tx0s",
            Self::Links => "whirlpool_links",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MixTxs => "mix_txs",
            Self::Tx0s => "tx0s",
            Self::Links => "links",
        })
    }
}

/// `tiid;txid;timestamp[;outputs]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixRecord {
    pub tiid: Tiid,
    pub prefix: TxPrefix,
    pub timestamp: Timestamp,
    /// Fan-out override for non-standard mixes.
    pub outputs: Option<u32>,
}

/// `tiid;txid;timestamp;outputs`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundingRecord {
    pub tiid: Tiid,
    pub prefix: TxPrefix,
    pub timestamp: Timestamp,
    pub outputs: u32,
}

/// `source;target`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    pub source: Tiid,
    pub target: Tiid,
}

impl MixRecord {
    pub fn parse(line: &str, row: usize) -> Result<Self, GraphError> {
        let fields = Fields::split(line, Stream::MixTxs, row, 3)?;
        Ok(Self {
            tiid: Tiid::new(fields.number(0, "tiid")?),
            prefix: fields.prefix(1)?,
            timestamp: Timestamp::new(fields.number(2, "timestamp")?),
            outputs: fields.optional_number(3, "output count")?,
        })
    }
}

impl FundingRecord {
    pub fn parse(line: &str, row: usize) -> Result<Self, GraphError> {
        let fields = Fields::split(line, Stream::Tx0s, row, 4)?;
        Ok(Self {
            tiid: Tiid::new(fields.number(0, "tiid")?),
            prefix: fields.prefix(1)?,
            timestamp: Timestamp::new(fields.number(2, "timestamp")?),
            outputs: fields.number(3, "output count")?,
        })
    }
}

impl EdgeRecord {
    pub fn parse(line: &str, row: usize) -> Result<Self, GraphError> {
        let fields = Fields::split(line, Stream::Links, row, 2)?;
        Ok(Self {
            source: Tiid::new(fields.number(0, "source tiid")?),
            target: Tiid::new(fields.number(1, "target tiid")?),
        })
    }
}

struct Fields<'a> {
    stream: Stream,
    row: usize,
    values: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn split(line: &'a str, stream: Stream, row: usize, required: usize) -> Result<Self, GraphError> {
        let values: Vec<&str> = line.split(';').map(str::trim).collect();
        if values.len() < required {
            return Err(GraphError::MalformedRecord {
                stream,
                row,
                reason: format!("expected {required} columns, found {}", values.len()),
            });
        }
        Ok(Self { stream, row, values })
    }

    fn malformed(&self, reason: String) -> GraphError {
        GraphError::MalformedRecord {
            stream: self.stream,
            row: self.row,
            reason,
        }
    }

    fn number<T: FromStr>(&self, col: usize, what: &str) -> Result<T, GraphError>
    where
        T::Err: fmt::Display,
    {
        let raw = self.values[col];
        raw.parse::<T>()
            .map_err(|e| self.malformed(format!("bad {what} {raw:?}: {e}")))
    }

    fn optional_number<T: FromStr>(&self, col: usize, what: &str) -> Result<Option<T>, GraphError>
    where
        T::Err: fmt::Display,
    {
        match self.values.get(col) {
            Some(raw) if !raw.is_empty() => self.number(col, what).map(Some),
            _ => Ok(None),
        }
    }

    fn prefix(&self, col: usize) -> Result<TxPrefix, GraphError> {
        TxPrefix::from_txid(self.values[col]).map_err(|e| self.malformed(e.to_string()))
    }
}
