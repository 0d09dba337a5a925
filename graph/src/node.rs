//! Graph nodes.

use wst_types::{Timestamp, TxPrefix};

/// Role of a transaction in the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A Tx0.
    Funding,
    /// A mix; `round` is its position in the mix order.
    Mix { round: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub prefix: TxPrefix,
    pub timestamp: Timestamp,
    /// Outputs created. For a mix this is its fan-out, for a Tx0 the
    /// output count reported by the snapshot.
    pub outputs: u32,
}

impl Node {
    pub fn is_mix(&self) -> bool {
        matches!(self.kind, NodeKind::Mix { .. })
    }

    pub fn is_funding(&self) -> bool {
        matches!(self.kind, NodeKind::Funding)
    }

    /// Position in the mix order, for mixes.
    pub fn round(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Mix { round } => Some(round),
            NodeKind::Funding => None,
        }
    }
}
