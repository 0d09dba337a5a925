//! The immutable transaction graph of one pool.
//!
//! Nodes live in an arena indexed by tiid. Links are stored twice: `forward`
//! maps a node to the mixes spending its outputs, `backward` maps a mix to the
//! nodes whose outputs it spends. The builder enforces every structural
//! invariant, so a [`GraphSnapshot`] that exists is consistent:
//!
//! - mixes and Tx0s are each listed in ascending tiid order;
//! - every link points from an existing node to a later mix;
//! - `y ∈ forward[x] ⇔ x ∈ backward[y]`;
//! - txid prefixes are unique across the snapshot.

use std::collections::HashMap;

use tracing::debug;
use wst_types::{Denomination, Tiid, Timestamp, TxPrefix};

use crate::records::{EdgeRecord, FundingRecord, MixRecord, Stream};
use crate::{GraphError, Node, NodeKind};

/// Outputs created by a standard mix.
pub const DEFAULT_PARTICIPANTS: u32 = 5;

#[derive(Clone, Debug)]
pub struct GraphSnapshot {
    denomination: Option<Denomination>,
    participants: u32,
    nodes: Vec<Option<Node>>,
    forward: Vec<Vec<Tiid>>,
    backward: Vec<Vec<Tiid>>,
    mixes: Vec<Tiid>,
    funding: Vec<Tiid>,
    ids: HashMap<TxPrefix, Tiid>,
    edge_count: usize,
}

impl GraphSnapshot {
    pub fn builder(participants: u32) -> SnapshotBuilder {
        SnapshotBuilder::new(participants)
    }

    pub fn denomination(&self) -> Option<Denomination> {
        self.denomination
    }

    /// Default fan-out of a mix.
    pub fn participants(&self) -> u32 {
        self.participants
    }

    pub fn node(&self, tiid: Tiid) -> Option<&Node> {
        self.nodes.get(tiid.index()).and_then(Option::as_ref)
    }

    pub fn is_funding(&self, tiid: Tiid) -> bool {
        self.node(tiid).is_some_and(Node::is_funding)
    }

    pub fn is_mix(&self, tiid: Tiid) -> bool {
        self.node(tiid).is_some_and(Node::is_mix)
    }

    /// Mixes spending an output of `tiid`, one entry per spent output.
    pub fn forward_links(&self, tiid: Tiid) -> &[Tiid] {
        self.forward.get(tiid.index()).map_or(&[], Vec::as_slice)
    }

    /// Nodes whose outputs `tiid` spends, one entry per spent output.
    pub fn backward_links(&self, tiid: Tiid) -> &[Tiid] {
        self.backward.get(tiid.index()).map_or(&[], Vec::as_slice)
    }

    /// Round of `tiid` when it is a mix.
    pub fn round_of(&self, tiid: Tiid) -> Option<usize> {
        self.node(tiid).and_then(Node::round)
    }

    /// Mix round of the mix whose txid starts with `prefix`.
    pub fn mix_round_of(&self, prefix: &TxPrefix) -> Option<usize> {
        self.resolve(prefix).and_then(|tiid| self.round_of(tiid))
    }

    /// Tiid of the Tx0 whose txid starts with `prefix`.
    pub fn funding_index_of(&self, prefix: &TxPrefix) -> Option<Tiid> {
        self.resolve(prefix).filter(|&tiid| self.is_funding(tiid))
    }

    /// Tiid of any transaction whose txid starts with `prefix`.
    pub fn resolve(&self, prefix: &TxPrefix) -> Option<Tiid> {
        self.ids.get(prefix).copied()
    }

    /// Mix tiids in chronological (round) order.
    pub fn mixes(&self) -> &[Tiid] {
        &self.mixes
    }

    /// Tx0 tiids in chronological order.
    pub fn funding(&self) -> &[Tiid] {
        &self.funding
    }

    pub fn mix_at(&self, round: usize) -> Option<Tiid> {
        self.mixes.get(round).copied()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Size of the tiid arena. Valid tiids are below this bound.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn timestamp(&self, tiid: Tiid) -> Option<Timestamp> {
        self.node(tiid).map(|n| n.timestamp)
    }

    /// Number of outputs created by `tiid` (0 when unknown).
    pub fn fan_out(&self, tiid: Tiid) -> u32 {
        self.node(tiid).map_or(0, |n| n.outputs)
    }

    /// Outputs of a mix that were never remixed: unspent, or spent outside the pool.
    pub fn exits(&self, tiid: Tiid) -> u64 {
        u64::from(self.fan_out(tiid)).saturating_sub(self.forward_links(tiid).len() as u64)
    }

    /// Number of Tx0s confirmed strictly before `tiid`.
    pub fn funding_before(&self, tiid: Tiid) -> usize {
        self.funding.partition_point(|&f| f < tiid)
    }
}

/// Accumulates records into a [`GraphSnapshot`], validating as it goes.
///
/// A failed push leaves no usable graph behind: the builder is only turned into a
/// snapshot by [`SnapshotBuilder::build`].
#[derive(Debug)]
pub struct SnapshotBuilder {
    snapshot: GraphSnapshot,
    node_limit: Option<usize>,
    rows: [usize; 3],
}

impl SnapshotBuilder {
    pub fn new(participants: u32) -> Self {
        Self {
            snapshot: GraphSnapshot {
                denomination: None,
                participants,
                nodes: Vec::new(),
                forward: Vec::new(),
                backward: Vec::new(),
                mixes: Vec::new(),
                funding: Vec::new(),
                ids: HashMap::new(),
                edge_count: 0,
            },
            node_limit: None,
            rows: [0; 3],
        }
    }

    pub fn denomination(mut self, denomination: Denomination) -> Self {
        self.snapshot.denomination = Some(denomination);
        self
    }

    /// Declare how many transactions will be pushed. Tiids are dense, so any tiid
    /// at or above `count` is then rejected instead of growing the arena.
    pub fn expect_nodes(&mut self, count: usize) {
        self.node_limit = Some(count);
        let snap = &mut self.snapshot;
        snap.nodes.reserve(count);
        snap.forward.reserve(count);
        snap.backward.reserve(count);
    }

    pub fn push_mix(&mut self, record: MixRecord) -> Result<(), GraphError> {
        let row = self.next_row(Stream::MixTxs);
        let previous = self.snapshot.mixes.last().copied();
        self.check_node(Stream::MixTxs, row, record.tiid, &record.prefix, previous)?;

        let round = self.snapshot.mixes.len();
        let outputs = record.outputs.unwrap_or(self.snapshot.participants);
        self.insert_node(
            record.tiid,
            Node {
                kind: NodeKind::Mix { round },
                prefix: record.prefix,
                timestamp: record.timestamp,
                outputs,
            },
        );
        self.snapshot.mixes.push(record.tiid);
        Ok(())
    }

    pub fn push_funding(&mut self, record: FundingRecord) -> Result<(), GraphError> {
        let row = self.next_row(Stream::Tx0s);
        let previous = self.snapshot.funding.last().copied();
        self.check_node(Stream::Tx0s, row, record.tiid, &record.prefix, previous)?;

        self.insert_node(
            record.tiid,
            Node {
                kind: NodeKind::Funding,
                prefix: record.prefix,
                timestamp: record.timestamp,
                outputs: record.outputs,
            },
        );
        self.snapshot.funding.push(record.tiid);
        Ok(())
    }

    pub fn push_edge(&mut self, record: EdgeRecord) -> Result<(), GraphError> {
        let row = self.next_row(Stream::Links);
        let EdgeRecord { source, target } = record;
        for tiid in [source, target] {
            if self.snapshot.node(tiid).is_none() {
                return Err(GraphError::DanglingReference {
                    stream: Stream::Links,
                    row,
                    tiid,
                });
            }
        }
        let reason = if !self.snapshot.is_mix(target) {
            Some("target is not a mix transaction")
        } else if target <= source {
            Some("target must be confirmed after source")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(GraphError::InvalidEdge {
                row,
                source_tiid: source,
                target_tiid: target,
                reason,
            });
        }

        self.snapshot.forward[source.index()].push(target);
        self.snapshot.backward[target.index()].push(source);
        self.snapshot.edge_count += 1;
        Ok(())
    }

    pub fn build(self) -> GraphSnapshot {
        debug!(
            mixes = self.snapshot.mixes.len(),
            tx0s = self.snapshot.funding.len(),
            links = self.snapshot.edge_count,
            "snapshot built"
        );
        self.snapshot
    }

    fn next_row(&mut self, stream: Stream) -> usize {
        let slot = &mut self.rows[stream as usize];
        *slot += 1;
        *slot
    }

    fn check_node(
        &self,
        stream: Stream,
        row: usize,
        tiid: Tiid,
        prefix: &TxPrefix,
        previous: Option<Tiid>,
    ) -> Result<(), GraphError> {
        if let Some(limit) = self.node_limit.filter(|&limit| tiid.index() >= limit) {
            return Err(GraphError::MalformedRecord {
                stream,
                row,
                reason: format!("tiid {tiid} out of range for a snapshot of {limit} transactions"),
            });
        }
        if let Some(previous) = previous.filter(|&p| tiid <= p) {
            return Err(GraphError::NonAscendingTiid {
                stream,
                row,
                tiid,
                previous,
            });
        }
        if self.snapshot.node(tiid).is_some() {
            return Err(GraphError::DuplicateTiid { stream, row, tiid });
        }
        if let Some(&existing) = self.snapshot.ids.get(prefix) {
            return Err(GraphError::DuplicatePrefix {
                stream,
                row,
                prefix: *prefix,
                existing,
            });
        }
        Ok(())
    }

    fn insert_node(&mut self, tiid: Tiid, node: Node) {
        let needed = tiid.index() + 1;
        let snap = &mut self.snapshot;
        if snap.nodes.len() < needed {
            snap.nodes.resize(needed, None);
            snap.forward.resize_with(needed, Vec::new);
            snap.backward.resize_with(needed, Vec::new);
        }
        snap.ids.insert(node.prefix, tiid);
        snap.nodes[tiid.index()] = Some(node);
    }
}
