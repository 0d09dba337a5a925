//! Small hand-built graphs for unit tests.

use wst_graph::{EdgeRecord, FundingRecord, GraphSnapshot, MixRecord, SnapshotBuilder};
use wst_types::{Tiid, Timestamp, TxPrefix};

pub(crate) const BASE_TS: u64 = 1_568_246_400; // 2019-09-12 00:00 UTC

pub(crate) fn prefix(tiid: u32) -> TxPrefix {
    let mut bytes = [0xab; 8];
    bytes[4..].copy_from_slice(&tiid.to_be_bytes());
    TxPrefix::new(bytes)
}

pub(crate) fn txid(tiid: u32) -> String {
    format!("{}{}", prefix(tiid), "00".repeat(24))
}

pub(crate) struct Fixture {
    builder: SnapshotBuilder,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            builder: GraphSnapshot::builder(5),
        }
    }

    pub(crate) fn funding(self, tiid: u32) -> Self {
        self.funding_at(tiid, BASE_TS + u64::from(tiid) * 60)
    }

    pub(crate) fn funding_at(mut self, tiid: u32, ts: u64) -> Self {
        self.builder
            .push_funding(FundingRecord {
                tiid: Tiid::new(tiid),
                prefix: prefix(tiid),
                timestamp: Timestamp::new(ts),
                outputs: 5,
            })
            .unwrap();
        self
    }

    pub(crate) fn mix(self, tiid: u32, fan_out: u32) -> Self {
        self.mix_at(tiid, fan_out, BASE_TS + u64::from(tiid) * 60)
    }

    pub(crate) fn mix_at(mut self, tiid: u32, fan_out: u32, ts: u64) -> Self {
        self.builder
            .push_mix(MixRecord {
                tiid: Tiid::new(tiid),
                prefix: prefix(tiid),
                timestamp: Timestamp::new(ts),
                outputs: Some(fan_out),
            })
            .unwrap();
        self
    }

    pub(crate) fn link(mut self, source: u32, target: u32) -> Self {
        self.builder
            .push_edge(EdgeRecord {
                source: Tiid::new(source),
                target: Tiid::new(target),
            })
            .unwrap();
        self
    }

    pub(crate) fn build(self) -> GraphSnapshot {
        self.builder.build()
    }
}

/// F1(0), F2(1) -> M1(2) with fan-out 3 and nothing remixed.
pub(crate) fn two_funding_one_mix() -> GraphSnapshot {
    Fixture::new()
        .funding(0)
        .funding(1)
        .mix(2, 3)
        .link(0, 2)
        .link(1, 2)
        .build()
}

/// F1(0) -> M1(1) -> M2(2), one output of M1 remixed in M2.
pub(crate) fn chain() -> GraphSnapshot {
    Fixture::new()
        .funding(0)
        .mix(1, 5)
        .mix(2, 5)
        .link(0, 1)
        .link(1, 2)
        .build()
}
