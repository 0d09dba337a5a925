//! Scores of a single transaction, computed on demand.

use serde::Serialize;
use tracing::{debug, warn};
use wst_graph::{GraphSnapshot, SnapshotSource};
use wst_types::{Denomination, Tiid, TxPrefix};

use crate::backward::BackwardAnonsetEngine;
use crate::counterparty::{CounterpartyHeterogeneityEngine, FundingMetric};
use crate::forward::ForwardAnonsetEngine;
use crate::MetricsError;

/// Anonset and spread in one direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Score {
    pub anonset: u64,
    pub spread: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MixScore {
    pub tiid: Tiid,
    pub prefix: TxPrefix,
    pub round: usize,
    pub backward: Score,
    pub forward: Score,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointScore {
    Mix(MixScore),
    Funding(FundingMetric),
}

pub struct PointScoreLookup<'a> {
    snapshot: &'a GraphSnapshot,
}

impl<'a> PointScoreLookup<'a> {
    pub fn new(snapshot: &'a GraphSnapshot) -> Self {
        Self { snapshot }
    }

    /// Score of the transaction whose id (full or 16-char prefix) is `txid`.
    pub fn score(&self, txid: &str) -> Result<PointScore, MetricsError> {
        let prefix = TxPrefix::from_txid(txid)?;
        self.score_prefix(&prefix)
            .ok_or_else(|| MetricsError::NotFound(txid.to_string()))?
    }

    fn score_prefix(&self, prefix: &TxPrefix) -> Option<Result<PointScore, MetricsError>> {
        let snapshot = self.snapshot;
        if let Some(round) = snapshot.mix_round_of(prefix) {
            let tiid = snapshot.mix_at(round)?;
            return Some(self.mix_score(tiid, *prefix, round));
        }
        let tiid = snapshot.funding_index_of(prefix)?;
        Some(
            CounterpartyHeterogeneityEngine::new(snapshot)
                .metric_for(tiid)
                .map(PointScore::Funding),
        )
    }

    fn mix_score(&self, tiid: Tiid, prefix: TxPrefix, round: usize) -> Result<PointScore, MetricsError> {
        let backward = BackwardAnonsetEngine::new(self.snapshot);
        let forward = ForwardAnonsetEngine::new(self.snapshot);
        let back_anonset = backward.anonset_of(tiid)?;
        let fwd_anonset = forward.anonset_of(tiid)?;
        Ok(PointScore::Mix(MixScore {
            tiid,
            prefix,
            round,
            backward: Score {
                anonset: back_anonset,
                spread: backward.spread_of(tiid, back_anonset),
            },
            forward: Score {
                anonset: fwd_anonset,
                spread: forward.spread_of(round, fwd_anonset),
            },
        }))
    }
}

/// Score `txid` in the pool named by `hint`, or in the first pool knowing it.
///
/// Without a hint, pools whose snapshot is missing or unreadable are skipped and
/// `NotFound` is returned once every denomination has been tried.
pub fn score_any<S: SnapshotSource>(
    source: &S,
    txid: &str,
    hint: Option<Denomination>,
) -> Result<(Denomination, PointScore), MetricsError> {
    // Reject malformed ids before loading anything.
    TxPrefix::from_txid(txid)?;

    if let Some(denomination) = hint {
        let snapshot = source.load(denomination)?;
        let score = PointScoreLookup::new(&snapshot).score(txid)?;
        return Ok((denomination, score));
    }

    for denomination in Denomination::ALL {
        let snapshot = match source.load(denomination) {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_missing() => {
                debug!(%denomination, "no snapshot for pool, skipping");
                continue;
            }
            Err(e) => {
                warn!(%denomination, error = %e, "unreadable snapshot, skipping");
                continue;
            }
        };
        match PointScoreLookup::new(&snapshot).score(txid) {
            Ok(score) => return Ok((denomination, score)),
            Err(MetricsError::NotFound(_)) => {
                debug!(%denomination, txid, "transaction not in pool");
            }
            Err(e) => return Err(e),
        }
    }
    Err(MetricsError::NotFound(txid.to_string()))
}
