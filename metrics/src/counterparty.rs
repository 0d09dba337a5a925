//! Counterparty heterogeneity of Tx0s.
//!
//! The first mixes of a Tx0 are the mixes spending its outputs directly. Its
//! counterparties are the other Tx0s feeding those same first mixes. A Tx0 whose
//! outputs all met the same few counterparties offers less privacy than one whose
//! outputs were spread across many.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::info;
use wst_graph::GraphSnapshot;
use wst_types::{Tiid, Timestamp, TxPrefix};
use wst_utils::Progress;

use crate::report::ActivityReport;
use crate::MetricsError;

/// Counterparty figures of one Tx0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FundingMetric {
    pub tiid: Tiid,
    pub prefix: TxPrefix,
    /// Outputs spent by first mixes.
    pub mixed_outputs: u64,
    /// Outputs created, as reported by the snapshot.
    pub created_outputs: u32,
    /// Distinct other Tx0s sharing at least one first mix.
    pub counterparties: u64,
}

impl FundingMetric {
    /// `counterparties / mixed_outputs`; undefined when nothing was mixed.
    pub fn heterogeneity_ratio(&self) -> Option<f64> {
        (self.mixed_outputs > 0).then(|| self.counterparties as f64 / self.mixed_outputs as f64)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterpartyReport {
    /// One entry per Tx0, in tiid order.
    pub metrics: Vec<FundingMetric>,
    /// New Tx0s per day.
    pub activity: ActivityReport,
    by_prefix: HashMap<TxPrefix, usize>,
}

impl CounterpartyReport {
    pub fn get(&self, prefix: &TxPrefix) -> Option<&FundingMetric> {
        self.by_prefix.get(prefix).map(|&i| &self.metrics[i])
    }
}

pub struct CounterpartyHeterogeneityEngine<'a> {
    snapshot: &'a GraphSnapshot,
    progress_every: usize,
}

impl<'a> CounterpartyHeterogeneityEngine<'a> {
    pub fn new(snapshot: &'a GraphSnapshot) -> Self {
        Self {
            snapshot,
            progress_every: 1000,
        }
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    pub fn compute(&self) -> CounterpartyReport {
        let snapshot = self.snapshot;
        info!(tx0s = snapshot.funding().len(), "computing tx0 metrics");
        let mut progress = Progress::new("tx0s", snapshot.funding().len(), self.progress_every);
        let mut activity = ActivityReport::default();
        let mut metrics = Vec::with_capacity(snapshot.funding().len());
        let mut by_prefix = HashMap::with_capacity(snapshot.funding().len());

        for &tx0 in snapshot.funding() {
            let timestamp = snapshot.timestamp(tx0).unwrap_or(Timestamp::EPOCH);
            activity.day_mut(timestamp).nb_new_tx0s += 1;
            let metric = self.build_metric(tx0);
            by_prefix.insert(metric.prefix, metrics.len());
            metrics.push(metric);
            progress.tick();
        }

        info!("tx0 metrics done");
        CounterpartyReport {
            metrics,
            activity,
            by_prefix,
        }
    }

    /// Metrics of a single Tx0.
    pub fn metric_for(&self, tx0: Tiid) -> Result<FundingMetric, MetricsError> {
        if !self.snapshot.is_funding(tx0) {
            return Err(MetricsError::NotAFunding(tx0));
        }
        Ok(self.build_metric(tx0))
    }

    /// Every Tx0 feeding one of the first mixes of `tx0`, itself included when mixed.
    pub fn counterparty_set(&self, tx0: Tiid) -> BTreeSet<Tiid> {
        let snapshot = self.snapshot;
        snapshot
            .forward_links(tx0)
            .iter()
            .flat_map(|&mix| snapshot.backward_links(mix))
            .copied()
            .filter(|&prev| snapshot.is_funding(prev))
            .collect()
    }

    fn build_metric(&self, tx0: Tiid) -> FundingMetric {
        let counterparties = self.counterparty_set(tx0);
        let node = self.snapshot.node(tx0);
        FundingMetric {
            tiid: tx0,
            prefix: node.map_or(TxPrefix::new([0; 8]), |n| n.prefix),
            mixed_outputs: self.snapshot.forward_links(tx0).len() as u64,
            created_outputs: node.map_or(0, |n| n.outputs),
            counterparties: counterparties.iter().filter(|&&t| t != tx0).count() as u64,
        }
    }
}
