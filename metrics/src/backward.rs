//! Backward-looking anonymity sets.
//!
//! The backward anonset of a mix is the number of distinct Tx0s whose outputs may
//! have ended up in it: every Tx0 reachable by walking backward links. Spread
//! relates it to the number of Tx0s confirmed before the mix.
//!
//! Two computations are offered. The exact one walks the ancestry of each mix
//! separately and is quadratic on long-lived pools. The streaming one visits each
//! mix once, in chronological order, and builds its ancestor sketch by merging
//! the sketches of the mixes it spends from; those sketches are evicted as soon as
//! their last consumer has read them.

use tracing::{debug, info};
use wst_graph::GraphSnapshot;
use wst_sketch::CardinalitySketch;
use wst_types::{Tiid, Timestamp};
use wst_utils::Progress;

use crate::cache::{CacheStats, SketchCache};
use crate::report::{spread, ActivityReport, ActivityTracker, RoundMetric};
use crate::walk::ExactWalker;
use crate::MetricsError;

#[derive(Clone, Debug, PartialEq)]
pub struct BackwardReport {
    /// One entry per mix round, in round order.
    pub rounds: Vec<RoundMetric>,
    /// Mixes, inflow and active Tx0s per day.
    pub activity: ActivityReport,
    pub cache: CacheStats,
}

pub struct BackwardAnonsetEngine<'a> {
    snapshot: &'a GraphSnapshot,
    progress_every: usize,
}

impl<'a> BackwardAnonsetEngine<'a> {
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

    /// Per-round anonsets from one exact walk per mix.
    pub fn compute_exact(&self) -> BackwardReport {
        let snapshot = self.snapshot;
        info!(mixes = snapshot.mixes().len(), "computing backward metrics (exact)");
        let mut walker = ExactWalker::new(snapshot);
        let mut activity = ActivityTracker::default();
        let mut progress = Progress::new("backward-exact", snapshot.mixes().len(), self.progress_every);
        let mut rounds = Vec::with_capacity(snapshot.mixes().len());

        for (round, &mix) in snapshot.mixes().iter().enumerate() {
            self.record_activity(&mut activity, mix);
            let anonset = walker.ancestor_funding(mix);
            rounds.push(self.round_metric(round, mix, anonset));
            progress.tick();
        }

        info!("backward metrics done");
        BackwardReport {
            rounds,
            activity: activity.finish(),
            cache: CacheStats::default(),
        }
    }

    /// Per-round anonsets from a single chronological pass over sketches.
    ///
    /// `empty` is cloned as the starting sketch of every mix.
    pub fn compute_streaming<S: CardinalitySketch>(&self, empty: &S) -> BackwardReport {
        let snapshot = self.snapshot;
        info!(mixes = snapshot.mixes().len(), "computing backward metrics (streaming)");
        let mut cache: SketchCache<S> = SketchCache::new();
        let mut activity = ActivityTracker::default();
        let mut progress =
            Progress::new("backward-streaming", snapshot.mixes().len(), self.progress_every);
        let mut rounds = Vec::with_capacity(snapshot.mixes().len());

        for (round, &mix) in snapshot.mixes().iter().enumerate() {
            let timestamp = snapshot.timestamp(mix).unwrap_or(Timestamp::EPOCH);
            activity.record_mix(timestamp);

            let mut ancestors = empty.clone();
            for &prev in snapshot.backward_links(mix) {
                if snapshot.is_funding(prev) {
                    ancestors.insert(u64::from(prev.value()));
                    activity.record_inflow(timestamp, prev);
                } else if !cache.consume_into(prev, &mut ancestors) {
                    debug!(%mix, %prev, "predecessor sketch missing from cache");
                }
            }

            let anonset = ancestors.count();
            cache.store(mix, snapshot.forward_links(mix).len(), ancestors);
            rounds.push(self.round_metric(round, mix, anonset));
            progress.tick();
        }

        let stats = cache.stats();
        info!(
            cache_high_water = stats.high_water,
            cache_residual = stats.residual,
            "backward metrics done"
        );
        BackwardReport {
            rounds,
            activity: activity.finish(),
            cache: stats,
        }
    }

    /// Exact anonset of a single mix.
    pub fn anonset_of(&self, mix: Tiid) -> Result<u64, MetricsError> {
        if !self.snapshot.is_mix(mix) {
            return Err(MetricsError::NotAMix(mix));
        }
        Ok(ExactWalker::new(self.snapshot).ancestor_funding(mix))
    }

    /// Spread of `anonset` over the Tx0s confirmed before `mix`.
    pub fn spread_of(&self, mix: Tiid, anonset: u64) -> Option<f64> {
        spread(anonset, self.snapshot.funding_before(mix) as u64)
    }

    fn round_metric(&self, round: usize, mix: Tiid, anonset: u64) -> RoundMetric {
        RoundMetric {
            round,
            tiid: mix,
            anonset,
            spread: self.spread_of(mix, anonset),
        }
    }

    fn record_activity(&self, activity: &mut ActivityTracker, mix: Tiid) {
        let timestamp = self.snapshot.timestamp(mix).unwrap_or(Timestamp::EPOCH);
        activity.record_mix(timestamp);
        for &prev in self.snapshot.backward_links(mix) {
            if self.snapshot.is_funding(prev) {
                activity.record_inflow(timestamp, prev);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{chain, two_funding_one_mix, Fixture, BASE_TS};
    use wst_sketch::{ExactSet, HyperLogLog};

    #[test]
    fn two_tx0s_into_one_mix() {
        let snap = two_funding_one_mix();
        let engine = BackwardAnonsetEngine::new(&snap);
        for report in [
            engine.compute_exact(),
            engine.compute_streaming(&HyperLogLog::default()),
        ] {
            assert_eq!(report.rounds.len(), 1);
            assert_eq!(report.rounds[0].anonset, 2);
            assert_eq!(report.rounds[0].spread, Some(100.0));
        }
    }

    #[test]
    fn chain_traces_back_to_single_tx0() {
        let snap = chain();
        let engine = BackwardAnonsetEngine::new(&snap);
        let exact = engine.compute_exact();
        let streaming = engine.compute_streaming(&ExactSet::new());
        assert_eq!(exact.rounds, streaming.rounds);
        assert_eq!(exact.rounds[0].anonset, 1);
        assert_eq!(exact.rounds[1].anonset, 1);
        assert_eq!(engine.anonset_of(Tiid::new(2)).unwrap(), 1);
    }

    #[test]
    fn cache_holds_only_unresolved_mixes() {
        let snap = chain();
        let report = BackwardAnonsetEngine::new(&snap).compute_streaming(&ExactSet::new());
        assert_eq!(report.cache, CacheStats { high_water: 1, residual: 0 });
    }

    #[test]
    fn mix_before_any_tx0_has_undefined_spread() {
        // Truncated snapshots can start with a mix whose inputs are not loaded.
        let snap = Fixture::new().mix(0, 5).funding(1).build();
        let report = BackwardAnonsetEngine::new(&snap).compute_exact();
        assert_eq!(report.rounds[0].anonset, 0);
        assert_eq!(report.rounds[0].spread, None);
    }

    #[test]
    fn spread_counts_only_earlier_tx0s() {
        // F0 -> M1; F2, F3 confirmed later and mixed in M4.
        let snap = Fixture::new()
            .funding(0)
            .mix(1, 5)
            .funding(2)
            .funding(3)
            .mix(4, 5)
            .link(0, 1)
            .link(2, 4)
            .link(1, 4)
            .build();
        let report = BackwardAnonsetEngine::new(&snap).compute_exact();
        assert_eq!(report.rounds[0].spread, Some(100.0));
        assert_eq!(report.rounds[1].anonset, 2);
        assert_eq!(report.rounds[1].spread, Some(200.0 / 3.0));
    }

    #[test]
    fn activity_counts_mixes_inflow_and_active_tx0s() {
        let day2 = BASE_TS + 86_400;
        let snap = Fixture::new()
            .funding(0)
            .funding(1)
            .mix(2, 5)
            .mix_at(3, 5, day2)
            .link(0, 2)
            .link(0, 2)
            .link(1, 2)
            .link(0, 3)
            .link(2, 3)
            .build();
        let engine = BackwardAnonsetEngine::new(&snap);
        let exact = engine.compute_exact().activity;
        let streaming = engine.compute_streaming(&ExactSet::new()).activity;
        assert_eq!(exact, streaming);

        let first = exact.day(Timestamp::new(BASE_TS).utc_day()).unwrap();
        assert_eq!((first.nb_mixes, first.inflow, first.nb_active_tx0s), (1, 3, 2));
        let second = exact.day(Timestamp::new(day2).utc_day()).unwrap();
        assert_eq!((second.nb_mixes, second.inflow, second.nb_active_tx0s), (1, 1, 1));
    }

    #[test]
    fn anonset_of_rejects_tx0() {
        let snap = chain();
        let err = BackwardAnonsetEngine::new(&snap).anonset_of(Tiid::new(0)).unwrap_err();
        assert!(matches!(err, MetricsError::NotAMix(t) if t == Tiid::new(0)));
    }

    #[test]
    fn recomputing_is_idempotent() {
        let snap = two_funding_one_mix();
        let engine = BackwardAnonsetEngine::new(&snap);
        let hll = HyperLogLog::default();
        assert_eq!(engine.compute_streaming(&hll), engine.compute_streaming(&hll));
        assert_eq!(engine.compute_exact(), engine.compute_exact());
    }
}
