//! Forward-looking anonymity sets.
//!
//! The forward anonset of a mix counts the exit outputs its outputs may have
//! turned into. An exit is a mix output that was never remixed: still unspent,
//! or spent outside the pool. Every mix contributes `fan-out - remixes` exits,
//! and everything reachable downstream contributes its own. Spread relates the
//! anonset to all exits created from that round to the end of the snapshot.
//!
//! The streaming pass walks rounds from the latest to the earliest. By the time a
//! mix is reached, every mix spending its outputs already has a sketch, cached
//! until each of its producers has merged it.

use tracing::{debug, info};
use wst_graph::GraphSnapshot;
use wst_sketch::CardinalitySketch;
use wst_types::Tiid;
use wst_utils::Progress;

use crate::cache::{CacheStats, SketchCache};
use crate::report::{spread, RoundMetric};
use crate::walk::ExactWalker;
use crate::MetricsError;

#[derive(Clone, Debug, PartialEq)]
pub struct ForwardReport {
    /// One entry per mix round, in round order.
    pub rounds: Vec<RoundMetric>,
    /// Exit outputs created over the whole snapshot.
    pub total_exits: u64,
    pub cache: CacheStats,
}

pub struct ForwardAnonsetEngine<'a> {
    snapshot: &'a GraphSnapshot,
    progress_every: usize,
}

/// Sketch item for the `index`-th exit output of `mix`.
fn exit_key(mix: Tiid, index: u64) -> u64 {
    (u64::from(mix.value()) << 32) | index
}

impl<'a> ForwardAnonsetEngine<'a> {
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
    pub fn compute_exact(&self) -> ForwardReport {
        let snapshot = self.snapshot;
        info!(mixes = snapshot.mixes().len(), "computing forward metrics (exact)");
        let mut walker = ExactWalker::new(snapshot);
        let mut progress = Progress::new("forward-exact", snapshot.mixes().len(), self.progress_every);
        let mut rounds = Vec::with_capacity(snapshot.mixes().len());
        let mut later_exits = 0u64;

        for (round, &mix) in snapshot.mixes().iter().enumerate().rev() {
            later_exits += snapshot.exits(mix);
            let anonset = walker.descendant_exits(mix);
            rounds.push(round_metric(round, mix, anonset, later_exits));
            progress.tick();
        }
        rounds.reverse();

        info!(total_exits = later_exits, "forward metrics done");
        ForwardReport {
            rounds,
            total_exits: later_exits,
            cache: CacheStats::default(),
        }
    }

    /// Per-round anonsets from a single reverse-chronological pass over sketches.
    ///
    /// `empty` is cloned as the starting sketch of every mix.
    pub fn compute_streaming<S: CardinalitySketch>(&self, empty: &S) -> ForwardReport {
        let snapshot = self.snapshot;
        info!(mixes = snapshot.mixes().len(), "computing forward metrics (streaming)");
        let mut cache: SketchCache<S> = SketchCache::new();
        let mut progress =
            Progress::new("forward-streaming", snapshot.mixes().len(), self.progress_every);
        let mut rounds = Vec::with_capacity(snapshot.mixes().len());
        let mut later_exits = 0u64;

        for (round, &mix) in snapshot.mixes().iter().enumerate().rev() {
            let exits = snapshot.exits(mix);
            later_exits += exits;

            let mut descendants = empty.clone();
            for index in 0..exits {
                descendants.insert(exit_key(mix, index));
            }
            for &next in snapshot.forward_links(mix) {
                if !cache.consume_into(next, &mut descendants) {
                    debug!(%mix, %next, "successor sketch missing from cache");
                }
            }

            let anonset = descendants.count();
            let producers = snapshot
                .backward_links(mix)
                .iter()
                .filter(|&&prev| snapshot.is_mix(prev))
                .count();
            cache.store(mix, producers, descendants);
            rounds.push(round_metric(round, mix, anonset, later_exits));
            progress.tick();
        }
        rounds.reverse();

        let stats = cache.stats();
        info!(
            total_exits = later_exits,
            cache_high_water = stats.high_water,
            cache_residual = stats.residual,
            "forward metrics done"
        );
        ForwardReport {
            rounds,
            total_exits: later_exits,
            cache: stats,
        }
    }

    /// Exact anonset of a single mix.
    pub fn anonset_of(&self, mix: Tiid) -> Result<u64, MetricsError> {
        if !self.snapshot.is_mix(mix) {
            return Err(MetricsError::NotAMix(mix));
        }
        Ok(ExactWalker::new(self.snapshot).descendant_exits(mix))
    }

    /// Spread of `anonset` over the exits created from `round` to the last round.
    pub fn spread_of(&self, round: usize, anonset: u64) -> Option<f64> {
        let later_exits = self
            .snapshot
            .mixes()
            .iter()
            .skip(round)
            .map(|&m| self.snapshot.exits(m))
            .sum();
        spread(anonset, later_exits)
    }
}

fn round_metric(round: usize, mix: Tiid, anonset: u64, later_exits: u64) -> RoundMetric {
    RoundMetric {
        round,
        tiid: mix,
        anonset,
        spread: spread(anonset, later_exits),
    }
}
