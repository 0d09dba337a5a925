//! A complete analysis of one pool.

use std::time::Instant;

use tracing::info;
use wst_graph::GraphSnapshot;
use wst_types::Denomination;
use wst_utils::format_duration;

use crate::backward::{BackwardAnonsetEngine, BackwardReport};
use crate::config::{AnalysisConfig, AnonsetMode};
use crate::counterparty::{CounterpartyHeterogeneityEngine, CounterpartyReport};
use crate::forward::{ForwardAnonsetEngine, ForwardReport};
use crate::report::ActivityReport;
use crate::MetricsError;

/// Every metric family computed over one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub denomination: Option<Denomination>,
    pub backward: BackwardReport,
    pub forward: ForwardReport,
    pub tx0s: CounterpartyReport,
    /// Backward-pass activity merged with new Tx0s per day.
    pub activity: ActivityReport,
}

impl Analysis {
    pub fn run(snapshot: &GraphSnapshot, config: &AnalysisConfig) -> Result<Self, MetricsError> {
        let started = Instant::now();
        let every = config.progress_every;
        let backward_engine = BackwardAnonsetEngine::new(snapshot).with_progress_every(every);
        let forward_engine = ForwardAnonsetEngine::new(snapshot).with_progress_every(every);

        let (backward, forward) = match config.mode {
            AnonsetMode::Exact => (backward_engine.compute_exact(), forward_engine.compute_exact()),
            AnonsetMode::Streaming => {
                let empty = config.sketch()?;
                (
                    backward_engine.compute_streaming(&empty),
                    forward_engine.compute_streaming(&empty),
                )
            }
        };
        let tx0s = CounterpartyHeterogeneityEngine::new(snapshot)
            .with_progress_every(every)
            .compute();

        let mut activity = backward.activity.clone();
        activity.merge(&tx0s.activity);

        info!(
            mode = %config.mode,
            rounds = backward.rounds.len(),
            tx0s = tx0s.metrics.len(),
            days = activity.len(),
            elapsed = %format_duration(started.elapsed()),
            "analysis complete"
        );
        Ok(Self {
            denomination: snapshot.denomination(),
            backward,
            forward,
            tx0s,
            activity,
        })
    }
}
