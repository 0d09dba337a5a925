//! Agreement between exact and streaming anonsets.

use tracing::info;
use wst_graph::GraphSnapshot;
use wst_sketch::CardinalitySketch;

use crate::backward::BackwardAnonsetEngine;
use crate::forward::ForwardAnonsetEngine;
use crate::report::RoundMetric;

/// Largest gap observed between two per-round anonset sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Discrepancy {
    /// `|exact - approx| / exact`, rounds with an exact anonset of 0 compared absolutely.
    pub max_relative: f64,
    pub max_absolute: u64,
    /// Round where `max_relative` was reached.
    pub worst_round: Option<usize>,
}

impl Discrepancy {
    fn between(exact: &[RoundMetric], approx: &[RoundMetric]) -> Self {
        let mut out = Self::default();
        for (e, a) in exact.iter().zip(approx) {
            let absolute = e.anonset.abs_diff(a.anonset);
            let relative = if e.anonset == 0 {
                absolute as f64
            } else {
                absolute as f64 / e.anonset as f64
            };
            out.max_absolute = out.max_absolute.max(absolute);
            if relative > out.max_relative {
                out.max_relative = relative;
                out.worst_round = Some(e.round);
            }
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidationReport {
    pub backward: Discrepancy,
    pub forward: Discrepancy,
}

impl ValidationReport {
    /// Whether both directions stay within `tolerance` (relative).
    pub fn within(&self, tolerance: f64) -> bool {
        self.backward.max_relative <= tolerance && self.forward.max_relative <= tolerance
    }
}

/// Run both directions in exact and streaming mode and compare them round by round.
pub fn validate<S: CardinalitySketch>(snapshot: &GraphSnapshot, empty: &S) -> ValidationReport {
    let backward_engine = BackwardAnonsetEngine::new(snapshot);
    let backward = Discrepancy::between(
        &backward_engine.compute_exact().rounds,
        &backward_engine.compute_streaming(empty).rounds,
    );
    let forward_engine = ForwardAnonsetEngine::new(snapshot);
    let forward = Discrepancy::between(
        &forward_engine.compute_exact().rounds,
        &forward_engine.compute_streaming(empty).rounds,
    );
    info!(
        backward_max = backward.max_relative,
        forward_max = forward.max_relative,
        "validation done"
    );
    ValidationReport { backward, forward }
}
