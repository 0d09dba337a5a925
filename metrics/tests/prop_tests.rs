use proptest::prelude::*;

use wst_graph::{EdgeRecord, FundingRecord, GraphSnapshot, MixRecord};
use wst_metrics::{
    validate, BackwardAnonsetEngine, CounterpartyHeterogeneityEngine, ForwardAnonsetEngine,
};
use wst_sketch::{ExactSet, HyperLogLog};
use wst_types::{Tiid, Timestamp, TxPrefix};

fn prefix(tiid: u32) -> TxPrefix {
    let mut bytes = [0xcd; 8];
    bytes[4..].copy_from_slice(&tiid.to_be_bytes());
    TxPrefix::new(bytes)
}

fn timestamp(tiid: u32) -> Timestamp {
    Timestamp::new(1_568_246_400 + u64::from(tiid) * 1_800)
}

/// Each entry is one transaction in tiid order: `(is_mix, picks)`. A mix spends
/// free outputs of the earlier transactions selected by `picks`.
fn build(plan: &[(bool, Vec<u16>)]) -> GraphSnapshot {
    let mut b = GraphSnapshot::builder(5);
    let mut spent = vec![0u32; plan.len()];
    let mut outputs = vec![0u32; plan.len()];
    for (i, (is_mix, picks)) in plan.iter().enumerate() {
        let tiid = i as u32;
        if *is_mix && i > 0 {
            b.push_mix(MixRecord {
                tiid: Tiid::new(tiid),
                prefix: prefix(tiid),
                timestamp: timestamp(tiid),
                outputs: None,
            })
            .unwrap();
            outputs[i] = 5;
            for &pick in picks {
                let source = usize::from(pick) % i;
                if spent[source] < outputs[source] {
                    spent[source] += 1;
                    b.push_edge(EdgeRecord {
                        source: Tiid::new(source as u32),
                        target: Tiid::new(tiid),
                    })
                    .unwrap();
                }
            }
        } else {
            let nb_outs = 1 + picks.len() as u32 % 5;
            b.push_funding(FundingRecord {
                tiid: Tiid::new(tiid),
                prefix: prefix(tiid),
                timestamp: timestamp(tiid),
                outputs: nb_outs,
            })
            .unwrap();
            outputs[i] = nb_outs;
        }
    }
    b.build()
}

fn plan_strategy() -> impl Strategy<Value = Vec<(bool, Vec<u16>)>> {
    prop::collection::vec((any::<bool>(), prop::collection::vec(any::<u16>(), 1..6)), 1..80)
}

proptest! {
    /// Streaming over exact sets reproduces the exact walks round for round.
    #[test]
    fn streaming_matches_exact(plan in plan_strategy()) {
        let snap = build(&plan);
        let backward = BackwardAnonsetEngine::new(&snap);
        let exact = backward.compute_exact();
        let streaming = backward.compute_streaming(&ExactSet::new());
        prop_assert_eq!(&exact.rounds, &streaming.rounds);
        prop_assert_eq!(&exact.activity, &streaming.activity);

        let forward = ForwardAnonsetEngine::new(&snap);
        prop_assert_eq!(forward.compute_exact(), {
            let mut r = forward.compute_streaming(&ExactSet::new());
            r.cache = Default::default();
            r
        });
    }

    /// Small graphs never leave the sparse phase, where the sketch is exact.
    #[test]
    fn hyperloglog_agrees_on_small_graphs(plan in plan_strategy()) {
        let snap = build(&plan);
        prop_assert!(validate(&snap, &HyperLogLog::default()).within(0.0));
    }

    /// Every cached sketch is read by all of its consumers before the pass ends.
    #[test]
    fn cache_drains(plan in plan_strategy()) {
        let snap = build(&plan);
        let hll = HyperLogLog::default();
        prop_assert_eq!(BackwardAnonsetEngine::new(&snap).compute_streaming(&hll).cache.residual, 0);
        prop_assert_eq!(ForwardAnonsetEngine::new(&snap).compute_streaming(&hll).cache.residual, 0);
    }

    #[test]
    fn recomputing_is_idempotent(plan in plan_strategy()) {
        let snap = build(&plan);
        let hll = HyperLogLog::new(10).unwrap();
        let backward = BackwardAnonsetEngine::new(&snap);
        prop_assert_eq!(backward.compute_streaming(&hll), backward.compute_streaming(&hll));
        let forward = ForwardAnonsetEngine::new(&snap);
        prop_assert_eq!(forward.compute_exact(), forward.compute_exact());
    }

    /// The exits summed per round equal the exits counted over the whole pool,
    /// and no forward anonset exceeds them.
    #[test]
    fn exits_are_conserved(plan in plan_strategy()) {
        let snap = build(&plan);
        let report = ForwardAnonsetEngine::new(&snap).compute_exact();
        let created: u64 = snap.mixes().iter().map(|&m| 5 - snap.forward_links(m).len() as u64).sum();
        prop_assert_eq!(report.total_exits, created);
        for round in &report.rounds {
            prop_assert!(round.anonset <= report.total_exits);
        }
    }

    /// A mix sees at least the ancestors of the mixes it spends from, and at most
    /// the descendants of the mixes spending from it.
    #[test]
    fn anonsets_are_monotonic_along_links(plan in plan_strategy()) {
        let snap = build(&plan);
        let backward = BackwardAnonsetEngine::new(&snap).compute_exact();
        let forward = ForwardAnonsetEngine::new(&snap).compute_exact();
        for (round, &mix) in snap.mixes().iter().enumerate() {
            for &prev in snap.backward_links(mix) {
                if let Some(prev_round) = snap.round_of(prev) {
                    prop_assert!(backward.rounds[prev_round].anonset <= backward.rounds[round].anonset);
                    prop_assert!(forward.rounds[round].anonset <= forward.rounds[prev_round].anonset);
                }
            }
        }
    }

    /// If A met B in a first mix, B met A in that same mix.
    #[test]
    fn counterparties_are_symmetric(plan in plan_strategy()) {
        let snap = build(&plan);
        let engine = CounterpartyHeterogeneityEngine::new(&snap);
        for &a in snap.funding() {
            for b in engine.counterparty_set(a) {
                prop_assert!(engine.counterparty_set(b).contains(&a));
            }
        }
    }
}

/// 1500 chained mixes, each also spending four fresh Tx0s: backward anonsets grow
/// well past the sparse phase.
///
/// The sketch's relative error is a per-round statistical bound (one standard
/// error is `1.04 / sqrt(m)`, about 0.8% at the default precision); every round
/// must stay within two standard errors.
#[test]
fn dense_sketch_stays_within_error_bound() {
    let mut b = GraphSnapshot::builder(5);
    let mut tiid = 0u32;
    let mut previous_mix = None;
    for _ in 0..1500 {
        let mut inputs = Vec::with_capacity(5);
        for _ in 0..4 {
            b.push_funding(FundingRecord {
                tiid: Tiid::new(tiid),
                prefix: prefix(tiid),
                timestamp: timestamp(tiid),
                outputs: 1,
            })
            .unwrap();
            inputs.push(tiid);
            tiid += 1;
        }
        inputs.extend(previous_mix);
        b.push_mix(MixRecord {
            tiid: Tiid::new(tiid),
            prefix: prefix(tiid),
            timestamp: timestamp(tiid),
            outputs: None,
        })
        .unwrap();
        for source in inputs {
            b.push_edge(EdgeRecord {
                source: Tiid::new(source),
                target: Tiid::new(tiid),
            })
            .unwrap();
        }
        previous_mix = Some(tiid);
        tiid += 1;
    }
    let snap = b.build();

    let backward = BackwardAnonsetEngine::new(&snap).compute_exact();
    assert_eq!(backward.rounds[1499].anonset, 6000);

    let empty = HyperLogLog::default();
    let report = validate(&snap, &empty);
    assert!(report.within(2.0 * empty.relative_error()), "{report:?}");
}
