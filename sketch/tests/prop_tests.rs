use proptest::prelude::*;
use std::collections::HashSet;

use wst_sketch::{CardinalitySketch, ExactSet, HyperLogLog};

proptest! {
    /// In the sparse phase the sketch agrees with an exact set.
    #[test]
    fn sparse_phase_matches_exact(items in prop::collection::vec(0u64..10_000, 0..400)) {
        let mut hll = HyperLogLog::default();
        let mut exact = ExactSet::new();
        for &item in &items {
            hll.insert(item);
            exact.insert(item);
        }
        prop_assert_eq!(hll.count(), exact.count());
    }

    /// merge(a, b) and merge(b, a) give the same estimate.
    #[test]
    fn merge_is_commutative(
        a in prop::collection::vec(any::<u64>(), 0..300),
        b in prop::collection::vec(any::<u64>(), 0..300),
    ) {
        let mut ha = HyperLogLog::new(8).unwrap();
        let mut hb = HyperLogLog::new(8).unwrap();
        a.iter().for_each(|&x| ha.insert(x));
        b.iter().for_each(|&x| hb.insert(x));

        let mut ab = ha.clone();
        ab.merge(&hb);
        let mut ba = hb.clone();
        ba.merge(&ha);
        prop_assert_eq!(ab.estimate(), ba.estimate());
    }

    /// Merging a sketch into itself changes nothing.
    #[test]
    fn merge_is_idempotent(items in prop::collection::vec(any::<u64>(), 0..300)) {
        let mut hll = HyperLogLog::new(8).unwrap();
        items.iter().for_each(|&x| hll.insert(x));
        let before = hll.estimate();
        let copy = hll.clone();
        hll.merge(&copy);
        prop_assert_eq!(hll.estimate(), before);
    }

    /// Merging two sketches estimates the union as well as inserting everything directly.
    #[test]
    fn merge_equals_direct_insertion(
        a in prop::collection::vec(any::<u64>(), 0..300),
        b in prop::collection::vec(any::<u64>(), 0..300),
    ) {
        let mut ha = HyperLogLog::new(8).unwrap();
        let mut hb = HyperLogLog::new(8).unwrap();
        let mut direct = HyperLogLog::new(8).unwrap();
        a.iter().for_each(|&x| { ha.insert(x); direct.insert(x); });
        b.iter().for_each(|&x| { hb.insert(x); direct.insert(x); });
        ha.merge(&hb);

        let distinct: HashSet<u64> = a.iter().chain(b.iter()).copied().collect();
        prop_assert_eq!(ha.is_sparse(), direct.is_sparse());
        if ha.is_sparse() {
            prop_assert_eq!(ha.count(), distinct.len() as u64);
        }
        prop_assert_eq!(ha.estimate(), direct.estimate());
    }
}
