//! Exact graph walks.
//!
//! Walks use an explicit stack and visit marks indexed by tiid, so chain depth
//! never touches the call stack. Marks are stamped with a walk epoch: starting a
//! new walk is O(1) instead of clearing the whole arena.

use wst_graph::GraphSnapshot;
use wst_types::Tiid;

struct VisitMarks {
    stamps: Vec<u32>,
    epoch: u32,
}

impl VisitMarks {
    fn new(len: usize) -> Self {
        Self {
            stamps: vec![0; len],
            epoch: 0,
        }
    }

    fn next_walk(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.stamps.fill(0);
            self.epoch = 1;
        }
    }

    /// Marks `tiid`; returns false if it was already visited during this walk.
    fn visit(&mut self, tiid: Tiid) -> bool {
        let slot = &mut self.stamps[tiid.index()];
        if *slot == self.epoch {
            false
        } else {
            *slot = self.epoch;
            true
        }
    }
}

/// Reusable walker over one snapshot. All walk state is owned by the walker, so
/// separate walkers never interfere.
pub struct ExactWalker<'a> {
    snapshot: &'a GraphSnapshot,
    marks: VisitMarks,
    stack: Vec<Tiid>,
}

impl<'a> ExactWalker<'a> {
    pub fn new(snapshot: &'a GraphSnapshot) -> Self {
        Self {
            snapshot,
            marks: VisitMarks::new(snapshot.arena_len()),
            stack: Vec::new(),
        }
    }

    fn start(&mut self, from: Tiid) {
        self.marks.next_walk();
        self.stack.clear();
        self.marks.visit(from);
        self.stack.push(from);
    }

    /// Number of distinct Tx0s reachable from `mix` through backward links.
    pub fn ancestor_funding(&mut self, mix: Tiid) -> u64 {
        let snapshot = self.snapshot;
        let mut count = 0;
        self.start(mix);
        while let Some(node) = self.stack.pop() {
            for &prev in snapshot.backward_links(node) {
                if !self.marks.visit(prev) {
                    continue;
                }
                if snapshot.is_mix(prev) {
                    self.stack.push(prev);
                } else if snapshot.is_funding(prev) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Number of exit outputs (never remixed) created by `mix` or any mix
    /// reachable from it through forward links.
    pub fn descendant_exits(&mut self, mix: Tiid) -> u64 {
        let snapshot = self.snapshot;
        let mut count = snapshot.exits(mix);
        self.start(mix);
        while let Some(node) = self.stack.pop() {
            for &next in snapshot.forward_links(node) {
                if self.marks.visit(next) && snapshot.is_mix(next) {
                    count += snapshot.exits(next);
                    self.stack.push(next);
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixture;

    /// F0, F1 -> M2; F1, M2 -> M3; M2 -> M4; M3, M4 -> M5 (diamond).
    fn diamond() -> GraphSnapshot {
        Fixture::new()
            .funding(0)
            .funding(1)
            .mix(2, 5)
            .mix(3, 5)
            .mix(4, 5)
            .mix(5, 5)
            .link(0, 2)
            .link(1, 2)
            .link(1, 3)
            .link(2, 3)
            .link(2, 4)
            .link(3, 5)
            .link(4, 5)
            .build()
    }

    #[test]
    fn ancestors_are_counted_once_across_paths() {
        let snap = diamond();
        let mut walker = ExactWalker::new(&snap);
        assert_eq!(walker.ancestor_funding(Tiid::new(2)), 2);
        assert_eq!(walker.ancestor_funding(Tiid::new(4)), 2);
        assert_eq!(walker.ancestor_funding(Tiid::new(5)), 2);
    }

    #[test]
    fn descendants_are_counted_once_across_paths() {
        let snap = diamond();
        let mut walker = ExactWalker::new(&snap);
        // exits: M2 = 3, M3 = 4, M4 = 4, M5 = 5
        assert_eq!(walker.descendant_exits(Tiid::new(5)), 5);
        assert_eq!(walker.descendant_exits(Tiid::new(3)), 9);
        assert_eq!(walker.descendant_exits(Tiid::new(2)), 16);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let depth = 50_000u32;
        let mut fixture = Fixture::new().funding(0);
        for t in 1..=depth {
            fixture = fixture.mix(t, 1).link(t - 1, t);
        }
        let snap = fixture.build();
        let mut walker = ExactWalker::new(&snap);
        assert_eq!(walker.ancestor_funding(Tiid::new(depth)), 1);
        assert_eq!(walker.descendant_exits(Tiid::new(1)), 1);
    }

    #[test]
    fn epoch_wrap_resets_marks() {
        let snap = diamond();
        let mut walker = ExactWalker::new(&snap);
        walker.marks.epoch = u32::MAX - 1;
        for _ in 0..4 {
            assert_eq!(walker.ancestor_funding(Tiid::new(5)), 2);
        }
    }
}
