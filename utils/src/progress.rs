//! Periodic progress reporting for long single-pass computations.

use tracing::debug;

/// Emits a `debug!` line every `every` ticks of a pass over `total` items.
pub struct Progress {
    label: &'static str,
    total: usize,
    every: usize,
    done: usize,
}

impl Progress {
    pub fn new(label: &'static str, total: usize, every: usize) -> Self {
        Self {
            label,
            total,
            every: every.max(1),
            done: 0,
        }
    }

    /// Record one processed item.
    pub fn tick(&mut self) {
        self.done += 1;
        if self.done % self.every == 0 {
            debug!(
                pass = self.label,
                done = self.done,
                total = self.total,
                pct = self.percent(),
                "progress"
            );
        }
    }

    pub fn done(&self) -> usize {
        self.done
    }

    fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.done * 100 / self.total
        }
    }
}
