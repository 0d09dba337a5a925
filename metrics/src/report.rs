//! Result records shared by the engines.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use wst_types::{Tiid, Timestamp};

/// Anonymity set of one mix round, with its spread over the eligible population.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundMetric {
    pub round: usize,
    pub tiid: Tiid,
    pub anonset: u64,
    /// `None` when the eligible population is empty.
    pub spread: Option<f64>,
}

/// Percentage of `population` covered by `anonset`; undefined for an empty population.
pub fn spread(anonset: u64, population: u64) -> Option<f64> {
    (population > 0).then(|| anonset as f64 * 100.0 / population as f64)
}

/// Pool activity during one UTC day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayActivity {
    pub nb_mixes: u64,
    /// Tx0 outputs entering a first mix.
    pub inflow: u64,
    pub nb_new_tx0s: u64,
    /// Distinct Tx0s with an output entering a first mix that day.
    pub nb_active_tx0s: u64,
}

impl DayActivity {
    fn absorb(&mut self, other: &DayActivity) {
        self.nb_mixes += other.nb_mixes;
        self.inflow += other.inflow;
        self.nb_new_tx0s += other.nb_new_tx0s;
        self.nb_active_tx0s += other.nb_active_tx0s;
    }
}

/// Daily aggregates keyed by UTC date.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivityReport {
    days: BTreeMap<NaiveDate, DayActivity>,
}

impl ActivityReport {
    pub fn day(&self, date: NaiveDate) -> Option<&DayActivity> {
        self.days.get(&date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayActivity)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Add every counter of `other` into `self`, day by day.
    pub fn merge(&mut self, other: &ActivityReport) {
        for (date, activity) in &other.days {
            self.days.entry(*date).or_default().absorb(activity);
        }
    }

    pub(crate) fn day_mut(&mut self, timestamp: Timestamp) -> &mut DayActivity {
        self.days.entry(timestamp.utc_day()).or_default()
    }
}

/// Collects mix-side daily activity during a chronological pass.
#[derive(Default)]
pub(crate) struct ActivityTracker {
    report: ActivityReport,
    active: HashMap<NaiveDate, HashSet<Tiid>>,
}

impl ActivityTracker {
    pub(crate) fn record_mix(&mut self, timestamp: Timestamp) {
        self.report.day_mut(timestamp).nb_mixes += 1;
    }

    pub(crate) fn record_inflow(&mut self, timestamp: Timestamp, tx0: Tiid) {
        self.report.day_mut(timestamp).inflow += 1;
        self.active.entry(timestamp.utc_day()).or_default().insert(tx0);
    }

    pub(crate) fn finish(mut self) -> ActivityReport {
        for (date, tx0s) in self.active {
            self.report.days.entry(date).or_default().nb_active_tx0s = tx0s.len() as u64;
        }
        self.report
    }
}
