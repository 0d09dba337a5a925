//! Confirmation timestamps.
//!
//! Timestamps are Unix epoch seconds (UTC) taken from the block that confirmed a
//! transaction. Daily aggregates bucket them by UTC calendar day.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECS_PER_DAY: u64 = 86_400;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// The same UTC day at 00:00.
    pub fn start_of_day(&self) -> Self {
        Self(self.0 - self.0 % SECS_PER_DAY)
    }

    /// The UTC calendar day this timestamp falls in.
    pub fn utc_day(&self) -> NaiveDate {
        i64::try_from(self.start_of_day().0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.date_naive())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_of_day_truncates_to_midnight() {
        // 2019-09-12 17:03:20 UTC
        let ts = Timestamp::new(1_568_307_800);
        assert_eq!(ts.start_of_day(), Timestamp::new(1_568_246_400));
    }

    #[test]
    fn utc_day_matches_calendar() {
        let ts = Timestamp::new(1_568_307_800);
        assert_eq!(ts.utc_day(), NaiveDate::from_ymd_opt(2019, 9, 12).unwrap());
        assert_eq!(Timestamp::EPOCH.utc_day(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }
}
