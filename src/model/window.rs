//! Time window used to filter which edges participate in an expansion.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Inclusive `[start_ms, end_ms]` range in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// A window admitting every timestamp.
    pub fn all() -> Self {
        Self { start_ms: i64::MIN, end_ms: i64::MAX }
    }

    /// The last `days` days ending at `now`, as the dashboard queries it.
    ///
    /// A start before the representable date range is left unbounded.
    pub fn trailing_days(days: u32, now: DateTime<Utc>) -> Self {
        let start_ms = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .map_or(i64::MIN, |start| start.timestamp_millis());
        Self {
            start_ms,
            end_ms: now.timestamp_millis(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.end_ms < self.start_ms {
            return Err(Error::InvalidArgument(format!(
                "time window end {} precedes start {}",
                self.end_ms, self.start_ms
            )));
        }
        Ok(())
    }

    pub fn contains(&self, ts: i64) -> bool {
        self.start_ms <= ts && ts <= self.end_ms
    }
}
