//! Time intervals for viewing windows.
//!
//! Intervals are half-open: `[start, end)`. Two viewings that share exactly
//! one boundary instant (one ends at 10:30, the next starts at 10:30) do not
//! overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::temporal::parse_rfc3339;

/// A scheduled window `[start, end)` in UTC.
///
/// An interval whose end is not strictly after its start is *degenerate*.
/// Degenerate intervals are representable so that validation can report them
/// instead of failing to construct them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    #[serde(rename = "start_time")]
    pub start: DateTime<Utc>,
    #[serde(rename = "end_time")]
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Parse an interval from two RFC 3339 strings.
    ///
    /// The order of `start` and `end` is not checked here.
    ///
    /// # Errors
    ///
    /// Returns [`ViewingError::InvalidDatetime`](crate::ViewingError::InvalidDatetime)
    /// if either string cannot be parsed.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_rfc3339(start)?, parse_rfc3339(end)?))
    }

    /// `true` when `end <= start`.
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// Strict overlap: `self.start < other.end && self.end > other.start`.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whole minutes from the end of `self` to the start of `later`,
    /// rounded half-up. Negative when the two overlap.
    pub fn minutes_until(&self, later: &TimeInterval) -> i64 {
        let millis = (later.start - self.end).num_milliseconds();
        (millis + 30_000).div_euclid(60_000)
    }

    /// The smallest interval covering both.
    pub fn union(&self, other: &TimeInterval) -> TimeInterval {
        TimeInterval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
