//! Half-open time intervals.
//!
//! A [`TimeRange`] is `[start, end)`: it contains `start` but not `end`,
//! so a range ending at `T` and another starting at `T` do not overlap.
//! Construction enforces `end > start`; an instance is always non-empty.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Reasons a time range is rejected before any shared state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeRangeError {
    /// `start_time` is not a valid RFC 3339 timestamp.
    #[error("invalid start_time: {0}")]
    InvalidStart(String),

    /// `end_time` is not a valid RFC 3339 timestamp.
    #[error("invalid end_time: {0}")]
    InvalidEnd(String),

    /// `end_time` is equal to or earlier than `start_time`.
    #[error("end_time must be after start_time")]
    EndNotAfterStart,
}

/// Non-empty half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Builds a range from two instants.
    ///
    /// # Errors
    ///
    /// Returns [`TimeRangeError::EndNotAfterStart`] if `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        if end <= start {
            return Err(TimeRangeError::EndNotAfterStart);
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two RFC 3339 strings (any offset, normalised to UTC).
    ///
    /// # Errors
    ///
    /// Returns [`TimeRangeError::InvalidStart`] / [`TimeRangeError::InvalidEnd`]
    /// for unparseable input, or [`TimeRangeError::EndNotAfterStart`].
    pub fn parse_rfc3339(start: &str, end: &str) -> Result<Self, TimeRangeError> {
        let start = DateTime::<FixedOffset>::parse_from_rfc3339(start)
            .map_err(|e| TimeRangeError::InvalidStart(e.to_string()))?;
        let end = DateTime::<FixedOffset>::parse_from_rfc3339(end)
            .map_err(|e| TimeRangeError::InvalidEnd(e.to_string()))?;
        Self::new(start.with_timezone(&Utc), end.with_timezone(&Utc))
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns `true` if the two ranges share at least one instant.
    ///
    /// Uses the strict predicate `self.start < other.end && self.end > other.start`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}
