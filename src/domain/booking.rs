//! Booking record and its status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ResourceId, TimeRange};

/// Lifecycle state of a booking.
///
/// `Pending` is the only initial state. `Approved` and `Cancelled` are
/// terminal: once reached, no further transition is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting a decision.
    Pending,
    /// Accepted by an administrator.
    Approved,
    /// Withdrawn; no longer blocks the time range.
    Cancelled,
}

impl BookingStatus {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a booking in this state participates in overlap checks.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Returns `true` if `self -> next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A persisted booking.
///
/// `created_at` is set by the store on insert and is the list ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    /// Store-assigned identifier.
    pub id: BookingId,
    /// Booked resource.
    pub resource_id: ResourceId,
    /// Booked interval `[start, end)`.
    pub range: TimeRange,
    /// Current lifecycle state.
    pub status: BookingStatus,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}
