//! Type-safe integer identifiers.
//!
//! [`BookingId`] and [`ResourceId`] both wrap an `i64` (the Postgres
//! `BIGINT` column type) so that a booking id can never be passed where a
//! resource id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a persisted booking.
///
/// Generated by the store on insert and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(i64);

impl BookingId {
    /// Wraps a raw store identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a bookable resource.
///
/// Resource attributes and inventory live outside this service; only the
/// id is needed to scope overlap checks and locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(i64);

impl ResourceId {
    /// Wraps a raw resource identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_integer() {
        assert_eq!(BookingId::new(42).to_string(), "42");
        assert_eq!(ResourceId::new(7).to_string(), "7");
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&BookingId::new(3)).ok();
        assert_eq!(json.as_deref(), Some("3"));

        let parsed: Option<ResourceId> = serde_json::from_str("9").ok();
        assert_eq!(parsed, Some(ResourceId::new(9)));
    }

    #[test]
    fn ordering_follows_raw_value() {
        assert!(BookingId::new(1) < BookingId::new(2));
    }
}
