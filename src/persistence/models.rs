//! Database row model for the `bookings` table.

use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::{Booking, BookingId, BookingStatus, ResourceId, TimeRange};

/// Raw `bookings` row as selected by the repository.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    /// `BIGSERIAL` primary key.
    pub id: i64,
    /// Booked resource.
    pub resource_id: i64,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Exclusive end.
    pub end_time: DateTime<Utc>,
    /// Status text (`pending`, `approved`, `cancelled`).
    pub status: String,
    /// Server-side insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepositoryError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|e| RepositoryError::CorruptRow {
                id: row.id,
                reason: e.to_string(),
            })?;
        let range = TimeRange::new(row.start_time, row.end_time).map_err(|e| {
            RepositoryError::CorruptRow {
                id: row.id,
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            id: BookingId::new(row.id),
            resource_id: ResourceId::new(row.resource_id),
            range,
            status,
            created_at: row.created_at,
        })
    }
}
