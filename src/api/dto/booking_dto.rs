//! Booking DTOs for create, list and status-change operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Booking, BookingStatus};

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Resource to book.
    pub resource_id: i64,
    /// Inclusive start, RFC 3339.
    #[schema(example = "2026-05-01T10:00:00Z")]
    pub start_time: String,
    /// Exclusive end, RFC 3339. Must be after `start_time`.
    #[schema(example = "2026-05-01T11:00:00Z")]
    pub end_time: String,
}

/// Response body for `POST /bookings` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookingResponse {
    /// Always `"booking created"`.
    pub message: String,
    /// Id of the new booking.
    pub booking_id: i64,
    /// Always `"pending"`.
    pub status: String,
}

/// A booking as returned by list and detail endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    /// Booking id.
    pub id: i64,
    /// Booked resource.
    pub resource_id: i64,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Exclusive end.
    pub end_time: DateTime<Utc>,
    /// `pending`, `approved` or `cancelled`.
    pub status: String,
}

impl From<&Booking> for BookingDto {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id.get(),
            resource_id: b.resource_id.get(),
            start_time: b.range.start(),
            end_time: b.range.end(),
            status: b.status.to_string(),
        }
    }
}

/// Response body for approve and cancel.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusChangeResponse {
    /// `"approved"` or `"cancelled"`.
    pub message: String,
    /// Booking id.
    pub booking_id: i64,
    /// New status.
    pub status: String,
}

impl StatusChangeResponse {
    /// Builds the response for a booking that just changed status.
    #[must_use]
    pub fn for_booking(b: &Booking) -> Self {
        Self {
            message: b.status.to_string(),
            booking_id: b.id.get(),
            status: b.status.to_string(),
        }
    }
}

impl CreateBookingResponse {
    /// Builds the response for a freshly admitted booking.
    #[must_use]
    pub fn created(booking_id: i64) -> Self {
        Self {
            message: "booking created".to_string(),
            booking_id,
            status: BookingStatus::Pending.to_string(),
        }
    }
}
