//! Persistence layer: the booking table and its overlap query.
//!
//! [`BookingRepository`] is the only owner of booking rows. It is
//! deliberately lock-agnostic: `insert` does not check for overlap, the
//! admission protocol does that under the per-resource lock. Two
//! implementations exist, PostgreSQL via `sqlx` and an in-memory table.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

pub use memory::InMemoryBookingRepository;
pub use postgres::PostgresBookingRepository;

use crate::domain::{Booking, BookingId, BookingStatus, ResourceId, TimeRange};

/// Storage failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    /// The database rejected or failed the statement.
    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be mapped to the domain model.
    #[error("corrupt booking row {id}: {reason}")]
    CorruptRow {
        /// Offending row id.
        id: i64,
        /// What was wrong with it.
        reason: String,
    },
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Durable store of bookings.
///
/// Only single-statement atomicity is assumed of implementations.
#[async_trait]
pub trait BookingRepository: Send + Sync + fmt::Debug {
    /// Counts active (`pending` or `approved`) bookings on `resource_id`
    /// whose interval intersects `range`, using
    /// `existing.start < range.end AND existing.end > range.start`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on storage failure.
    async fn count_overlapping(
        &self,
        resource_id: ResourceId,
        range: &TimeRange,
    ) -> Result<u64, RepositoryError>;

    /// Inserts a `pending` booking and returns its id. Performs no overlap check.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on storage failure.
    async fn insert(
        &self,
        resource_id: ResourceId,
        range: &TimeRange,
    ) -> Result<BookingId, RepositoryError>;

    /// Returns every booking, newest `created_at` first.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on storage failure.
    async fn list(&self) -> Result<Vec<Booking>, RepositoryError>;

    /// Fetches one booking.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on storage failure.
    async fn get(&self, id: BookingId) -> Result<Option<Booking>, RepositoryError>;

    /// Overwrites the status of `id` without looking at the current one.
    ///
    /// Returns `false` if no such booking exists.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on storage failure.
    async fn set_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<bool, RepositoryError>;

    /// Sets the status of `id` to `next` only if it is currently `expected`,
    /// as a single compare-and-set statement.
    ///
    /// Returns `false` if the booking is missing or its status differs.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on storage failure.
    async fn set_status_if(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<bool, RepositoryError>;
}
