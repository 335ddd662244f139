//! Concurrency-safe booking admission.
//!
//! `create_booking` validates the range, takes the per-resource lock,
//! checks for overlapping active bookings, inserts, and releases the
//! lock on every path. The lock wraps both the check and the insert;
//! without it two requests could each count zero overlaps and both
//! insert.
//!
//! Overlap safety holds only while every writer goes through this
//! protocol and each critical section finishes within the lock TTL.

use std::sync::Arc;

use crate::domain::{BookingId, ResourceId, TimeRange, TimeRangeError};
use crate::lock::{LockGuard, LockService, LockSettings};
use crate::persistence::{BookingRepository, RepositoryError};

/// Why a booking was not admitted.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AdmissionError {
    /// Unparseable timestamps or `end <= start`. Never retried.
    #[error(transparent)]
    InvalidRange(#[from] TimeRangeError),

    /// The resource lock is held or the lock store is unreachable. Retryable.
    #[error("resource {0} is being booked, try again")]
    Busy(ResourceId),

    /// An active booking overlaps the requested range.
    #[error("resource {resource_id} already booked in that time range")]
    Conflict {
        /// Contended resource.
        resource_id: ResourceId,
        /// Number of overlapping active bookings.
        overlapping: u64,
    },

    /// Count or insert failed.
    #[error("storage failure: {0}")]
    StorageError(#[from] RepositoryError),
}

/// Serialises admission decisions per resource through a [`LockService`].
#[derive(Debug, Clone)]
pub struct AdmissionProtocol {
    repository: Arc<dyn BookingRepository>,
    locks: Arc<dyn LockService>,
    settings: LockSettings,
}

impl AdmissionProtocol {
    /// Wires the protocol to its store, lock service and lock settings.
    #[must_use]
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        locks: Arc<dyn LockService>,
        settings: LockSettings,
    ) -> Self {
        Self {
            repository,
            locks,
            settings,
        }
    }

    /// Lock settings in effect.
    #[must_use]
    pub fn settings(&self) -> &LockSettings {
        &self.settings
    }

    /// Admits a booking given RFC 3339 bounds.
    ///
    /// Range validation happens before the lock or the store is touched.
    ///
    /// # Errors
    ///
    /// See [`AdmissionError`].
    pub async fn create_booking(
        &self,
        resource_id: ResourceId,
        start: &str,
        end: &str,
    ) -> Result<BookingId, AdmissionError> {
        let range = TimeRange::parse_rfc3339(start, end)?;
        self.admit(resource_id, range).await
    }

    /// Admits a booking for an already validated range.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Busy`], [`AdmissionError::Conflict`] or
    /// [`AdmissionError::StorageError`].
    pub async fn admit(
        &self,
        resource_id: ResourceId,
        range: TimeRange,
    ) -> Result<BookingId, AdmissionError> {
        let key = self.settings.key_for(resource_id);
        let guard = match LockGuard::acquire(Arc::clone(&self.locks), key, self.settings.ttl).await
        {
            Ok(Some(guard)) => guard,
            Ok(None) => {
                tracing::debug!(%resource_id, "resource lock contended");
                return Err(AdmissionError::Busy(resource_id));
            }
            Err(e) => {
                // Fail closed: an unreachable lock store never admits.
                tracing::warn!(%resource_id, error = %e, "lock store unavailable");
                return Err(AdmissionError::Busy(resource_id));
            }
        };

        let outcome = self.check_and_insert(resource_id, &range).await;
        guard.release().await;
        outcome
    }

    async fn check_and_insert(
        &self,
        resource_id: ResourceId,
        range: &TimeRange,
    ) -> Result<BookingId, AdmissionError> {
        let overlapping = self
            .repository
            .count_overlapping(resource_id, range)
            .await
            .inspect_err(|e| tracing::warn!(%resource_id, error = %e, "overlap count failed"))?;
        if overlapping > 0 {
            tracing::debug!(%resource_id, overlapping, "booking rejected: overlap");
            return Err(AdmissionError::Conflict {
                resource_id,
                overlapping,
            });
        }

        let booking_id = self
            .repository
            .insert(resource_id, range)
            .await
            .inspect_err(|e| tracing::warn!(%resource_id, error = %e, "booking insert failed"))?;

        tracing::info!(
            %booking_id,
            %resource_id,
            start = %range.start(),
            end = %range.end(),
            "booking created"
        );
        Ok(booking_id)
    }
}
