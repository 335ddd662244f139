//! Booking service: the single entry point used by the HTTP layer.

use std::sync::Arc;

use crate::domain::{Booking, BookingId, ResourceId};
use crate::lock::{LockService, LockSettings};
use crate::persistence::{BookingRepository, RepositoryError};

use super::admission::{AdmissionError, AdmissionProtocol};
use super::status_machine::{StatusMachine, TransitionError};

/// Orchestration layer for booking operations.
///
/// Holds explicitly injected handles to the booking store and the lock
/// service; nothing here reaches for process-global connections.
#[derive(Debug, Clone)]
pub struct BookingService {
    repository: Arc<dyn BookingRepository>,
    admission: AdmissionProtocol,
    status: StatusMachine,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        locks: Arc<dyn LockService>,
        lock_settings: LockSettings,
    ) -> Self {
        Self {
            admission: AdmissionProtocol::new(Arc::clone(&repository), locks, lock_settings),
            status: StatusMachine::new(Arc::clone(&repository)),
            repository,
        }
    }

    /// Creates a `pending` booking if the range is free.
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
        self.admission.create_booking(resource_id, start, end).await
    }

    /// All bookings, newest first. Cancelled ones are included.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on storage failure.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, RepositoryError> {
        self.repository.list().await
    }

    /// A single booking.
    ///
    /// # Errors
    ///
    /// [`TransitionError::NotFound`] if absent, [`TransitionError::StorageError`]
    /// on storage failure.
    pub async fn get_booking(&self, id: BookingId) -> Result<Booking, TransitionError> {
        self.repository
            .get(id)
            .await?
            .ok_or(TransitionError::NotFound(id))
    }

    /// Approves a pending booking.
    ///
    /// # Errors
    ///
    /// See [`TransitionError`].
    pub async fn approve_booking(&self, id: BookingId) -> Result<Booking, TransitionError> {
        self.status.approve(id).await
    }

    /// Cancels a pending booking.
    ///
    /// # Errors
    ///
    /// See [`TransitionError`].
    pub async fn cancel_booking(&self, id: BookingId) -> Result<Booking, TransitionError> {
        self.status.cancel(id).await
    }
}
