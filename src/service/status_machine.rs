//! Booking status transitions.
//!
//! `pending` is the only state with outgoing edges; `approved` and
//! `cancelled` are terminal. Both operations read the current status, refuse
//! the change if the booking has already left `pending`, and then write with
//! a compare-and-set on the status they read, so two concurrent transitions
//! on one booking cannot both succeed.

use std::sync::Arc;

use crate::domain::{Booking, BookingId, BookingStatus};
use crate::persistence::{BookingRepository, RepositoryError};

/// Why a status change was refused.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransitionError {
    /// No booking with this id.
    #[error("booking not found: {0}")]
    NotFound(BookingId),

    /// The booking is not in a state that allows this transition.
    #[error("booking {id} cannot go from {from} to {to}")]
    InvalidTransition {
        /// Booking id.
        id: BookingId,
        /// Current status.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
    },

    /// Read or update failed.
    #[error("storage failure: {0}")]
    StorageError(#[from] RepositoryError),
}

/// Guards status writes against illegal transitions.
#[derive(Debug, Clone)]
pub struct StatusMachine {
    repository: Arc<dyn BookingRepository>,
}

impl StatusMachine {
    /// Creates a status machine over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }

    /// `pending -> approved`.
    ///
    /// # Errors
    ///
    /// [`TransitionError::NotFound`], [`TransitionError::InvalidTransition`]
    /// or [`TransitionError::StorageError`].
    pub async fn approve(&self, id: BookingId) -> Result<Booking, TransitionError> {
        self.transition(id, BookingStatus::Approved).await
    }

    /// `pending -> cancelled`.
    ///
    /// # Errors
    ///
    /// [`TransitionError::NotFound`], [`TransitionError::InvalidTransition`]
    /// or [`TransitionError::StorageError`].
    pub async fn cancel(&self, id: BookingId) -> Result<Booking, TransitionError> {
        self.transition(id, BookingStatus::Cancelled).await
    }

    async fn transition(
        &self,
        id: BookingId,
        next: BookingStatus,
    ) -> Result<Booking, TransitionError> {
        let mut booking = self
            .repository
            .get(id)
            .await?
            .ok_or(TransitionError::NotFound(id))?;

        if !booking.status.can_transition_to(next) {
            return Err(TransitionError::InvalidTransition {
                id,
                from: booking.status,
                to: next,
            });
        }

        let from = booking.status;
        if !self.repository.set_status_if(id, from, next).await? {
            // Lost a race with another transition; report what is stored now.
            let current = self
                .repository
                .get(id)
                .await?
                .ok_or(TransitionError::NotFound(id))?;
            return Err(TransitionError::InvalidTransition {
                id,
                from: current.status,
                to: next,
            });
        }

        tracing::info!(
            booking_id = %id,
            from = %from,
            to = %next,
            "booking status changed"
        );
        booking.status = next;
        Ok(booking)
    }
}
