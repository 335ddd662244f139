//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::Authenticator;
use crate::service::BookingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking service for all business logic.
    pub booking_service: Arc<BookingService>,
    /// Resolves bearer tokens to principals.
    pub authenticator: Arc<dyn Authenticator>,
}
