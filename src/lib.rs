//! # resource-booking
//!
//! REST API for reserving time slots on shared resources.
//!
//! Clients request `[start, end)` ranges on a resource; the service
//! prevents double booking by serialising admission per resource through
//! a TTL lock in a shared coordination store and then checking the
//! booking table for overlapping active bookings before inserting.
//! Bookings start `pending` and are approved or cancelled exactly once.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers + bearer auth (api/, auth/)
//!     │
//!     ├── BookingService (service/)
//!     │     ├── AdmissionProtocol ── LockService (lock/: Redis | in-memory)
//!     │     └── StatusMachine
//!     │
//!     └── BookingRepository (persistence/: PostgreSQL | in-memory)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod lock;
pub mod persistence;
pub mod service;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the full application: routes, CORS and request tracing.
#[must_use]
pub fn build_app(state: AppState, cors_allowed_origins: &[String]) -> Router {
    api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_allowed_origins))
        .with_state(state)
}

/// CORS policy for the browser frontend.
///
/// `*` in the origin list allows any origin; unparseable origins are skipped.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect::<Vec<_>>(),
        )
    };
    let allow_headers: [HeaderName; 3] =
        [header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION];

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(allow_headers)
        .max_age(std::time::Duration::from_secs(12 * 60 * 60))
}

/// Convenience for tests and single-instance mode: in-memory store and
/// lock wired into an [`AppState`].
#[must_use]
pub fn in_memory_state(
    lock_settings: lock::LockSettings,
    authenticator: Arc<dyn auth::Authenticator>,
) -> AppState {
    let repository = Arc::new(persistence::InMemoryBookingRepository::new());
    let locks = Arc::new(lock::InMemoryLockService::new());
    AppState {
        booking_service: Arc::new(service::BookingService::new(
            repository,
            locks,
            lock_settings,
        )),
        authenticator,
    }
}
