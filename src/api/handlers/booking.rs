//! Booking handlers: create, list, get, approve, cancel.
//!
//! Every route requires a bearer token; approve additionally requires
//! the admin role.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BookingDto, CreateBookingRequest, CreateBookingResponse, StatusChangeResponse,
};
use crate::app_state::AppState;
use crate::auth::{Authenticated, require_admin};
use crate::domain::{BookingId, ResourceId};
use crate::error::{ApiError, ErrorResponse};

/// `POST /bookings` — Request a booking.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid range, lock contention, overlap or
/// storage failure.
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    summary = "Create a booking",
    description = "Reserves `[start_time, end_time)` on a resource in `pending` state. Overlapping active bookings on the same resource are rejected; adjacent ranges are allowed.",
    request_body = CreateBookingRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Booking created", body = CreateBookingResponse),
        (status = 400, description = "Invalid time range", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "Overlaps an existing booking", body = ErrorResponse),
        (status = 429, description = "Resource is being booked, retry later", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    body: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let resource_id = ResourceId::new(req.resource_id);

    tracing::debug!(principal = principal.id, %resource_id, "booking requested");
    let booking_id = state
        .booking_service
        .create_booking(resource_id, &req.start_time, &req.end_time)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse::created(booking_id.get())),
    ))
}

/// `GET /bookings` — List all bookings, newest first.
///
/// # Errors
///
/// Returns [`ApiError::StorageError`] on database failure.
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    summary = "List bookings",
    description = "Returns every booking, including cancelled ones, ordered by creation time descending.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Bookings", body = Vec<BookingDto>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = state.booking_service.list_bookings().await?;
    let data: Vec<BookingDto> = bookings.iter().map(BookingDto::from).collect();
    Ok(Json(data))
}

/// `GET /bookings/{id}` — Fetch one booking.
///
/// # Errors
///
/// Returns [`ApiError::BookingNotFound`] if the booking does not exist.
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "Bookings",
    summary = "Get a booking",
    params(
        ("id" = i64, Path, description = "Booking id"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Booking", body = BookingDto),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    _auth: Authenticated,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = booking_id(id)?;
    let booking = state.booking_service.get_booking(id).await?;
    Ok(Json(BookingDto::from(&booking)))
}

/// `POST /bookings/{id}/approve` — Approve a pending booking.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] for non-admins, [`ApiError::BookingNotFound`]
/// or [`ApiError::InvalidTransition`].
#[utoipa::path(
    post,
    path = "/bookings/{id}/approve",
    tag = "Bookings",
    summary = "Approve a booking",
    description = "Moves a booking from `pending` to `approved`. Requires the admin role.",
    params(
        ("id" = i64, Path, description = "Booking id"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Booking approved", body = StatusChangeResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking is not pending", body = ErrorResponse),
    )
)]
pub async fn approve_booking(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&principal)?;
    let id = booking_id(id)?;
    let booking = state.booking_service.approve_booking(id).await?;
    Ok(Json(StatusChangeResponse::for_booking(&booking)))
}

/// `POST /bookings/{id}/cancel` — Cancel a pending booking.
///
/// # Errors
///
/// Returns [`ApiError::BookingNotFound`] or [`ApiError::InvalidTransition`].
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "Bookings",
    summary = "Cancel a booking",
    description = "Moves a booking from `pending` to `cancelled`, freeing its time range.",
    params(
        ("id" = i64, Path, description = "Booking id"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Booking cancelled", body = StatusChangeResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking is not pending", body = ErrorResponse),
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    _auth: Authenticated,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = booking_id(id)?;
    let booking = state.booking_service.cancel_booking(id).await?;
    Ok(Json(StatusChangeResponse::for_booking(&booking)))
}

fn booking_id(path: Result<Path<i64>, PathRejection>) -> Result<BookingId, ApiError> {
    let Path(id) = path.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    Ok(BookingId::new(id))
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/approve", post(approve_booking))
        .route("/bookings/{id}/cancel", post(cancel_booking))
}
