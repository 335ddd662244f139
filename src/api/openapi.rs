//! OpenAPI document for the booking API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{BookingDto, CreateBookingRequest, CreateBookingResponse, StatusChangeResponse};
use super::handlers::{booking, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "resource-booking",
        description = "Resource booking API with double-booking prevention"
    ),
    paths(
        system::health_handler,
        booking::create_booking,
        booking::list_bookings,
        booking::get_booking,
        booking::approve_booking,
        booking::cancel_booking,
    ),
    components(schemas(
        CreateBookingRequest,
        CreateBookingResponse,
        BookingDto,
        StatusChangeResponse,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Bookings", description = "Booking admission and status changes"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
