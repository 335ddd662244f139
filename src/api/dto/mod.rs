//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names follow the snake_case JSON used by the web frontend
//! (`resource_id`, `start_time`, `booking_id`).

pub mod booking_dto;

pub use booking_dto::*;
