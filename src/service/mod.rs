//! Service layer: booking admission, status transitions and the facade
//! handlers talk to.

pub mod admission;
pub mod booking_service;
pub mod status_machine;

pub use admission::{AdmissionError, AdmissionProtocol};
pub use booking_service::BookingService;
pub use status_machine::{StatusMachine, TransitionError};
