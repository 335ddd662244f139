//! Domain layer: booking identity, time ranges, status lifecycle and
//! the authenticated principal.
//!
//! Everything in here is storage-agnostic. The persistence and lock
//! layers depend on these types, never the other way round.

pub mod booking;
pub mod ids;
pub mod principal;
pub mod time_range;

pub use booking::{Booking, BookingStatus};
pub use ids::{BookingId, ResourceId};
pub use principal::{Principal, Role};
pub use time_range::{TimeRange, TimeRangeError};
