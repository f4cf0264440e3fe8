//! Database record structures matching table schemas.

pub mod accommodations;
pub mod bookings;
pub mod room_types;
pub mod users;
