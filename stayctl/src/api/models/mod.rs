//! Request/response data structures for API communication.

pub mod accommodations;
pub mod bookings;
pub mod pagination;
pub mod room_types;
pub mod statistics;
pub mod users;
