//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection (usually a transaction), provides
//! strongly-typed operations for one entity, and returns domain models from
//! [`crate::db::models`]. CRUD-shaped repositories implement the
//! [`Repository`] trait; [`Bookings`] is the reservation engine and exposes
//! its own operation set instead.

pub mod accommodations;
pub mod bookings;
pub mod repository;
pub mod room_types;
pub mod users;

pub use accommodations::Accommodations;
pub use bookings::Bookings;
pub use repository::Repository;
pub use room_types::RoomTypes;
pub use users::Users;
