//! Common type definitions and permission system types.
//!
//! This module defines:
//! - Type aliases for entity IDs (UserId, AccommodationId, etc.)
//! - Resource and operation enums for access control
//! - [`abbrev_uuid`] for readable log fields
//!
//! # Permission System
//!
//! Authorization is expressed as a (resource, operation) pair:
//!
//! - [`Resource`]: what entity type is being accessed
//! - [`Operation`]: what action is being performed
//!
//! Operations come in two flavors:
//! - **All**: unrestricted access to all entities (e.g., `ReadAll`)
//! - **Own**: restricted to the actor's own entities (e.g., `UpdateOwn`);
//!   "own" means the actor's bookings for regular users and the actor's
//!   accommodations (transitively, their room types and bookings) for owners.
//!
//! Whether a role carries a given permission is decided in one place,
//! [`crate::auth::permissions::role_allows`]. Instance-level ownership is a
//! separate check against the currently persisted owner row.

use std::fmt;
use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type AccommodationId = Uuid;
pub type RoomTypeId = Uuid;
pub type BookingId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

// Operations that can be performed on resources.
// *-All means unrestricted access, *-Own means restricted to own resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateAll,
    CreateOwn,
    ReadAll,
    ReadOwn,
    UpdateAll,
    UpdateOwn,
    DeleteAll,
    DeleteOwn,
}

// Resources that can be operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Accommodations,
    RoomTypes,
    Bookings,
    Statistics,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateAll | Operation::CreateOwn => write!(f, "create"),
            Operation::ReadAll | Operation::ReadOwn => write!(f, "read"),
            Operation::UpdateAll | Operation::UpdateOwn => write!(f, "update"),
            Operation::DeleteAll | Operation::DeleteOwn => write!(f, "delete"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Users => write!(f, "users"),
            Resource::Accommodations => write!(f, "accommodations"),
            Resource::RoomTypes => write!(f, "room types"),
            Resource::Bookings => write!(f, "bookings"),
            Resource::Statistics => write!(f, "statistics"),
        }
    }
}
