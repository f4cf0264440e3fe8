//! Database models for accommodations.

use crate::types::{AccommodationId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Database request for creating a new accommodation.
///
/// The owner is fixed at creation; ownership never transfers.
#[derive(Debug, Clone)]
pub struct AccommodationCreateDBRequest {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub price_per_night: Decimal,
    pub owner_id: UserId,
}

/// Database request for updating an accommodation. Owner is not updatable.
#[derive(Debug, Clone)]
pub struct AccommodationUpdateDBRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<Decimal>,
}

/// Database response for an accommodation
#[derive(Debug, Clone)]
pub struct AccommodationDBResponse {
    pub id: AccommodationId,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub price_per_night: Decimal,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
