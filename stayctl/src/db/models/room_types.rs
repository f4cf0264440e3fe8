//! Database models for room types.

use crate::types::{AccommodationId, RoomTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Database request for creating a new room type
#[derive(Debug, Clone)]
pub struct RoomTypeCreateDBRequest {
    pub accommodation_id: AccommodationId,
    pub name: String,
    pub description: Option<String>,
    pub price_per_night: Decimal,
    pub total_rooms: i32,
}

/// Database request for updating a room type
#[derive(Debug, Clone)]
pub struct RoomTypeUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<Decimal>,
    pub total_rooms: Option<i32>,
}

/// Database response for a room type
#[derive(Debug, Clone)]
pub struct RoomTypeDBResponse {
    pub id: RoomTypeId,
    pub accommodation_id: AccommodationId,
    pub name: String,
    pub description: Option<String>,
    pub price_per_night: Decimal,
    pub total_rooms: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
