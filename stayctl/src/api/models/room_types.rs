//! API request/response models for room types.

use crate::db::models::room_types::RoomTypeDBResponse;
use crate::types::{AccommodationId, RoomTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomTypeCreate {
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "1000.00")]
    pub price_per_night: Decimal,
    /// Hard capacity ceiling for every date.
    #[schema(minimum = 0)]
    pub total_rooms: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomTypeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price_per_night: Option<Decimal>,
    #[schema(minimum = 0)]
    pub total_rooms: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomTypeResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: RoomTypeId,
    #[schema(value_type = String, format = "uuid")]
    pub accommodation_id: AccommodationId,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price_per_night: Decimal,
    pub total_rooms: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoomTypeDBResponse> for RoomTypeResponse {
    fn from(db: RoomTypeDBResponse) -> Self {
        Self {
            id: db.id,
            accommodation_id: db.accommodation_id,
            name: db.name,
            description: db.description,
            price_per_night: db.price_per_night,
            total_rooms: db.total_rooms,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
