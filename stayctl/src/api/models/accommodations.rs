//! API request/response models for accommodations.

use crate::db::models::accommodations::AccommodationDBResponse;
use crate::types::{AccommodationId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::pagination::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccommodationCreate {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    /// Informational nightly base price; bookings are priced per room type.
    #[schema(value_type = String, example = "2000.00")]
    pub price_per_night: Decimal,
    /// Admins must name the owner explicitly; non-admins may not set this.
    pub owner_username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccommodationUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price_per_night: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccommodationResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: AccommodationId,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price_per_night: Decimal,
    #[schema(value_type = String, format = "uuid")]
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccommodationDBResponse> for AccommodationResponse {
    fn from(db: AccommodationDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            location: db.location,
            description: db.description,
            price_per_night: db.price_per_night,
            owner_id: db.owner_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Sort orders accepted by the accommodation list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationSort {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

/// Query parameters for listing accommodations
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListAccommodationsQuery {
    /// Pagination parameters
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Filter by location or name (case-insensitive substring match)
    pub search: Option<String>,

    /// Sort order (price_asc, price_desc, name_asc, name_desc)
    pub sort: Option<AccommodationSort>,
}
