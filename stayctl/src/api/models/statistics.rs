//! API response models for booking statistics.

use crate::db::models::bookings::{AccommodationTotalsDBResponse, StatusDistributionDBResponse};
use crate::types::AccommodationId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Booking counts by lifecycle status. Absent statuses are reported as zero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusDistributionResponse {
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
}

impl From<StatusDistributionDBResponse> for StatusDistributionResponse {
    fn from(db: StatusDistributionDBResponse) -> Self {
        Self {
            pending: db.pending,
            confirmed: db.confirmed,
            cancelled: db.cancelled,
        }
    }
}

/// Per-accommodation booking count and non-cancelled revenue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccommodationTotalsResponse {
    #[schema(value_type = String, format = "uuid")]
    pub accommodation_id: AccommodationId,
    pub accommodation_name: String,
    pub booking_count: i64,
    /// Sum of total_price over non-cancelled bookings
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

impl From<AccommodationTotalsDBResponse> for AccommodationTotalsResponse {
    fn from(db: AccommodationTotalsDBResponse) -> Self {
        Self {
            accommodation_id: db.accommodation_id,
            accommodation_name: db.accommodation_name,
            booking_count: db.booking_count,
            revenue: db.revenue,
        }
    }
}

/// Combined statistics payload for the admin and owner dashboards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingStatisticsResponse {
    pub status_distribution: StatusDistributionResponse,
    pub accommodations: Vec<AccommodationTotalsResponse>,
}
