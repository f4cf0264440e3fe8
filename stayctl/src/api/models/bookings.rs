//! API request/response models for bookings, and the booking state machine.

use crate::db::models::bookings::{BookingDBResponse, BookingDetailDBResponse};
use crate::errors::{Error, Result};
use crate::types::{AccommodationId, BookingId, RoomTypeId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Booking lifecycle status.
///
/// ```text
///  (none) ──create──► PENDING ──confirm──► CONFIRMED
///                        │                     │
///                        └───────cancel────────┴──► CANCELLED (terminal)
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Precondition for any cancellation path. CANCELLED is terminal, so a
    /// repeated cancel fails deterministically instead of double-applying.
    pub fn ensure_cancellable(self) -> Result<()> {
        match self {
            BookingStatus::Cancelled => Err(Error::AlreadyCancelled),
            BookingStatus::Pending | BookingStatus::Confirmed => Ok(()),
        }
    }

    /// Precondition for confirmation. CONFIRMED cannot be re-confirmed and
    /// CANCELLED has no outgoing transitions.
    pub fn ensure_confirmable(self) -> Result<()> {
        match self {
            BookingStatus::Confirmed => Err(Error::AlreadyConfirmed),
            BookingStatus::Cancelled => Err(Error::CancelledCannotConfirm),
            BookingStatus::Pending => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingCreate {
    #[schema(value_type = String, format = "uuid")]
    pub room_type_id: RoomTypeId,
    /// Check-in date (YYYY-MM-DD)
    pub check_in: NaiveDate,
    /// Check-out date (YYYY-MM-DD), strictly after check-in
    pub check_out: NaiveDate,
    /// Number of rooms to book
    #[schema(minimum = 1)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: BookingId,
    #[schema(value_type = String, format = "uuid")]
    pub room_type_id: RoomTypeId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub booked_quantity: i32,
    #[schema(value_type = String, example = "6000.00")]
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<BookingDBResponse> for BookingResponse {
    fn from(db: BookingDBResponse) -> Self {
        Self {
            id: db.id,
            room_type_id: db.room_type_id,
            user_id: db.user_id,
            check_in: db.check_in,
            check_out: db.check_out,
            booked_quantity: db.booked_quantity,
            total_price: db.total_price,
            status: db.status,
            created_at: db.created_at,
        }
    }
}

/// A booking with its user/room-type/accommodation/owner chain resolved.
///
/// List views return this shape so consumers never walk the entity graph
/// themselves.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingDetailResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: BookingId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub booked_quantity: i32,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub username: String,
    #[schema(value_type = String, format = "uuid")]
    pub room_type_id: RoomTypeId,
    pub room_type_name: String,
    #[schema(value_type = String, format = "uuid")]
    pub accommodation_id: AccommodationId,
    pub accommodation_name: String,
    pub owner_username: String,
}

impl From<BookingDetailDBResponse> for BookingDetailResponse {
    fn from(db: BookingDetailDBResponse) -> Self {
        Self {
            id: db.id,
            check_in: db.check_in,
            check_out: db.check_out,
            booked_quantity: db.booked_quantity,
            total_price: db.total_price,
            status: db.status,
            created_at: db.created_at,
            username: db.username,
            room_type_id: db.room_type_id,
            room_type_name: db.room_type_name,
            accommodation_id: db.accommodation_id,
            accommodation_name: db.accommodation_name,
            owner_username: db.owner_username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_cancel_and_confirm() {
        assert!(BookingStatus::Pending.ensure_cancellable().is_ok());
        assert!(BookingStatus::Pending.ensure_confirmable().is_ok());
    }

    #[test]
    fn confirmed_can_cancel_but_not_reconfirm() {
        assert!(BookingStatus::Confirmed.ensure_cancellable().is_ok());
        assert!(matches!(
            BookingStatus::Confirmed.ensure_confirmable(),
            Err(Error::AlreadyConfirmed)
        ));
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(matches!(
            BookingStatus::Cancelled.ensure_cancellable(),
            Err(Error::AlreadyCancelled)
        ));
        assert!(matches!(
            BookingStatus::Cancelled.ensure_confirmable(),
            Err(Error::CancelledCannotConfirm)
        ));
    }
}
