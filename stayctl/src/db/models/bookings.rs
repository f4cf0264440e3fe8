//! Database models for bookings, plus the pure pricing/validation functions
//! the reservation engine is built on.

use crate::api::models::bookings::BookingStatus;
use crate::errors::{Error, Result};
use crate::types::{AccommodationId, BookingId, RoomTypeId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Database request for creating a new booking.
///
/// The actor has already been resolved to a user id; price and status are
/// derived by the engine, never supplied by callers.
#[derive(Debug, Clone)]
pub struct BookingCreateDBRequest {
    pub room_type_id: RoomTypeId,
    pub user_id: UserId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub quantity: i32,
}

/// Database response for a booking
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingDBResponse {
    pub id: BookingId,
    pub room_type_id: RoomTypeId,
    pub user_id: UserId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub booked_quantity: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// A booking row with its user -> room type -> accommodation -> owner chain
/// resolved in the same query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingDetailDBResponse {
    pub id: BookingId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub booked_quantity: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub room_type_id: RoomTypeId,
    pub room_type_name: String,
    pub accommodation_id: AccommodationId,
    pub accommodation_name: String,
    pub owner_username: String,
}

/// Booking counts grouped by status.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusDistributionDBResponse {
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
}

/// Per-accommodation booking count and non-cancelled revenue.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccommodationTotalsDBResponse {
    pub accommodation_id: AccommodationId,
    pub accommodation_name: String,
    pub booking_count: i64,
    pub revenue: Decimal,
}

/// Number of nights between check-in and check-out (whole days).
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// Validate a requested stay, returning the number of nights.
///
/// A valid stay has check-out strictly after check-in (at least one night)
/// and a quantity of at least 1.
pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate, quantity: i32) -> Result<i64> {
    if check_out <= check_in {
        return Err(Error::InvalidInterval { check_in, check_out });
    }
    if quantity < 1 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(nights_between(check_in, check_out))
}

/// `nightly_price x nights x quantity`, exact decimal arithmetic.
pub fn total_price(nightly_price: Decimal, nights: i64, quantity: i32) -> Decimal {
    nightly_price * Decimal::from(nights) * Decimal::from(quantity)
}

/// Capacity left after subtracting what is already booked, floored at zero
/// for reporting.
pub fn remaining_capacity(total_rooms: i32, already_booked: i64) -> i64 {
    (i64::from(total_rooms) - already_booked).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn nights_span_whole_days() {
        assert_eq!(nights_between(date(2025, 6, 1), date(2025, 6, 4)), 3);
        assert_eq!(nights_between(date(2025, 6, 1), date(2025, 6, 2)), 1);
        // Across a month boundary
        assert_eq!(nights_between(date(2025, 6, 30), date(2025, 7, 2)), 2);
    }

    #[test]
    fn validate_stay_rejects_non_increasing_intervals() {
        assert!(matches!(
            validate_stay(date(2025, 6, 4), date(2025, 6, 1), 1),
            Err(Error::InvalidInterval { .. })
        ));
        // Same-day "stay" is zero nights
        assert!(matches!(
            validate_stay(date(2025, 6, 1), date(2025, 6, 1), 1),
            Err(Error::InvalidInterval { .. })
        ));
    }

    #[test]
    fn validate_stay_rejects_non_positive_quantity() {
        assert!(matches!(
            validate_stay(date(2025, 6, 1), date(2025, 6, 4), 0),
            Err(Error::InvalidQuantity { quantity: 0 })
        ));
        assert!(matches!(
            validate_stay(date(2025, 6, 1), date(2025, 6, 4), -3),
            Err(Error::InvalidQuantity { quantity: -3 })
        ));
    }

    #[test]
    fn validate_stay_returns_nights() {
        assert_eq!(validate_stay(date(2025, 6, 1), date(2025, 6, 4), 2).unwrap(), 3);
    }

    #[test]
    fn pricing_is_exact_decimal_arithmetic() {
        // 2000 x 3 nights x 2 rooms = 12000, exactly
        let nightly = Decimal::new(2000, 0);
        assert_eq!(total_price(nightly, 3, 2), Decimal::new(12000, 0));

        // 1000.00 x 3 x 3 = 3000.00 with cents preserved
        let nightly = Decimal::new(100_000, 2);
        assert_eq!(total_price(nightly, 3, 1), Decimal::new(300_000, 2));

        // A price that is not representable in binary floating point
        let nightly = Decimal::new(10_010, 2); // 100.10
        assert_eq!(total_price(nightly, 7, 3), Decimal::new(210_210, 2)); // 2102.10
    }

    #[test]
    fn remaining_capacity_floors_at_zero() {
        assert_eq!(remaining_capacity(5, 3), 2);
        assert_eq!(remaining_capacity(5, 5), 0);
        // Overbooked ledger (e.g. capacity lowered after bookings) reports 0,
        // never a negative count
        assert_eq!(remaining_capacity(5, 7), 0);
    }
}
