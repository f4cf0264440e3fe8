//! Database repository for bookings: the reservation engine.
//!
//! This module owns the only correctness-critical write path in the system,
//! [`Bookings::create`]. The capacity invariant it maintains: for any room
//! type and any date, the sum of `booked_quantity` over non-cancelled
//! bookings covering that date never exceeds the room type's `total_rooms`.
//!
//! The read-then-decide-then-write sequence is serialized per room type by
//! taking `SELECT ... FOR UPDATE` on the `room_types` row before reading the
//! overlap sum, and holding the lock until the insert commits. Two different
//! room types can always be booked concurrently; two requests for the same
//! room type serialize on this lock regardless of their dates, so the ledger
//! read stays consistent with the subsequent write.
//!
//! Status transitions (confirm/cancel) are one-way and validated by a status
//! precondition; they only need row-level isolation on the single booking
//! row, taken with `FOR UPDATE OF b` on the lookup.

use crate::api::models::bookings::BookingStatus;
use crate::db::{
    errors::{DbError, Result as DbResult},
    models::bookings::{
        AccommodationTotalsDBResponse, BookingCreateDBRequest, BookingDBResponse, BookingDetailDBResponse,
        StatusDistributionDBResponse, remaining_capacity, total_price, validate_stay,
    },
};
use crate::errors::{Error, Result};
use crate::types::{BookingId, Operation, Resource, RoomTypeId, abbrev_uuid};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Connection, FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Sum of booked quantities over non-cancelled bookings overlapping
/// [$2, $3) for room type $1. Touching intervals do not overlap: a booking
/// checking out on the day another checks in shares no night with it.
const OVERLAP_SUM_SQL: &str = r#"
    SELECT COALESCE(SUM(booked_quantity), 0)::BIGINT
    FROM bookings
    WHERE room_type_id = $1
      AND check_in < $3
      AND check_out > $2
      AND status <> 'CANCELLED'
"#;

/// Booking list projection resolving the whole user/room-type/accommodation/
/// owner chain in one statement, so downstream consumers never walk the
/// graph themselves.
const DETAIL_SELECT_SQL: &str = r#"
    SELECT
        b.id,
        b.check_in,
        b.check_out,
        b.booked_quantity,
        b.total_price,
        b.status,
        b.created_at,
        u.username,
        rt.id AS room_type_id,
        rt.name AS room_type_name,
        a.id AS accommodation_id,
        a.name AS accommodation_name,
        o.username AS owner_username
    FROM bookings b
    JOIN users u ON u.id = b.user_id
    JOIN room_types rt ON rt.id = b.room_type_id
    JOIN accommodations a ON a.id = rt.accommodation_id
    JOIN users o ON o.id = a.owner_id
"#;

// Inventory snapshot of a room type, fetched under lock
#[derive(Debug, FromRow)]
struct RoomTypeInventory {
    pub price_per_night: Decimal,
    pub total_rooms: i32,
}

// What a state transition needs to know about a booking: current status,
// check-in boundary, and who booked it / who owns the accommodation.
#[derive(Debug, FromRow)]
struct BookingTransitionRow {
    pub status: BookingStatus,
    pub check_in: NaiveDate,
    pub username: String,
    pub owner_username: String,
}

async fn transition_row(conn: &mut PgConnection, id: BookingId) -> DbResult<Option<BookingTransitionRow>> {
    let row = sqlx::query_as::<_, BookingTransitionRow>(
        r#"
        SELECT b.status, b.check_in, u.username, o.username AS owner_username
        FROM bookings b
        JOIN users u ON u.id = b.user_id
        JOIN room_types rt ON rt.id = b.room_type_id
        JOIN accommodations a ON a.id = rt.accommodation_id
        JOIN users o ON o.id = a.owner_id
        WHERE b.id = $1
        FOR UPDATE OF b
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

async fn set_status(conn: &mut PgConnection, id: BookingId, status: BookingStatus) -> DbResult<BookingDBResponse> {
    let booking = sqlx::query_as::<_, BookingDBResponse>("UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(status)
        .fetch_one(&mut *conn)
        .await?;

    Ok(booking)
}

fn booking_not_found(id: BookingId) -> Error {
    Error::NotFound {
        resource: "booking".to_string(),
        id: id.to_string(),
    }
}

pub struct Bookings<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Bookings<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Inventory ledger: booked quantity overlapping [check_in, check_out).
    ///
    /// Returns 0 when no bookings exist. Callers that decide a write based on
    /// this value must hold the room-type lock; [`Bookings::create`] does.
    #[instrument(skip(self), fields(room_type_id = %abbrev_uuid(&room_type_id)), err)]
    pub async fn sum_booked_quantity_between(
        &mut self,
        room_type_id: RoomTypeId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DbResult<i64> {
        let sum = sqlx::query_scalar::<_, i64>(OVERLAP_SUM_SQL)
            .bind(room_type_id)
            .bind(check_in)
            .bind(check_out)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(sum)
    }

    /// Create a booking in PENDING state.
    ///
    /// Validates the stay, locks the room type row, reads the overlap sum on
    /// the same transaction, rejects when capacity would be exceeded
    /// (reporting the remaining count), prices the stay and inserts. Exactly
    /// one row is inserted; nothing else is mutated.
    #[instrument(
        skip(self, request),
        fields(room_type_id = %abbrev_uuid(&request.room_type_id), quantity = request.quantity),
        err
    )]
    pub async fn create(&mut self, request: &BookingCreateDBRequest) -> Result<BookingDBResponse> {
        let nights = validate_stay(request.check_in, request.check_out, request.quantity)?;

        let mut tx = self.db.begin().await.map_err(DbError::from)?;

        // Per-room-type serialization point: concurrent requests for this
        // room type queue here until the insert below commits.
        let room_type = sqlx::query_as::<_, RoomTypeInventory>(
            "SELECT price_per_night, total_rooms FROM room_types WHERE id = $1 FOR UPDATE",
        )
        .bind(request.room_type_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)?
        .ok_or_else(|| Error::NotFound {
            resource: "room type".to_string(),
            id: request.room_type_id.to_string(),
        })?;

        let already_booked = sqlx::query_scalar::<_, i64>(OVERLAP_SUM_SQL)
            .bind(request.room_type_id)
            .bind(request.check_in)
            .bind(request.check_out)
            .fetch_one(&mut *tx)
            .await
            .map_err(DbError::from)?;

        if already_booked + i64::from(request.quantity) > i64::from(room_type.total_rooms) {
            return Err(Error::InsufficientInventory {
                remaining: remaining_capacity(room_type.total_rooms, already_booked),
            });
        }

        let total = total_price(room_type.price_per_night, nights, request.quantity);

        let booking = sqlx::query_as::<_, BookingDBResponse>(
            r#"
            INSERT INTO bookings
                (id, room_type_id, user_id, check_in, check_out, booked_quantity, total_price, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'PENDING')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.room_type_id)
        .bind(request.user_id)
        .bind(request.check_in)
        .bind(request.check_out)
        .bind(request.quantity)
        .bind(total)
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        Ok(booking)
    }

    /// Self-service cancellation: only the booking's user, only before the
    /// check-in date. Cancelling frees the quantity for future ledger reads.
    #[instrument(skip(self), fields(booking_id = %abbrev_uuid(&id), actor = actor_username), err)]
    pub async fn cancel_own(&mut self, id: BookingId, actor_username: &str, today: NaiveDate) -> Result<BookingDBResponse> {
        let mut tx = self.db.begin().await.map_err(DbError::from)?;

        let row = transition_row(&mut tx, id).await?.ok_or_else(|| booking_not_found(id))?;

        if row.username != actor_username {
            return Err(Error::Forbidden {
                action: Operation::UpdateOwn,
                resource: Resource::Bookings,
            });
        }
        row.status.ensure_cancellable()?;
        if today >= row.check_in {
            return Err(Error::TooLateToCancel);
        }

        let booking = set_status(&mut tx, id, BookingStatus::Cancelled).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(booking)
    }

    /// Owner cancellation: gated on the accommodation's current owner, with
    /// no date restriction (administrative cancellation of running stays is
    /// allowed).
    #[instrument(skip(self), fields(booking_id = %abbrev_uuid(&id), actor = owner_username), err)]
    pub async fn cancel_as_owner(&mut self, id: BookingId, owner_username: &str) -> Result<BookingDBResponse> {
        let mut tx = self.db.begin().await.map_err(DbError::from)?;

        let row = transition_row(&mut tx, id).await?.ok_or_else(|| booking_not_found(id))?;

        if row.owner_username != owner_username {
            return Err(Error::Forbidden {
                action: Operation::UpdateOwn,
                resource: Resource::Bookings,
            });
        }
        row.status.ensure_cancellable()?;

        let booking = set_status(&mut tx, id, BookingStatus::Cancelled).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(booking)
    }

    /// Admin cancellation: no ownership check, no date restriction.
    #[instrument(skip(self), fields(booking_id = %abbrev_uuid(&id)), err)]
    pub async fn cancel_as_admin(&mut self, id: BookingId) -> Result<BookingDBResponse> {
        let mut tx = self.db.begin().await.map_err(DbError::from)?;

        let row = transition_row(&mut tx, id).await?.ok_or_else(|| booking_not_found(id))?;
        row.status.ensure_cancellable()?;

        let booking = set_status(&mut tx, id, BookingStatus::Cancelled).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(booking)
    }

    /// Owner confirmation of a pending booking.
    #[instrument(skip(self), fields(booking_id = %abbrev_uuid(&id), actor = owner_username), err)]
    pub async fn confirm_as_owner(&mut self, id: BookingId, owner_username: &str) -> Result<BookingDBResponse> {
        let mut tx = self.db.begin().await.map_err(DbError::from)?;

        let row = transition_row(&mut tx, id).await?.ok_or_else(|| booking_not_found(id))?;

        if row.owner_username != owner_username {
            return Err(Error::Forbidden {
                action: Operation::UpdateOwn,
                resource: Resource::Bookings,
            });
        }
        row.status.ensure_confirmable()?;

        let booking = set_status(&mut tx, id, BookingStatus::Confirmed).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(booking)
    }

    /// Admin confirmation: no ownership check.
    #[instrument(skip(self), fields(booking_id = %abbrev_uuid(&id)), err)]
    pub async fn confirm_as_admin(&mut self, id: BookingId) -> Result<BookingDBResponse> {
        let mut tx = self.db.begin().await.map_err(DbError::from)?;

        let row = transition_row(&mut tx, id).await?.ok_or_else(|| booking_not_found(id))?;
        row.status.ensure_confirmable()?;

        let booking = set_status(&mut tx, id, BookingStatus::Confirmed).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(booking)
    }

    /// A user's own bookings, newest first.
    #[instrument(skip(self), err)]
    pub async fn list_for_user(&mut self, username: &str, skip: i64, limit: i64) -> DbResult<Vec<BookingDetailDBResponse>> {
        let sql = format!("{DETAIL_SELECT_SQL} WHERE u.username = $1 ORDER BY b.created_at DESC LIMIT $2 OFFSET $3");
        let rows = sqlx::query_as::<_, BookingDetailDBResponse>(&sql)
            .bind(username)
            .bind(limit)
            .bind(skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rows)
    }

    /// Bookings against any accommodation the given owner owns, newest first.
    #[instrument(skip(self), err)]
    pub async fn list_for_owner(
        &mut self,
        owner_username: &str,
        skip: i64,
        limit: i64,
    ) -> DbResult<Vec<BookingDetailDBResponse>> {
        let sql = format!("{DETAIL_SELECT_SQL} WHERE o.username = $1 ORDER BY b.created_at DESC LIMIT $2 OFFSET $3");
        let rows = sqlx::query_as::<_, BookingDetailDBResponse>(&sql)
            .bind(owner_username)
            .bind(limit)
            .bind(skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rows)
    }

    /// All bookings, newest first. Admin view.
    #[instrument(skip(self), err)]
    pub async fn list_all(&mut self, skip: i64, limit: i64) -> DbResult<Vec<BookingDetailDBResponse>> {
        let sql = format!("{DETAIL_SELECT_SQL} ORDER BY b.created_at DESC LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, BookingDetailDBResponse>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rows)
    }

    /// Booking counts by status, optionally restricted to one owner's
    /// accommodations. Absent statuses count as zero.
    #[instrument(skip(self), err)]
    pub async fn status_distribution(&mut self, owner_username: Option<&str>) -> DbResult<StatusDistributionDBResponse> {
        let distribution = sqlx::query_as::<_, StatusDistributionDBResponse>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE b.status = 'PENDING') AS pending,
                COUNT(*) FILTER (WHERE b.status = 'CONFIRMED') AS confirmed,
                COUNT(*) FILTER (WHERE b.status = 'CANCELLED') AS cancelled
            FROM bookings b
            JOIN room_types rt ON rt.id = b.room_type_id
            JOIN accommodations a ON a.id = rt.accommodation_id
            JOIN users o ON o.id = a.owner_id
            WHERE $1::TEXT IS NULL OR o.username = $1
            "#,
        )
        .bind(owner_username)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(distribution)
    }

    /// Booking count and non-cancelled revenue per accommodation, optionally
    /// restricted to one owner.
    #[instrument(skip(self), err)]
    pub async fn accommodation_totals(
        &mut self,
        owner_username: Option<&str>,
    ) -> DbResult<Vec<AccommodationTotalsDBResponse>> {
        let totals = sqlx::query_as::<_, AccommodationTotalsDBResponse>(
            r#"
            SELECT
                a.id AS accommodation_id,
                a.name AS accommodation_name,
                COUNT(b.id) AS booking_count,
                COALESCE(SUM(b.total_price) FILTER (WHERE b.status <> 'CANCELLED'), 0) AS revenue
            FROM accommodations a
            JOIN users o ON o.id = a.owner_id
            LEFT JOIN room_types rt ON rt.accommodation_id = a.id
            LEFT JOIN bookings b ON b.room_type_id = rt.id
            WHERE $1::TEXT IS NULL OR o.username = $1
            GROUP BY a.id, a.name
            ORDER BY a.name
            "#,
        )
        .bind(owner_username)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::test_utils::{create_test_accommodation, create_test_room_type, create_test_user};
    use chrono::{Days, Utc};
    use sqlx::PgPool;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(room_type_id: RoomTypeId, user_id: Uuid, check_in: NaiveDate, check_out: NaiveDate, quantity: i32) -> BookingCreateDBRequest {
        BookingCreateDBRequest {
            room_type_id,
            user_id,
            check_in,
            check_out,
            quantity,
        }
    }

    /// Books on a fresh connection; used to exercise two concurrent engines.
    async fn try_create(pool: &PgPool, req: BookingCreateDBRequest) -> Result<BookingDBResponse> {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);
        repo.create(&req).await
    }

    /// Room type with 5 rooms at 1000.00/night, plus a guest user.
    async fn setup(pool: &PgPool) -> (RoomTypeId, Uuid) {
        let owner = create_test_user(pool, Role::Owner).await;
        let guest = create_test_user(pool, Role::User).await;
        let accommodation = create_test_accommodation(pool, owner.id).await;
        let room_type = create_test_room_type(pool, accommodation.id, 5, Decimal::new(100_000, 2)).await;
        (room_type.id, guest.id)
    }

    #[sqlx::test]
    #[test_log::test]
    async fn create_prices_and_starts_pending(pool: PgPool) {
        let (room_type_id, guest_id) = setup(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        let booking = repo
            .create(&request(room_type_id, guest_id, date(2025, 6, 1), date(2025, 6, 4), 3))
            .await
            .unwrap();

        // 1000.00 x 3 nights x 3 rooms
        assert_eq!(booking.total_price, Decimal::new(900_000, 2));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.booked_quantity, 3);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn overbooking_reports_remaining_and_retry_fits(pool: PgPool) {
        let (room_type_id, guest_id) = setup(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        // A: 3 of 5 rooms for [06-01, 06-04), 1000.00 x 3 nights x 3
        let a = repo
            .create(&request(room_type_id, guest_id, date(2025, 6, 1), date(2025, 6, 4), 3))
            .await
            .unwrap();
        assert_eq!(a.total_price, Decimal::new(900_000, 2));

        // B overlaps [06-02, 06-05) and wants 3 more: only 2 remain
        let err = repo
            .create(&request(room_type_id, guest_id, date(2025, 6, 2), date(2025, 6, 5), 3))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientInventory { remaining: 2 }));

        // B retried with quantity 2 succeeds, 1000.00 x 3 nights x 2
        let b = repo
            .create(&request(room_type_id, guest_id, date(2025, 6, 2), date(2025, 6, 5), 2))
            .await
            .unwrap();
        assert_eq!(b.total_price, Decimal::new(600_000, 2));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn checkout_day_turnover_is_not_an_overlap(pool: PgPool) {
        let (room_type_id, guest_id) = setup(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        // Fill the house for [06-01, 06-04)
        repo.create(&request(room_type_id, guest_id, date(2025, 6, 1), date(2025, 6, 4), 5))
            .await
            .unwrap();

        // Same-day turnover: checking in on the other's check-out day works
        repo.create(&request(room_type_id, guest_id, date(2025, 6, 4), date(2025, 6, 7), 5))
            .await
            .unwrap();

        // But any shared night does not
        let err = repo
            .create(&request(room_type_id, guest_id, date(2025, 6, 3), date(2025, 6, 5), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientInventory { remaining: 0 }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn ledger_sums_only_overlapping_bookings(pool: PgPool) {
        let (room_type_id, guest_id) = setup(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        repo.create(&request(room_type_id, guest_id, date(2025, 6, 1), date(2025, 6, 3), 2))
            .await
            .unwrap();
        repo.create(&request(room_type_id, guest_id, date(2025, 6, 5), date(2025, 6, 7), 1))
            .await
            .unwrap();

        // [06-02, 06-06) overlaps both
        let sum = repo
            .sum_booked_quantity_between(room_type_id, date(2025, 6, 2), date(2025, 6, 6))
            .await
            .unwrap();
        assert_eq!(sum, 3);

        // [06-03, 06-05) touches both at the boundary, overlaps neither
        let sum = repo
            .sum_booked_quantity_between(room_type_id, date(2025, 6, 3), date(2025, 6, 5))
            .await
            .unwrap();
        assert_eq!(sum, 0);

        // Empty ledger reads as zero, not absence
        let sum = repo
            .sum_booked_quantity_between(room_type_id, date(2026, 1, 1), date(2026, 1, 2))
            .await
            .unwrap();
        assert_eq!(sum, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn cancellation_frees_capacity(pool: PgPool) {
        let (room_type_id, guest_id) = setup(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        let a = repo
            .create(&request(room_type_id, guest_id, date(2025, 6, 1), date(2025, 6, 4), 5))
            .await
            .unwrap();

        // Full house: nothing more fits
        let err = repo
            .create(&request(room_type_id, guest_id, date(2025, 6, 2), date(2025, 6, 3), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientInventory { remaining: 0 }));

        repo.cancel_as_admin(a.id).await.unwrap();

        // Cancelled quantity no longer counts against capacity
        repo.create(&request(room_type_id, guest_id, date(2025, 6, 2), date(2025, 6, 3), 5))
            .await
            .unwrap();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn concurrent_creates_never_oversell(pool: PgPool) {
        let (room_type_id, guest_id) = setup(&pool).await;

        let req_a = request(room_type_id, guest_id, date(2025, 6, 1), date(2025, 6, 4), 3);
        let req_b = request(room_type_id, guest_id, date(2025, 6, 1), date(2025, 6, 4), 3);

        let (a, b) = tokio::join!(try_create(&pool, req_a), try_create(&pool, req_b));

        // Exactly one of the two may win; 3 + 3 > 5
        let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1, "expected exactly one winner, got a={a:?} b={b:?}");

        let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(loser, Error::InsufficientInventory { remaining: 2 }));

        // The ledger agrees with the winner
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);
        let sum = repo
            .sum_booked_quantity_between(room_type_id, date(2025, 6, 1), date(2025, 6, 4))
            .await
            .unwrap();
        assert_eq!(sum, 3);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn create_validates_input_before_touching_inventory(pool: PgPool) {
        let (room_type_id, guest_id) = setup(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        let err = repo
            .create(&request(room_type_id, guest_id, date(2025, 6, 4), date(2025, 6, 1), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInterval { .. }));

        let err = repo
            .create(&request(room_type_id, guest_id, date(2025, 6, 1), date(2025, 6, 4), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { quantity: 0 }));

        let err = repo
            .create(&request(Uuid::new_v4(), guest_id, date(2025, 6, 1), date(2025, 6, 4), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn self_cancel_respects_owner_and_check_in_boundary(pool: PgPool) {
        let owner = create_test_user(&pool, Role::Owner).await;
        let guest = create_test_user(&pool, Role::User).await;
        let other = create_test_user(&pool, Role::User).await;
        let accommodation = create_test_accommodation(&pool, owner.id).await;
        let room_type = create_test_room_type(&pool, accommodation.id, 5, Decimal::new(100_000, 2)).await;

        let today = Utc::now().date_naive();
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        // Booking starting tomorrow: cancellable today, but not by someone else
        let upcoming = repo
            .create(&request(
                room_type.id,
                guest.id,
                today + Days::new(1),
                today + Days::new(3),
                1,
            ))
            .await
            .unwrap();

        let err = repo.cancel_own(upcoming.id, &other.username, today).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));

        let cancelled = repo.cancel_own(upcoming.id, &guest.username, today).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        // Cancelling again fails deterministically
        let err = repo.cancel_own(upcoming.id, &guest.username, today).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyCancelled));

        // Booking whose stay starts today can no longer be self-cancelled
        let started = repo
            .create(&request(room_type.id, guest.id, today, today + Days::new(2), 1))
            .await
            .unwrap();
        let err = repo.cancel_own(started.id, &guest.username, today).await.unwrap_err();
        assert!(matches!(err, Error::TooLateToCancel));

        // The owner path has no date restriction
        let cancelled = repo.cancel_as_owner(started.id, &owner.username).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn confirm_paths_enforce_ownership_and_state_machine(pool: PgPool) {
        let owner = create_test_user(&pool, Role::Owner).await;
        let stranger = create_test_user(&pool, Role::Owner).await;
        let guest = create_test_user(&pool, Role::User).await;
        let accommodation = create_test_accommodation(&pool, owner.id).await;
        let room_type = create_test_room_type(&pool, accommodation.id, 5, Decimal::new(100_000, 2)).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        let booking = repo
            .create(&request(room_type.id, guest.id, date(2025, 6, 1), date(2025, 6, 4), 1))
            .await
            .unwrap();

        // An owner of some other accommodation may not confirm it
        let err = repo.confirm_as_owner(booking.id, &stranger.username).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));

        let confirmed = repo.confirm_as_owner(booking.id, &owner.username).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        // Re-confirming fails, on both the owner and the admin path
        let err = repo.confirm_as_owner(booking.id, &owner.username).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyConfirmed));
        let err = repo.confirm_as_admin(booking.id).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyConfirmed));

        // CONFIRMED can still be cancelled (owner path), after which nothing
        // can bring it back
        let cancelled = repo.cancel_as_owner(booking.id, &owner.username).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        let err = repo.confirm_as_admin(booking.id).await.unwrap_err();
        assert!(matches!(err, Error::CancelledCannotConfirm));
        let err = repo.cancel_as_owner(booking.id, &owner.username).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyCancelled));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn transitions_on_missing_bookings_are_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        let missing = Uuid::new_v4();
        let today = Utc::now().date_naive();

        assert!(matches!(
            repo.cancel_own(missing, "nobody", today).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            repo.confirm_as_admin(missing).await.unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn views_resolve_the_full_chain_per_role(pool: PgPool) {
        let owner_a = create_test_user(&pool, Role::Owner).await;
        let owner_b = create_test_user(&pool, Role::Owner).await;
        let guest = create_test_user(&pool, Role::User).await;
        let acc_a = create_test_accommodation(&pool, owner_a.id).await;
        let acc_b = create_test_accommodation(&pool, owner_b.id).await;
        let rt_a = create_test_room_type(&pool, acc_a.id, 5, Decimal::new(100_000, 2)).await;
        let rt_b = create_test_room_type(&pool, acc_b.id, 5, Decimal::new(200_000, 2)).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        repo.create(&request(rt_a.id, guest.id, date(2025, 6, 1), date(2025, 6, 4), 1))
            .await
            .unwrap();
        repo.create(&request(rt_b.id, guest.id, date(2025, 7, 1), date(2025, 7, 2), 2))
            .await
            .unwrap();

        let mine = repo.list_for_user(&guest.username, 0, 50).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|b| b.username == guest.username));

        let owner_view = repo.list_for_owner(&owner_a.username, 0, 50).await.unwrap();
        assert_eq!(owner_view.len(), 1);
        assert_eq!(owner_view[0].accommodation_id, acc_a.id);
        assert_eq!(owner_view[0].owner_username, owner_a.username);
        assert_eq!(owner_view[0].room_type_name, rt_a.name);

        let all = repo.list_all(0, 50).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn statistics_aggregate_by_status_and_accommodation(pool: PgPool) {
        let owner = create_test_user(&pool, Role::Owner).await;
        let other = create_test_user(&pool, Role::Owner).await;
        let guest = create_test_user(&pool, Role::User).await;
        let accommodation = create_test_accommodation(&pool, owner.id).await;
        let room_type = create_test_room_type(&pool, accommodation.id, 10, Decimal::new(100_000, 2)).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Bookings::new(&mut conn);

        let a = repo
            .create(&request(room_type.id, guest.id, date(2025, 6, 1), date(2025, 6, 2), 1))
            .await
            .unwrap();
        let b = repo
            .create(&request(room_type.id, guest.id, date(2025, 6, 1), date(2025, 6, 2), 1))
            .await
            .unwrap();
        repo.create(&request(room_type.id, guest.id, date(2025, 6, 1), date(2025, 6, 2), 1))
            .await
            .unwrap();

        repo.confirm_as_admin(a.id).await.unwrap();
        repo.cancel_as_admin(b.id).await.unwrap();

        let distribution = repo.status_distribution(Some(&owner.username)).await.unwrap();
        assert_eq!(distribution.pending, 1);
        assert_eq!(distribution.confirmed, 1);
        assert_eq!(distribution.cancelled, 1);

        // Revenue excludes the cancelled booking: 2 x 1000.00
        let totals = repo.accommodation_totals(Some(&owner.username)).await.unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].booking_count, 3);
        assert_eq!(totals[0].revenue, Decimal::new(200_000, 2));

        // Another owner sees nothing
        let distribution = repo.status_distribution(Some(&other.username)).await.unwrap();
        assert_eq!(distribution.pending + distribution.confirmed + distribution.cancelled, 0);
    }
}
