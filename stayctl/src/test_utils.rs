//! Fixture constructors for integration tests.

use crate::api::models::users::Role;
use crate::db::handlers::{Accommodations, Repository, RoomTypes, Users};
use crate::db::models::{
    accommodations::{AccommodationCreateDBRequest, AccommodationDBResponse},
    room_types::{RoomTypeCreateDBRequest, RoomTypeDBResponse},
    users::{UserCreateDBRequest, UserDBResponse},
};
use crate::types::{AccommodationId, UserId};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_test_user(pool: &PgPool, role: Role) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("acquire connection");
    let mut repo = Users::new(&mut conn);

    repo.create(&UserCreateDBRequest {
        username: format!("user-{}", Uuid::new_v4()),
        display_name: None,
        role,
    })
    .await
    .expect("create test user")
}

pub async fn create_test_accommodation(pool: &PgPool, owner_id: UserId) -> AccommodationDBResponse {
    let mut conn = pool.acquire().await.expect("acquire connection");
    let mut repo = Accommodations::new(&mut conn);

    repo.create(&AccommodationCreateDBRequest {
        name: format!("accommodation-{}", Uuid::new_v4()),
        location: "Test Town".to_string(),
        description: None,
        price_per_night: Decimal::new(200_000, 2),
        owner_id,
    })
    .await
    .expect("create test accommodation")
}

pub async fn create_test_room_type(
    pool: &PgPool,
    accommodation_id: AccommodationId,
    total_rooms: i32,
    price_per_night: Decimal,
) -> RoomTypeDBResponse {
    let mut conn = pool.acquire().await.expect("acquire connection");
    let mut repo = RoomTypes::new(&mut conn);

    repo.create(&RoomTypeCreateDBRequest {
        accommodation_id,
        name: format!("room-type-{}", Uuid::new_v4()),
        description: None,
        price_per_night,
        total_rooms,
    })
    .await
    .expect("create test room type")
}
