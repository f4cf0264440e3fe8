//! Database repository for room types.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::room_types::{RoomTypeCreateDBRequest, RoomTypeDBResponse, RoomTypeUpdateDBRequest},
};
use crate::types::{AccommodationId, RoomTypeId, abbrev_uuid};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing room types
#[derive(Debug, Clone)]
pub struct RoomTypeFilter {
    pub accommodation_id: AccommodationId,
}

impl RoomTypeFilter {
    pub fn new(accommodation_id: AccommodationId) -> Self {
        Self { accommodation_id }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct RoomType {
    pub id: RoomTypeId,
    pub accommodation_id: AccommodationId,
    pub name: String,
    pub description: Option<String>,
    pub price_per_night: Decimal,
    pub total_rooms: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoomType> for RoomTypeDBResponse {
    fn from(rt: RoomType) -> Self {
        Self {
            id: rt.id,
            accommodation_id: rt.accommodation_id,
            name: rt.name,
            description: rt.description,
            price_per_night: rt.price_per_night,
            total_rooms: rt.total_rooms,
            created_at: rt.created_at,
            updated_at: rt.updated_at,
        }
    }
}

pub struct RoomTypes<'c> {
    db: &'c mut PgConnection,
}

impl<'c> RoomTypes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for RoomTypes<'c> {
    type CreateRequest = RoomTypeCreateDBRequest;
    type UpdateRequest = RoomTypeUpdateDBRequest;
    type Response = RoomTypeDBResponse;
    type Id = RoomTypeId;
    type Filter = RoomTypeFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let room_type = sqlx::query_as::<_, RoomType>(
            r#"
            INSERT INTO room_types (id, accommodation_id, name, description, price_per_night, total_rooms)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.accommodation_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price_per_night)
        .bind(request.total_rooms)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(room_type.into())
    }

    #[instrument(skip(self), fields(room_type_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let room_type = sqlx::query_as::<_, RoomType>("SELECT * FROM room_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(room_type.map(RoomTypeDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(accommodation_id = %abbrev_uuid(&filter.accommodation_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let rows = sqlx::query_as::<_, RoomType>("SELECT * FROM room_types WHERE accommodation_id = $1 ORDER BY name")
            .bind(filter.accommodation_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rows.into_iter().map(RoomTypeDBResponse::from).collect())
    }

    #[instrument(skip(self), fields(room_type_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM room_types WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(room_type_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let room_type = sqlx::query_as::<_, RoomType>(
            r#"
            UPDATE room_types SET
                name = COALESCE($2, name),
                description = CASE
                    WHEN $3::TEXT IS NOT NULL THEN $3
                    ELSE description
                END,
                price_per_night = COALESCE($4, price_per_night),
                total_rooms = COALESCE($5, total_rooms),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price_per_night)
        .bind(request.total_rooms)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(room_type.into())
    }
}
