//! Database repository for accommodations.

use crate::api::models::accommodations::AccommodationSort;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::accommodations::{AccommodationCreateDBRequest, AccommodationDBResponse, AccommodationUpdateDBRequest},
};
use crate::types::{AccommodationId, UserId, abbrev_uuid};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing accommodations
#[derive(Debug, Clone, Default)]
pub struct AccommodationFilter {
    pub skip: i64,
    pub limit: i64,
    /// Case-insensitive substring match on name or location
    pub search: Option<String>,
    pub sort: Option<AccommodationSort>,
}

impl AccommodationFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            search: None,
            sort: None,
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    pub fn with_sort(mut self, sort: Option<AccommodationSort>) -> Self {
        self.sort = sort;
        self
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Accommodation {
    pub id: AccommodationId,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub price_per_night: Decimal,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Accommodation> for AccommodationDBResponse {
    fn from(acc: Accommodation) -> Self {
        Self {
            id: acc.id,
            name: acc.name,
            location: acc.location,
            description: acc.description,
            price_per_night: acc.price_per_night,
            owner_id: acc.owner_id,
            created_at: acc.created_at,
            updated_at: acc.updated_at,
        }
    }
}

pub struct Accommodations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Accommodations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_owner(&mut self, owner_id: UserId) -> Result<Vec<AccommodationDBResponse>> {
        let rows = sqlx::query_as::<_, Accommodation>("SELECT * FROM accommodations WHERE owner_id = $1 ORDER BY name")
            .bind(owner_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rows.into_iter().map(AccommodationDBResponse::from).collect())
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Accommodations<'c> {
    type CreateRequest = AccommodationCreateDBRequest;
    type UpdateRequest = AccommodationUpdateDBRequest;
    type Response = AccommodationDBResponse;
    type Id = AccommodationId;
    type Filter = AccommodationFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let accommodation = sqlx::query_as::<_, Accommodation>(
            r#"
            INSERT INTO accommodations (id, name, location, description, price_per_night, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.location)
        .bind(&request.description)
        .bind(request.price_per_night)
        .bind(request.owner_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(accommodation.into())
    }

    #[instrument(skip(self), fields(accommodation_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let accommodation = sqlx::query_as::<_, Accommodation>("SELECT * FROM accommodations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(accommodation.map(AccommodationDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        // The order-by fragment is selected from a fixed set, never taken
        // from user input.
        let order_by = match filter.sort {
            Some(AccommodationSort::PriceAsc) => "price_per_night ASC, name ASC",
            Some(AccommodationSort::PriceDesc) => "price_per_night DESC, name ASC",
            Some(AccommodationSort::NameAsc) => "name ASC",
            Some(AccommodationSort::NameDesc) => "name DESC",
            None => "created_at DESC",
        };

        let sql = format!(
            r#"
            SELECT * FROM accommodations
            WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%' OR location ILIKE '%' || $1 || '%')
            ORDER BY {order_by}
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, Accommodation>(&sql)
            .bind(filter.search.as_deref())
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rows.into_iter().map(AccommodationDBResponse::from).collect())
    }

    #[instrument(skip(self), fields(accommodation_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        // Room types go with the accommodation (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM accommodations WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(accommodation_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Owner is deliberately not updatable: ownership never transfers
        let accommodation = sqlx::query_as::<_, Accommodation>(
            r#"
            UPDATE accommodations SET
                name = COALESCE($2, name),
                location = COALESCE($3, location),
                description = CASE
                    WHEN $4::TEXT IS NOT NULL THEN $4
                    ELSE description
                END,
                price_per_night = COALESCE($5, price_per_night),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.location)
        .bind(&request.description)
        .bind(request.price_per_night)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(accommodation.into())
    }
}
