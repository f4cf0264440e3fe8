use crate::AppState;
use crate::api::models::statistics::{AccommodationTotalsResponse, BookingStatisticsResponse, StatusDistributionResponse};
use crate::auth::permissions::{RequiresPermission, operation, resource};
use crate::db::handlers::Bookings;
use crate::errors::{Error, Result};
use axum::{Json, extract::State};
use sqlx::PgConnection;

async fn collect_statistics(conn: &mut PgConnection, owner_username: Option<&str>) -> Result<BookingStatisticsResponse> {
    let mut repo = Bookings::new(conn);

    let distribution = repo.status_distribution(owner_username).await?;
    let totals = repo.accommodation_totals(owner_username).await?;

    Ok(BookingStatisticsResponse {
        status_distribution: StatusDistributionResponse::from(distribution),
        accommodations: totals.into_iter().map(AccommodationTotalsResponse::from).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/owner/statistics",
    tag = "statistics",
    summary = "Booking statistics for my accommodations",
    responses(
        (status = 200, description = "Status distribution and per-accommodation totals", body = BookingStatisticsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn owner_statistics(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::Statistics, operation::ReadOwn>,
) -> Result<Json<BookingStatisticsResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let statistics = collect_statistics(&mut conn, Some(&gate.user.username)).await?;

    Ok(Json(statistics))
}

#[utoipa::path(
    get,
    path = "/admin/statistics",
    tag = "statistics",
    summary = "Booking statistics across all accommodations",
    responses(
        (status = 200, description = "Status distribution and per-accommodation totals", body = BookingStatisticsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn admin_statistics(
    State(state): State<AppState>,
    _: RequiresPermission<resource::Statistics, operation::ReadAll>,
) -> Result<Json<BookingStatisticsResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let statistics = collect_statistics(&mut conn, None).await?;

    Ok(Json(statistics))
}
