use crate::AppState;
use crate::api::models::{
    bookings::{BookingCreate, BookingDetailResponse, BookingResponse},
    pagination::Pagination,
    users::CurrentUser,
};
use crate::auth::permissions::{RequiresPermission, operation, resource};
use crate::db::handlers::Bookings;
use crate::db::models::bookings::BookingCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::BookingId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    summary = "Create booking",
    request_body = BookingCreate,
    responses(
        (status = 201, description = "Booking created in PENDING state", body = BookingResponse),
        (status = 400, description = "Invalid dates/quantity, or insufficient inventory"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Room type not found")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_booking(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::Bookings, operation::CreateOwn>,
    Json(payload): Json<BookingCreate>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Bookings::new(&mut conn);

    // The engine validates, locks the room type, checks capacity and prices
    // inside its own transaction.
    let booking = repo
        .create(&BookingCreateDBRequest {
            room_type_id: payload.room_type_id,
            user_id: gate.user.id,
            check_in: payload.check_in,
            check_out: payload.check_out,
            quantity: payload.quantity,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

#[utoipa::path(
    get,
    path = "/bookings/mine",
    tag = "bookings",
    summary = "List my bookings",
    params(Pagination),
    responses(
        (status = 200, description = "The actor's bookings", body = Vec<BookingDetailResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_my_bookings(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<BookingDetailResponse>>> {
    let (skip, limit) = pagination.params();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Bookings::new(&mut conn);

    let bookings = repo.list_for_user(&user.username, skip, limit).await?;

    Ok(Json(bookings.into_iter().map(BookingDetailResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    summary = "Cancel my booking",
    params(("id" = uuid::Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the booking's user"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Already cancelled, or the stay has started")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn cancel_my_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<BookingId>,
) -> Result<Json<BookingResponse>> {
    let today = Utc::now().date_naive();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Bookings::new(&mut conn);

    let booking = repo.cancel_own(id, &user.username, today).await?;

    Ok(Json(BookingResponse::from(booking)))
}

#[utoipa::path(
    get,
    path = "/owner/bookings",
    tag = "bookings",
    summary = "List bookings for my accommodations",
    params(Pagination),
    responses(
        (status = 200, description = "Bookings against the owner's accommodations", body = Vec<BookingDetailResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::Bookings, operation::ReadOwn>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<BookingDetailResponse>>> {
    let (skip, limit) = pagination.params();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Bookings::new(&mut conn);

    let bookings = repo.list_for_owner(&gate.user.username, skip, limit).await?;

    Ok(Json(bookings.into_iter().map(BookingDetailResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/owner/bookings/{id}/confirm",
    tag = "bookings",
    summary = "Confirm booking (owner)",
    params(("id" = uuid::Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = BookingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the accommodation's owner"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Already confirmed or cancelled")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn confirm_booking_as_owner(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::Bookings, operation::UpdateOwn>,
    Path(id): Path<BookingId>,
) -> Result<Json<BookingResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Bookings::new(&mut conn);

    let booking = repo.confirm_as_owner(id, &gate.user.username).await?;

    Ok(Json(BookingResponse::from(booking)))
}

#[utoipa::path(
    post,
    path = "/owner/bookings/{id}/cancel",
    tag = "bookings",
    summary = "Cancel booking (owner)",
    params(("id" = uuid::Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the accommodation's owner"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Already cancelled")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn cancel_booking_as_owner(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::Bookings, operation::UpdateOwn>,
    Path(id): Path<BookingId>,
) -> Result<Json<BookingResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Bookings::new(&mut conn);

    let booking = repo.cancel_as_owner(id, &gate.user.username).await?;

    Ok(Json(BookingResponse::from(booking)))
}

#[utoipa::path(
    get,
    path = "/admin/bookings",
    tag = "bookings",
    summary = "List all bookings",
    params(Pagination),
    responses(
        (status = 200, description = "All bookings", body = Vec<BookingDetailResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_all_bookings(
    State(state): State<AppState>,
    _: RequiresPermission<resource::Bookings, operation::ReadAll>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<BookingDetailResponse>>> {
    let (skip, limit) = pagination.params();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Bookings::new(&mut conn);

    let bookings = repo.list_all(skip, limit).await?;

    Ok(Json(bookings.into_iter().map(BookingDetailResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/admin/bookings/{id}/confirm",
    tag = "bookings",
    summary = "Confirm booking (admin)",
    params(("id" = uuid::Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = BookingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Already confirmed or cancelled")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn confirm_booking_as_admin(
    State(state): State<AppState>,
    _: RequiresPermission<resource::Bookings, operation::UpdateAll>,
    Path(id): Path<BookingId>,
) -> Result<Json<BookingResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Bookings::new(&mut conn);

    let booking = repo.confirm_as_admin(id).await?;

    Ok(Json(BookingResponse::from(booking)))
}

#[utoipa::path(
    post,
    path = "/admin/bookings/{id}/cancel",
    tag = "bookings",
    summary = "Cancel booking (admin)",
    params(("id" = uuid::Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Already cancelled")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn cancel_booking_as_admin(
    State(state): State<AppState>,
    _: RequiresPermission<resource::Bookings, operation::UpdateAll>,
    Path(id): Path<BookingId>,
) -> Result<Json<BookingResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Bookings::new(&mut conn);

    let booking = repo.cancel_as_admin(id).await?;

    Ok(Json(BookingResponse::from(booking)))
}
