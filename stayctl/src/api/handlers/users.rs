use crate::AppState;
use crate::api::models::{
    pagination::Pagination,
    users::{CurrentUser, UserCreate, UserResponse},
};
use crate::auth::permissions::{RequiresPermission, operation, resource};
use crate::db::handlers::{Repository, Users, users::UserFilter};
use crate::db::models::users::UserCreateDBRequest;
use crate::errors::{Error, Result};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    summary = "Get the current user",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown username")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_current_user(State(state): State<AppState>, user: CurrentUser) -> Result<Json<UserResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut conn);

    let db_user = repo.get_by_id(user.id).await?.ok_or_else(|| Error::NotFound {
        resource: "user".to_string(),
        id: user.id.to_string(),
    })?;

    Ok(Json(UserResponse::from(db_user)))
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "users",
    summary = "List users",
    params(Pagination),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    _: RequiresPermission<resource::Users, operation::ReadAll>,
) -> Result<Json<Vec<UserResponse>>> {
    let (skip, limit) = pagination.params();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut conn);

    let users = repo.list(&UserFilter::new(skip, limit)).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "users",
    summary = "Create user",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Username already taken")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    _: RequiresPermission<resource::Users, operation::CreateAll>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    if payload.username.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "username must not be empty".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let user;
    {
        let mut repo = Users::new(&mut tx);
        user = repo.create(&UserCreateDBRequest::from(payload)).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
