use crate::AppState;
use crate::api::models::{
    accommodations::{AccommodationCreate, AccommodationResponse, AccommodationUpdate, ListAccommodationsQuery},
    users::{CurrentUser, Role},
};
use crate::auth::permissions::{RequiresPermission, check_accommodation_ownership, operation, resource};
use crate::db::handlers::{Accommodations, Repository, Users, accommodations::AccommodationFilter};
use crate::db::models::accommodations::{AccommodationCreateDBRequest, AccommodationUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::{AccommodationId, Operation, Resource, UserId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sqlx::PgConnection;

/// Resolve who will own a new accommodation.
///
/// Owners always own what they create. Admins never get surrogate ownership:
/// they must name the owner, and the named user must be able to own
/// accommodations.
async fn resolve_owner(conn: &mut PgConnection, actor: &CurrentUser, owner_username: Option<&str>) -> Result<UserId> {
    match owner_username {
        None if actor.is_admin() => Err(Error::BadRequest {
            message: "owner_username is required when an administrator creates an accommodation".to_string(),
        }),
        None => Ok(actor.id),
        Some(_) if !actor.is_admin() => Err(Error::Forbidden {
            action: Operation::CreateAll,
            resource: Resource::Accommodations,
        }),
        Some(username) => {
            let mut users = Users::new(conn);
            let owner = users.get_by_username(username).await?.ok_or_else(|| Error::NotFound {
                resource: "user".to_string(),
                id: username.to_string(),
            })?;

            if owner.role == Role::User {
                return Err(Error::BadRequest {
                    message: format!("user {username} cannot own accommodations (role USER)"),
                });
            }

            Ok(owner.id)
        }
    }
}

#[utoipa::path(
    get,
    path = "/accommodations",
    tag = "accommodations",
    summary = "List accommodations",
    params(ListAccommodationsQuery),
    responses(
        (status = 200, description = "List of accommodations", body = Vec<AccommodationResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_accommodations(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListAccommodationsQuery>,
) -> Result<Json<Vec<AccommodationResponse>>> {
    let (skip, limit) = query.pagination.params();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Accommodations::new(&mut conn);

    let filter = AccommodationFilter::new(skip, limit)
        .with_search(query.search)
        .with_sort(query.sort);
    let accommodations = repo.list(&filter).await?;

    Ok(Json(accommodations.into_iter().map(AccommodationResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/accommodations/{id}",
    tag = "accommodations",
    summary = "Get accommodation",
    params(("id" = uuid::Uuid, Path, description = "Accommodation ID")),
    responses(
        (status = 200, description = "The accommodation", body = AccommodationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_accommodation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<AccommodationId>,
) -> Result<Json<AccommodationResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Accommodations::new(&mut conn);

    let accommodation = repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "accommodation".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(AccommodationResponse::from(accommodation)))
}

#[utoipa::path(
    post,
    path = "/accommodations",
    tag = "accommodations",
    summary = "Create accommodation",
    request_body = AccommodationCreate,
    responses(
        (status = 201, description = "Accommodation created", body = AccommodationResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_accommodation(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::Accommodations, operation::CreateOwn>,
    Json(payload): Json<AccommodationCreate>,
) -> Result<(StatusCode, Json<AccommodationResponse>)> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let owner_id = resolve_owner(&mut tx, &gate.user, payload.owner_username.as_deref()).await?;

    let accommodation;
    {
        let mut repo = Accommodations::new(&mut tx);
        accommodation = repo
            .create(&AccommodationCreateDBRequest {
                name: payload.name,
                location: payload.location,
                description: payload.description,
                price_per_night: payload.price_per_night,
                owner_id,
            })
            .await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(AccommodationResponse::from(accommodation))))
}

#[utoipa::path(
    put,
    path = "/accommodations/{id}",
    tag = "accommodations",
    summary = "Update accommodation",
    params(("id" = uuid::Uuid, Path, description = "Accommodation ID")),
    request_body = AccommodationUpdate,
    responses(
        (status = 200, description = "Accommodation updated", body = AccommodationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_accommodation(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::Accommodations, operation::UpdateOwn>,
    Path(id): Path<AccommodationId>,
    Json(payload): Json<AccommodationUpdate>,
) -> Result<Json<AccommodationResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    check_accommodation_ownership(&mut tx, id, &gate.user, Operation::UpdateOwn).await?;

    let accommodation;
    {
        let mut repo = Accommodations::new(&mut tx);
        accommodation = repo
            .update(
                id,
                &AccommodationUpdateDBRequest {
                    name: payload.name,
                    location: payload.location,
                    description: payload.description,
                    price_per_night: payload.price_per_night,
                },
            )
            .await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(AccommodationResponse::from(accommodation)))
}

#[utoipa::path(
    delete,
    path = "/accommodations/{id}",
    tag = "accommodations",
    summary = "Delete accommodation",
    params(("id" = uuid::Uuid, Path, description = "Accommodation ID")),
    responses(
        (status = 204, description = "Accommodation deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_accommodation(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::Accommodations, operation::DeleteOwn>,
    Path(id): Path<AccommodationId>,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    check_accommodation_ownership(&mut tx, id, &gate.user, Operation::DeleteOwn).await?;

    {
        let mut repo = Accommodations::new(&mut tx);
        // Deletion cascades to the accommodation's room types
        if !repo.delete(id).await? {
            return Err(Error::NotFound {
                resource: "accommodation".to_string(),
                id: id.to_string(),
            });
        }
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}
