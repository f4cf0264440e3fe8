use crate::AppState;
use crate::api::models::{
    room_types::{RoomTypeCreate, RoomTypeResponse, RoomTypeUpdate},
    users::CurrentUser,
};
use crate::auth::permissions::{
    RequiresPermission, check_accommodation_ownership, check_room_type_ownership, operation, resource,
};
use crate::db::handlers::{Accommodations, Repository, RoomTypes, room_types::RoomTypeFilter};
use crate::db::models::room_types::{RoomTypeCreateDBRequest, RoomTypeUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::{AccommodationId, Operation, RoomTypeId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

fn validate_total_rooms(total_rooms: i32) -> Result<()> {
    if total_rooms < 0 {
        return Err(Error::BadRequest {
            message: format!("total_rooms must be non-negative, got {total_rooms}"),
        });
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/accommodations/{id}/room-types",
    tag = "room-types",
    summary = "List room types of an accommodation",
    params(("id" = uuid::Uuid, Path, description = "Accommodation ID")),
    responses(
        (status = 200, description = "List of room types", body = Vec<RoomTypeResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Accommodation not found")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_room_types(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<AccommodationId>,
) -> Result<Json<Vec<RoomTypeResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    {
        let mut accommodations = Accommodations::new(&mut conn);
        accommodations.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
            resource: "accommodation".to_string(),
            id: id.to_string(),
        })?;
    }

    let mut repo = RoomTypes::new(&mut conn);
    let room_types = repo.list(&RoomTypeFilter::new(id)).await?;

    Ok(Json(room_types.into_iter().map(RoomTypeResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/accommodations/{id}/room-types",
    tag = "room-types",
    summary = "Create room type",
    params(("id" = uuid::Uuid, Path, description = "Accommodation ID")),
    request_body = RoomTypeCreate,
    responses(
        (status = 201, description = "Room type created", body = RoomTypeResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Accommodation not found")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_room_type(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::RoomTypes, operation::CreateOwn>,
    Path(id): Path<AccommodationId>,
    Json(payload): Json<RoomTypeCreate>,
) -> Result<(StatusCode, Json<RoomTypeResponse>)> {
    validate_total_rooms(payload.total_rooms)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    check_accommodation_ownership(&mut tx, id, &gate.user, Operation::CreateOwn).await?;

    let room_type;
    {
        let mut repo = RoomTypes::new(&mut tx);
        room_type = repo
            .create(&RoomTypeCreateDBRequest {
                accommodation_id: id,
                name: payload.name,
                description: payload.description,
                price_per_night: payload.price_per_night,
                total_rooms: payload.total_rooms,
            })
            .await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(RoomTypeResponse::from(room_type))))
}

#[utoipa::path(
    put,
    path = "/room-types/{id}",
    tag = "room-types",
    summary = "Update room type",
    params(("id" = uuid::Uuid, Path, description = "Room type ID")),
    request_body = RoomTypeUpdate,
    responses(
        (status = 200, description = "Room type updated", body = RoomTypeResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_room_type(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::RoomTypes, operation::UpdateOwn>,
    Path(id): Path<RoomTypeId>,
    Json(payload): Json<RoomTypeUpdate>,
) -> Result<Json<RoomTypeResponse>> {
    if let Some(total_rooms) = payload.total_rooms {
        validate_total_rooms(total_rooms)?;
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    check_room_type_ownership(&mut tx, id, &gate.user, Operation::UpdateOwn).await?;

    let room_type;
    {
        let mut repo = RoomTypes::new(&mut tx);
        room_type = repo
            .update(
                id,
                &RoomTypeUpdateDBRequest {
                    name: payload.name,
                    description: payload.description,
                    price_per_night: payload.price_per_night,
                    total_rooms: payload.total_rooms,
                },
            )
            .await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(RoomTypeResponse::from(room_type)))
}

#[utoipa::path(
    delete,
    path = "/room-types/{id}",
    tag = "room-types",
    summary = "Delete room type",
    params(("id" = uuid::Uuid, Path, description = "Room type ID")),
    responses(
        (status = 204, description = "Room type deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("ProxyUser" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_room_type(
    State(state): State<AppState>,
    gate: RequiresPermission<resource::RoomTypes, operation::DeleteOwn>,
    Path(id): Path<RoomTypeId>,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    check_room_type_ownership(&mut tx, id, &gate.user, Operation::DeleteOwn).await?;

    {
        let mut repo = RoomTypes::new(&mut tx);
        if !repo.delete(id).await? {
            return Err(Error::NotFound {
                resource: "room type".to_string(),
                id: id.to_string(),
            });
        }
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}
