//! Role gates and ownership assertions.
//!
//! All role branching lives in [`role_allows`]; call sites never compare
//! role strings themselves. Instance-level ownership is asserted against the
//! currently persisted owner row, never a cached value, since ownership is
//! fixed at creation and admins bypass it entirely.

use crate::api::models::users::{CurrentUser, Role};
use crate::db::handlers::{Accommodations, Repository, RoomTypes};
use crate::db::models::room_types::RoomTypeDBResponse;
use crate::errors::{Error, Result};
use crate::AppState;
use crate::types::{AccommodationId, Operation, Resource, RoomTypeId};
use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::PgConnection;
use std::marker::PhantomData;

/// Decide whether a role may perform an operation on a resource class.
///
/// `*Own` operations still require the instance-level ownership check; this
/// function only answers whether the role is in the game at all. Admin is a
/// full bypass.
pub fn role_allows(role: Role, resource: Resource, operation: Operation) -> bool {
    use Operation::*;
    use Resource::*;

    match role {
        Role::Admin => true,
        Role::Owner => matches!(
            (resource, operation),
            (Accommodations, CreateOwn | UpdateOwn | DeleteOwn)
                | (RoomTypes, CreateOwn | UpdateOwn | DeleteOwn)
                | (Bookings, CreateOwn | ReadOwn | UpdateOwn)
                | (Statistics, ReadOwn)
        ),
        Role::User => matches!((resource, operation), (Bookings, CreateOwn)),
    }
}

/// Marker types naming a [`Resource`] at the type level, for use with
/// [`RequiresPermission`].
pub mod resource {
    use crate::types::Resource;

    pub trait StaticResource {
        const RESOURCE: Resource;
    }

    macro_rules! static_resource {
        ($name:ident) => {
            pub struct $name;

            impl StaticResource for $name {
                const RESOURCE: Resource = Resource::$name;
            }
        };
    }

    static_resource!(Users);
    static_resource!(Accommodations);
    static_resource!(RoomTypes);
    static_resource!(Bookings);
    static_resource!(Statistics);
}

/// Marker types naming an [`Operation`] at the type level.
pub mod operation {
    use crate::types::Operation;

    pub trait StaticOperation {
        const OPERATION: Operation;
    }

    macro_rules! static_operation {
        ($name:ident) => {
            pub struct $name;

            impl StaticOperation for $name {
                const OPERATION: Operation = Operation::$name;
            }
        };
    }

    static_operation!(CreateAll);
    static_operation!(CreateOwn);
    static_operation!(ReadAll);
    static_operation!(ReadOwn);
    static_operation!(UpdateAll);
    static_operation!(UpdateOwn);
    static_operation!(DeleteAll);
    static_operation!(DeleteOwn);
}

/// Extractor gating a route on `role_allows(actor.role, R, O)`.
///
/// ```ignore
/// async fn create_accommodation(
///     State(state): State<AppState>,
///     gate: RequiresPermission<resource::Accommodations, operation::CreateOwn>,
///     Json(payload): Json<AccommodationCreate>,
/// ) -> Result<...> {
///     let actor = gate.user;
///     ...
/// }
/// ```
pub struct RequiresPermission<R, O> {
    pub user: CurrentUser,
    _marker: PhantomData<fn() -> (R, O)>,
}

impl<R, O> FromRequestParts<AppState> for RequiresPermission<R, O>
where
    R: resource::StaticResource,
    O: operation::StaticOperation,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = <CurrentUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;

        if role_allows(user.role, R::RESOURCE, O::OPERATION) {
            Ok(Self {
                user,
                _marker: PhantomData,
            })
        } else {
            Err(Error::Forbidden {
                action: O::OPERATION,
                resource: R::RESOURCE,
            })
        }
    }
}

/// Assert that the actor may manage the given accommodation.
///
/// Fails with `NotFound` when the accommodation does not exist and
/// `Forbidden` when the actor is neither its current owner nor an admin.
/// Reads the owner from the database on every call.
pub async fn check_accommodation_ownership(
    conn: &mut PgConnection,
    accommodation_id: AccommodationId,
    actor: &CurrentUser,
    action: Operation,
) -> Result<()> {
    let mut repo = Accommodations::new(conn);

    let accommodation = repo.get_by_id(accommodation_id).await?.ok_or_else(|| Error::NotFound {
        resource: "accommodation".to_string(),
        id: accommodation_id.to_string(),
    })?;

    if actor.is_admin() || accommodation.owner_id == actor.id {
        Ok(())
    } else {
        Err(Error::Forbidden {
            action,
            resource: Resource::Accommodations,
        })
    }
}

/// Assert that the actor may manage the given room type, via its
/// accommodation's current owner. Returns the room type so callers don't
/// fetch it twice.
pub async fn check_room_type_ownership(
    conn: &mut PgConnection,
    room_type_id: RoomTypeId,
    actor: &CurrentUser,
    action: Operation,
) -> Result<RoomTypeDBResponse> {
    let room_type = {
        let mut repo = RoomTypes::new(&mut *conn);
        repo.get_by_id(room_type_id).await?.ok_or_else(|| Error::NotFound {
            resource: "room type".to_string(),
            id: room_type_id.to_string(),
        })?
    };

    let mut repo = Accommodations::new(conn);
    let accommodation = repo
        .get_by_id(room_type.accommodation_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "accommodation".to_string(),
            id: room_type.accommodation_id.to_string(),
        })?;

    if actor.is_admin() || accommodation.owner_id == actor.id {
        Ok(room_type)
    } else {
        Err(Error::Forbidden {
            action,
            resource: Resource::RoomTypes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_bypasses_every_gate() {
        for resource in [
            Resource::Users,
            Resource::Accommodations,
            Resource::RoomTypes,
            Resource::Bookings,
            Resource::Statistics,
        ] {
            for operation in [
                Operation::CreateAll,
                Operation::CreateOwn,
                Operation::ReadAll,
                Operation::ReadOwn,
                Operation::UpdateAll,
                Operation::UpdateOwn,
                Operation::DeleteAll,
                Operation::DeleteOwn,
            ] {
                assert!(role_allows(Role::Admin, resource, operation));
            }
        }
    }

    #[test]
    fn owners_manage_their_inventory_but_not_users() {
        assert!(role_allows(Role::Owner, Resource::Accommodations, Operation::CreateOwn));
        assert!(role_allows(Role::Owner, Resource::RoomTypes, Operation::UpdateOwn));
        assert!(role_allows(Role::Owner, Resource::Bookings, Operation::UpdateOwn));
        assert!(role_allows(Role::Owner, Resource::Statistics, Operation::ReadOwn));

        assert!(!role_allows(Role::Owner, Resource::Users, Operation::ReadAll));
        assert!(!role_allows(Role::Owner, Resource::Bookings, Operation::ReadAll));
        assert!(!role_allows(Role::Owner, Resource::Statistics, Operation::ReadAll));
        assert!(!role_allows(Role::Owner, Resource::Accommodations, Operation::DeleteAll));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn accommodation_guard_checks_current_owner(pool: sqlx::PgPool) {
        use crate::test_utils::{create_test_accommodation, create_test_user};

        let owner = create_test_user(&pool, Role::Owner).await;
        let stranger = create_test_user(&pool, Role::Owner).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let accommodation = create_test_accommodation(&pool, owner.id).await;

        let mut conn = pool.acquire().await.unwrap();

        let owner_actor = CurrentUser::from(owner);
        let stranger_actor = CurrentUser::from(stranger);
        let admin_actor = CurrentUser::from(admin);

        check_accommodation_ownership(&mut conn, accommodation.id, &owner_actor, Operation::UpdateOwn)
            .await
            .unwrap();

        let err = check_accommodation_ownership(&mut conn, accommodation.id, &stranger_actor, Operation::UpdateOwn)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));

        // Admins bypass ownership entirely
        check_accommodation_ownership(&mut conn, accommodation.id, &admin_actor, Operation::DeleteOwn)
            .await
            .unwrap();

        let err = check_accommodation_ownership(&mut conn, uuid::Uuid::new_v4(), &admin_actor, Operation::UpdateOwn)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn room_type_guard_resolves_through_the_accommodation(pool: sqlx::PgPool) {
        use crate::test_utils::{create_test_accommodation, create_test_room_type, create_test_user};
        use rust_decimal::Decimal;

        let owner = create_test_user(&pool, Role::Owner).await;
        let stranger = create_test_user(&pool, Role::Owner).await;
        let accommodation = create_test_accommodation(&pool, owner.id).await;
        let room_type = create_test_room_type(&pool, accommodation.id, 5, Decimal::new(100_000, 2)).await;

        let mut conn = pool.acquire().await.unwrap();

        let owner_actor = CurrentUser::from(owner);
        let stranger_actor = CurrentUser::from(stranger);

        let found = check_room_type_ownership(&mut conn, room_type.id, &owner_actor, Operation::UpdateOwn)
            .await
            .unwrap();
        assert_eq!(found.id, room_type.id);

        let err = check_room_type_ownership(&mut conn, room_type.id, &stranger_actor, Operation::UpdateOwn)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));

        let err = check_room_type_ownership(&mut conn, uuid::Uuid::new_v4(), &owner_actor, Operation::UpdateOwn)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn users_can_book_and_nothing_else() {
        assert!(role_allows(Role::User, Resource::Bookings, Operation::CreateOwn));

        assert!(!role_allows(Role::User, Resource::Bookings, Operation::ReadOwn));
        assert!(!role_allows(Role::User, Resource::Bookings, Operation::UpdateOwn));
        assert!(!role_allows(Role::User, Resource::Accommodations, Operation::CreateOwn));
        assert!(!role_allows(Role::User, Resource::RoomTypes, Operation::DeleteOwn));
        assert!(!role_allows(Role::User, Resource::Users, Operation::ReadAll));
        assert!(!role_allows(Role::User, Resource::Statistics, Operation::ReadOwn));
    }
}
