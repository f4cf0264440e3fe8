//! OpenAPI documentation assembled with utoipa.
//!
//! The rendered documentation is served at `/docs`.

use crate::auth::current_user::USER_HEADER;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::healthz,
        crate::api::handlers::users::get_current_user,
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::create_user,
        crate::api::handlers::accommodations::list_accommodations,
        crate::api::handlers::accommodations::get_accommodation,
        crate::api::handlers::accommodations::create_accommodation,
        crate::api::handlers::accommodations::update_accommodation,
        crate::api::handlers::accommodations::delete_accommodation,
        crate::api::handlers::room_types::list_room_types,
        crate::api::handlers::room_types::create_room_type,
        crate::api::handlers::room_types::update_room_type,
        crate::api::handlers::room_types::delete_room_type,
        crate::api::handlers::bookings::create_booking,
        crate::api::handlers::bookings::list_my_bookings,
        crate::api::handlers::bookings::cancel_my_booking,
        crate::api::handlers::bookings::list_owner_bookings,
        crate::api::handlers::bookings::confirm_booking_as_owner,
        crate::api::handlers::bookings::cancel_booking_as_owner,
        crate::api::handlers::bookings::list_all_bookings,
        crate::api::handlers::bookings::confirm_booking_as_admin,
        crate::api::handlers::bookings::cancel_booking_as_admin,
        crate::api::handlers::statistics::owner_statistics,
        crate::api::handlers::statistics::admin_statistics,
    ),
    components(schemas(
        crate::api::models::users::Role,
        crate::api::models::users::UserCreate,
        crate::api::models::users::UserResponse,
        crate::api::models::accommodations::AccommodationCreate,
        crate::api::models::accommodations::AccommodationUpdate,
        crate::api::models::accommodations::AccommodationResponse,
        crate::api::models::accommodations::AccommodationSort,
        crate::api::models::room_types::RoomTypeCreate,
        crate::api::models::room_types::RoomTypeUpdate,
        crate::api::models::room_types::RoomTypeResponse,
        crate::api::models::bookings::BookingStatus,
        crate::api::models::bookings::BookingCreate,
        crate::api::models::bookings::BookingResponse,
        crate::api::models::bookings::BookingDetailResponse,
        crate::api::models::statistics::StatusDistributionResponse,
        crate::api::models::statistics::AccommodationTotalsResponse,
        crate::api::models::statistics::BookingStatisticsResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service health"),
        (name = "users", description = "User management"),
        (name = "accommodations", description = "Accommodation management"),
        (name = "room-types", description = "Room type management"),
        (name = "bookings", description = "Reservations and their lifecycle"),
        (name = "statistics", description = "Booking statistics"),
    ),
    info(
        title = "stayctl",
        description = "Lodging reservation backend: accommodations, room types, capacity-safe bookings."
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "ProxyUser",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    USER_HEADER,
                    "Trusted proxy header carrying the authenticated username",
                ))),
            );
        }
    }
}
