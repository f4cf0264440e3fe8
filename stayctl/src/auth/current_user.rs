use crate::api::models::users::CurrentUser;
use crate::db::errors::DbError;
use crate::db::handlers::Users;
use crate::errors::Error;
use crate::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::trace;

/// Trusted header carrying the already-authenticated username.
pub const USER_HEADER: &str = "x-stayctl-user";

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A single request may extract the actor more than once (e.g. a
        // permission gate plus the handler itself); resolve the header only
        // the first time.
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let username = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(Error::Unauthenticated { message: None })?;

        let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
        let mut users = Users::new(&mut conn);

        let user = users
            .get_by_username(username)
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "user".to_string(),
                id: username.to_string(),
            })?;

        trace!(username = %user.username, role = ?user.role, "resolved request actor");

        let current = CurrentUser::from(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}
