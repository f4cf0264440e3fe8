use crate::AppState;
use crate::errors::{Error, Result};
use axum::extract::State;

/// Liveness/readiness probe. Verifies database connectivity.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    summary = "Health check",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Database unreachable")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn healthz(State(state): State<AppState>) -> Result<&'static str> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|e| Error::Database(e.into()))?;

    Ok("ok")
}
