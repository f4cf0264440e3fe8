//! # stayctl: Control Layer for Lodging Reservations
//!
//! `stayctl` is a reservation backend for lodging inventory. Accommodations
//! expose room types with finite room counts; users reserve rooms for date
//! ranges; owners and admins manage inventory and the booking lifecycle.
//!
//! ## Overview
//!
//! The hard problem a reservation backend has to get right is capacity: under
//! concurrent requests, the sum of booked rooms for any room type on any
//! night must never exceed that room type's total. Everything else is
//! conventional CRUD around it. `stayctl` therefore concentrates the hard
//! guarantees in the booking engine in [`db::handlers::bookings`] and keeps
//! the rest of the service thin.
//!
//! ### What It Does
//!
//! A booking request is validated (dates must form at least one night,
//! quantity must be positive), then the engine takes a row lock on the
//! target room type, sums the already-booked quantity over every
//! non-cancelled booking overlapping the requested interval, and either
//! rejects the request with the remaining capacity or prices the stay
//! (`nightly price x nights x quantity`, exact decimal arithmetic) and
//! inserts the booking in `PENDING` state. Overlap is half-open: a booking
//! checking out on the day another checks in shares no night with it, so
//! same-day turnover never conflicts.
//!
//! Bookings then move through a one-way state machine: owners or admins
//! confirm (`PENDING -> CONFIRMED`); guests cancel their own upcoming
//! bookings, owners and admins cancel anything (`-> CANCELLED`, terminal).
//! Cancelled quantity immediately stops counting against capacity.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL for all persistence needs.
//!
//! The **API layer** ([`api`]) exposes RESTful management routes under
//! `/api/v1`, split by audience: guest routes (`/bookings/*`,
//! `/accommodations/*`), owner routes (`/owner/*`) and admin routes
//! (`/admin/*`). All endpoints are documented with OpenAPI annotations and
//! served at `/docs`.
//!
//! The **authorization layer** ([`auth`]) resolves the trusted
//! `x-stayctl-user` proxy header to a user record (authentication itself
//! happens upstream) and gates routes on a single role-to-permission
//! mapping.
//! Instance-level ownership (does this actor own this accommodation?) is
//! asserted against the currently persisted owner row.
//!
//! The **database layer** ([`db`]) uses the repository pattern. Each entity
//! has a repository that handles queries and mutations; the booking
//! repository is the reservation engine and owns the only serialization
//! point in the system, a per-room-type `SELECT ... FOR UPDATE`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use stayctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = stayctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     stayctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await
//! }
//! ```
//!
//! ## Database Setup
//!
//! The application requires a PostgreSQL database and automatically runs
//! migrations on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
//! stayctl::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
pub mod test_utils;
pub mod types;

pub use config::Config;

use crate::api::handlers::{accommodations, bookings, health, room_types, statistics, users};
use crate::api::models::users::Role;
use crate::db::handlers::{Repository, Users};
use crate::db::models::users::UserCreateDBRequest;
use anyhow::Context;
use axum::{
    Router,
    routing::{get, post, put},
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Compile-time embedded migrations for the `migrations/` directory.
pub fn migrator() -> &'static sqlx::migrate::Migrator {
    static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
    &MIGRATOR
}

/// Shared state available to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

/// Build the full application router over the given state.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Accommodations & room types
        .route(
            "/accommodations",
            get(accommodations::list_accommodations).post(accommodations::create_accommodation),
        )
        .route(
            "/accommodations/{id}",
            get(accommodations::get_accommodation)
                .put(accommodations::update_accommodation)
                .delete(accommodations::delete_accommodation),
        )
        .route(
            "/accommodations/{id}/room-types",
            get(room_types::list_room_types).post(room_types::create_room_type),
        )
        .route(
            "/room-types/{id}",
            put(room_types::update_room_type).delete(room_types::delete_room_type),
        )
        // Guest booking operations
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/mine", get(bookings::list_my_bookings))
        .route("/bookings/{id}/cancel", post(bookings::cancel_my_booking))
        // Owner operations
        .route("/owner/bookings", get(bookings::list_owner_bookings))
        .route("/owner/bookings/{id}/confirm", post(bookings::confirm_booking_as_owner))
        .route("/owner/bookings/{id}/cancel", post(bookings::cancel_booking_as_owner))
        .route("/owner/statistics", get(statistics::owner_statistics))
        // Admin operations
        .route("/admin/bookings", get(bookings::list_all_bookings))
        .route("/admin/bookings/{id}/confirm", post(bookings::confirm_booking_as_admin))
        .route("/admin/bookings/{id}/cancel", post(bookings::cancel_booking_as_admin))
        .route("/admin/statistics", get(statistics::admin_statistics))
        .route("/admin/users", get(users::list_users).post(users::create_user))
        // Current user
        .route("/users/me", get(users::get_current_user));

    Router::new()
        .route("/healthz", get(health::healthz))
        .nest("/api/v1", api)
        .merge(Scalar::with_url("/docs", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The running application: a configured connection pool plus the router.
pub struct Application {
    state: AppState,
}

impl Application {
    /// Connect to the configured database, run migrations, seed the admin
    /// user and assemble the application.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
            .connect(&config.database.url)
            .await
            .context("failed to connect to database")?;

        Self::new_with_pool(config, pool).await
    }

    /// Assemble the application over an existing pool (used by tests).
    pub async fn new_with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        migrator().run(&pool).await.context("failed to run database migrations")?;

        seed_admin(&pool, &config).await?;

        Ok(Self {
            state: AppState {
                db: pool,
                config: Arc::new(config),
            },
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind and serve until the shutdown future resolves.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let host = self
            .state
            .config
            .host
            .parse()
            .with_context(|| format!("invalid host {}", self.state.config.host))?;
        let addr = SocketAddr::new(host, self.state.config.port);

        let listener = TcpListener::bind(addr).await.context("failed to bind listener")?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .context("server error")
    }
}

/// Create the configured admin user on first startup.
async fn seed_admin(pool: &PgPool, config: &Config) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    let mut repo = Users::new(&mut conn);

    if repo.get_by_username(&config.admin_username).await?.is_none() {
        repo.create(&UserCreateDBRequest {
            username: config.admin_username.clone(),
            display_name: config.admin_display_name.clone(),
            role: Role::Admin,
        })
        .await?;
        tracing::info!(username = %config.admin_username, "seeded initial admin user");
    }

    Ok(())
}
