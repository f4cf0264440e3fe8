//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Accommodations** (`/api/v1/accommodations/*`): listing, CRUD, room types
//! - **Bookings** (`/api/v1/bookings/*`): create, self-cancel, own view
//! - **Owner operations** (`/api/v1/owner/*`): confirm/cancel bookings, views, statistics
//! - **Admin operations** (`/api/v1/admin/*`): user management, all-bookings view, statistics
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`;
//! the rendered documentation is served at `/docs`.

pub mod handlers;
pub mod models;
