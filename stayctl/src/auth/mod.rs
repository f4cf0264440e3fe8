//! Authorization system.
//!
//! Authentication happens upstream: the deployment's reverse proxy (or
//! whatever fronts this service) authenticates the caller and forwards the
//! username in a trusted header. This module only *authorizes*: it resolves
//! the header to a [`crate::api::models::users::CurrentUser`] and decides
//! what that actor may do.
//!
//! Access control has two layers:
//!
//! - **Role gates**: whether a role may perform a (resource, operation) pair
//!   at all, decided by [`permissions::role_allows`] and enforced on routes
//!   via the [`permissions::RequiresPermission`] extractor.
//! - **Ownership checks**: whether the actor owns the specific accommodation
//!   (or booking) being acted on, asserted against the currently persisted
//!   owner row by [`permissions::check_accommodation_ownership`]. Admins
//!   bypass ownership entirely; they are never assigned surrogate ownership.
//!
//! # Modules
//!
//! - [`current_user`]: extractor resolving the trusted proxy header to a user
//! - [`permissions`]: role gates and ownership assertions

pub mod current_user;
pub mod permissions;
