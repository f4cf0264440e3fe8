//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL,
//! following the repository pattern:
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - business logic & queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Transactions
//!
//! Repositories borrow a connection and work inside the caller's transaction
//! where one exists. The booking engine additionally opens its own
//! transaction around the lock → ledger-read → insert sequence, so its
//! capacity decision is always consistent with the write it guards.
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and run on startup via
//! [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
