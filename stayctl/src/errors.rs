use crate::db::errors::DbError;
use crate::types::{Operation, Resource};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Actor lacks the role or ownership required for the operation
    #[error("Insufficient permissions to {action} {resource}")]
    Forbidden { action: Operation, resource: Resource },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Check-out must be strictly after check-in
    #[error("Invalid date interval: check-out ({check_out}) must be after check-in ({check_in})")]
    InvalidInterval {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// Booked quantity must be at least 1
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: i32 },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// The requested quantity exceeds the remaining capacity for the interval
    #[error("Insufficient inventory for the requested dates; remaining capacity: {remaining}")]
    InsufficientInventory { remaining: i64 },

    /// Cancelling a booking that is already cancelled
    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    /// Confirming a booking that is already confirmed
    #[error("Booking is already confirmed")]
    AlreadyConfirmed,

    /// Confirming a cancelled booking
    #[error("A cancelled booking cannot be confirmed")]
    CancelledCannotConfirm,

    /// Self-service cancellation on or after the check-in date
    #[error("Bookings cannot be cancelled on or after their check-in date")]
    TooLateToCancel,

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. }
            | Error::InvalidInterval { .. }
            | Error::InvalidQuantity { .. }
            | Error::InsufficientInventory { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::AlreadyCancelled | Error::AlreadyConfirmed | Error::CancelledCannotConfirm | Error::TooLateToCancel => {
                StatusCode::CONFLICT
            }
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message
                .clone()
                .unwrap_or_else(|| "Authentication required".to_string()),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { constraint, table, .. } => match (table.as_deref(), constraint.as_deref()) {
                    (Some("users"), Some(c)) if c.contains("username") => "This username is already taken".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
            // The remaining variants carry messages that are already user-facing
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::Forbidden { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            _ => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        (status, self.user_message()).into_response()
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_documented_status_codes() {
        let check_in = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        assert_eq!(
            Error::InvalidInterval { check_in, check_out }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::InvalidQuantity { quantity: 0 }.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::InsufficientInventory { remaining: 2 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound {
                resource: "room type".to_string(),
                id: "deadbeef".to_string(),
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Forbidden {
                action: Operation::UpdateOwn,
                resource: Resource::Accommodations,
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(Error::AlreadyCancelled.status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::AlreadyConfirmed.status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::CancelledCannotConfirm.status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::TooLateToCancel.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn insufficient_inventory_reports_remaining_capacity() {
        let err = Error::InsufficientInventory { remaining: 2 };
        assert!(err.user_message().contains('2'));
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = Error::Other(anyhow::anyhow!("connection refused to 10.0.0.3:5432"));
        assert_eq!(err.user_message(), "Internal server error");
    }
}
