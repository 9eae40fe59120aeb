//! Structured error types for the service layer.
//!
//! Repository failures arrive as [`DbError`]; services add the
//! application-level outcomes (not found, permission, conflict) that
//! callers need to tell apart.

use thiserror::Error;

use crate::db::DbError;
use crate::models::ValidationError;

/// Main error type for service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Lookup target does not exist
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// Caller is known but may not act on the resource
    #[error("permission denied: {reason}")]
    PermissionDenied { reason: String },

    /// Input rejected before reaching the database
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Write refused by a uniqueness rule
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unknown email or wrong password; deliberately not more specific
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Hashing or hash parsing failed
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
