//! Repository traits and their Postgres implementations
//!
//! Each repository follows these patterns:
//! - Holds one request-scoped [`Session`](super::Session), never a pool
//! - Reads return `Ok(None)` / `Ok(vec![])` for absence, `Err` for failure
//! - Writes run in a transaction; constraint violations roll back to `Ok(None)`
//! - Feed rows are enriched in a single JOIN (no N+1)

pub mod adverts;
pub mod categories;
pub mod deals;
pub mod liked;
pub mod users;

use sqlx::{Postgres, Transaction};

use super::roles::Role;

pub use adverts::{AdvertRepository, PgAdvertRepository};
pub use categories::{CategoryRepository, PgCategoryRepository};
pub use deals::{DealRepository, PgDealRepository};
pub use liked::{LikedRepository, PgLikedRepository};
pub use users::{PgUserRepository, UserRepository};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("session for role '{role}' is closed")]
    SessionClosed { role: Role },
}

impl DbError {
    /// Unique, foreign key or check constraint rejected the statement.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Sqlx(sqlx::Error::Database(db)) => {
                db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation()
            }
            _ => false,
        }
    }
}

/// Roll back a failed write.
///
/// Constraint violations are expected outcomes and settle as `Ok(None)`;
/// anything else is returned to the caller.
pub(crate) async fn settle_failed<T>(
    tx: Transaction<'_, Postgres>,
    operation: &'static str,
    err: sqlx::Error,
) -> Result<Option<T>, DbError> {
    if let Err(rollback_err) = tx.rollback().await {
        tracing::error!(operation, error = %rollback_err, "rollback failed");
    }

    let err = DbError::from(err);
    if err.is_constraint_violation() {
        tracing::warn!(operation, error = %err, "constraint violation, rolled back");
        Ok(None)
    } else {
        tracing::error!(operation, error = %err, "write failed, rolled back");
        Err(err)
    }
}
