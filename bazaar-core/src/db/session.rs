//! Request-scoped database session
//!
//! A session owns at most one pooled connection for one role. Statements
//! are serialized through an async mutex, so a session is never driven by
//! two in-flight operations at once. The connection is taken from the pool
//! on first use and handed back on `close()` or drop.

use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use super::repos::DbError;
use super::roles::Role;

/// Exclusive handle on the session's connection
pub type SessionConnection<'a> = MappedMutexGuard<'a, PoolConnection<Postgres>>;

enum Slot {
    Idle,
    Open(PoolConnection<Postgres>),
    Closed,
}

pub struct Session {
    role: Role,
    pool: PgPool,
    slot: Mutex<Slot>,
}

impl Session {
    pub(crate) fn new(role: Role, pool: PgPool) -> Self {
        Self {
            role,
            pool,
            slot: Mutex::new(Slot::Idle),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether a pooled connection is currently held.
    pub async fn is_open(&self) -> bool {
        matches!(*self.slot.lock().await, Slot::Open(_))
    }

    /// Lock the session and return its connection, acquiring one on first use.
    ///
    /// The returned guard must be dropped before the next call; holding it
    /// across another repository call on the same session deadlocks.
    pub async fn connection(&self) -> Result<SessionConnection<'_>, DbError> {
        let mut slot = self.slot.lock().await;

        if matches!(*slot, Slot::Closed) {
            return Err(DbError::SessionClosed { role: self.role });
        }
        if matches!(*slot, Slot::Idle) {
            let conn = self.pool.acquire().await?;
            tracing::debug!(role = %self.role, "session connection acquired");
            *slot = Slot::Open(conn);
        }

        MutexGuard::try_map(slot, |slot| match slot {
            Slot::Open(conn) => Some(conn),
            _ => None,
        })
        .map_err(|_| DbError::SessionClosed { role: self.role })
    }

    /// Release the connection back to the pool. Later statements fail.
    pub async fn close(&self) {
        let mut slot = self.slot.lock().await;
        if let Slot::Open(_) = std::mem::replace(&mut *slot, Slot::Closed) {
            tracing::debug!(role = %self.role, "session connection released");
        }
    }
}
