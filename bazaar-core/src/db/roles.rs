//! Database role registry
//!
//! One lazily-connecting PgPool per privilege role. Privileges themselves
//! are enforced by database grants (see [`super::grants`]); this layer only
//! picks the right credentials.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use super::session::Session;
use crate::config::{BazaarConfig, ConfigError};

/// Connection privilege level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unrestricted; migrations and maintenance
    Admin,
    /// Signed-in customer, may write its own rows
    AuthorizedUser,
    /// Anonymous visitor, read-only
    AnyUser,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::AuthorizedUser, Role::AnyUser];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::AuthorizedUser => "authorized_user",
            Self::AnyUser => "any_user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "authorized_user" => Ok(Self::AuthorizedUser),
            "any_user" => Ok(Self::AnyUser),
            other => Err(ConfigError::UnknownRole(other.to_string())),
        }
    }
}

/// Owns one connection pool per role for the lifetime of the process.
///
/// Cloning is cheap; clones share the same pools.
#[derive(Clone)]
pub struct RoleRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    admin: PgPool,
    authorized_user: PgPool,
    any_user: PgPool,
}

impl RoleRegistry {
    /// Build pools for every role. No connection is opened until first use.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &BazaarConfig) -> Self {
        let pool_for = |role: Role| {
            let creds = config.roles.credentials(role);
            let options = PgConnectOptions::new()
                .host(&config.database.host)
                .port(config.database.port)
                .database(&config.database.name)
                .username(&creds.user)
                .password(&creds.password)
                .application_name(&format!("bazaar:{}", role));

            PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(config.database.acquire_timeout())
                .connect_lazy_with(options)
        };

        tracing::debug!(
            host = %config.database.host,
            port = config.database.port,
            database = %config.database.name,
            "role registry configured"
        );

        Self::from_pools(
            pool_for(Role::Admin),
            pool_for(Role::AuthorizedUser),
            pool_for(Role::AnyUser),
        )
    }

    /// Build a registry over existing pools (tests, single-credential setups).
    pub fn from_pools(admin: PgPool, authorized_user: PgPool, any_user: PgPool) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                admin,
                authorized_user,
                any_user,
            }),
        }
    }

    pub fn pool(&self, role: Role) -> &PgPool {
        match role {
            Role::Admin => &self.inner.admin,
            Role::AuthorizedUser => &self.inner.authorized_user,
            Role::AnyUser => &self.inner.any_user,
        }
    }

    /// Open a session for `role`. Cheap; the connection is taken on first statement.
    pub fn session(&self, role: Role) -> Session {
        Session::new(role, self.pool(role).clone())
    }

    /// Close every pool. Call once at process shutdown.
    pub async fn close(&self) {
        for role in Role::ALL {
            self.pool(role).close().await;
        }
        tracing::info!("role registry closed");
    }
}
