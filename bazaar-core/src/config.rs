//! Connection configuration for the three database roles
//!
//! Loaded from `$BAZAAR_CONFIG` or `~/.bazaar/config.toml`. Credential
//! fields may reference environment variables as `${NAME}`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::db::Role;

static VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("invalid variable regex"));

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found at {0:?}\n\nRun: bazaar config init")]
    MissingConfig(PathBuf),

    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file (invalid TOML): {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown database role '{0}' (expected admin, authorized_user or any_user)")]
    UnknownRole(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BazaarConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub roles: RolesConfig,
}

/// Server location and pool sizing shared by every role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Per-role pool size
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5433,
            name: "adverts_db".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCredentials {
    pub user: String,
    pub password: String,
}

impl RoleCredentials {
    fn new(user: &str, password: &str) -> Self {
        Self {
            user: user.to_string(),
            password: password.to_string(),
        }
    }
}

/// Login credentials per database role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    pub admin: RoleCredentials,
    pub authorized_user: RoleCredentials,
    pub any_user: RoleCredentials,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            admin: RoleCredentials::new("admin", "admin"),
            authorized_user: RoleCredentials::new("authorized_user", "user"),
            any_user: RoleCredentials::new("any_user", "anon"),
        }
    }
}

impl RolesConfig {
    pub fn credentials(&self, role: Role) -> &RoleCredentials {
        match role {
            Role::Admin => &self.admin,
            Role::AuthorizedUser => &self.authorized_user,
            Role::AnyUser => &self.any_user,
        }
    }
}

impl BazaarConfig {
    /// Load config from the default path.
    ///
    /// Fails hard with actionable error if config doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Err(ConfigError::MissingConfig(path));
        }
        Self::load_from(&path)
    }

    /// Load config from the default path, falling back to development defaults.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML and expand `${VAR}` references.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_variables();
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Config file path: `$BAZAAR_CONFIG` or `~/.bazaar/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var("BAZAAR_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bazaar/config.toml")
    }

    fn expand_variables(&mut self) {
        self.database.host = expand_string(&self.database.host);
        self.database.name = expand_string(&self.database.name);
        for creds in [
            &mut self.roles.admin,
            &mut self.roles.authorized_user,
            &mut self.roles.any_user,
        ] {
            creds.user = expand_string(&creds.user);
            creds.password = expand_string(&creds.password);
        }
    }
}

/// Replace `${NAME}` with the environment value; unset variables become empty.
fn expand_string(s: &str) -> String {
    VAR_RE
        .replace_all(s, |caps: &regex::Captures<'_>| {
            env::var(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}
