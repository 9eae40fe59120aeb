//! Role-scoped data access for the bazaar classifieds marketplace.
//!
//! - [`db`]: role registry, request sessions, repositories, migrations, grants
//! - [`models`]: row types and validated inputs
//! - [`services`]: ownership rules and viewer-aware feeds over the repositories
//! - [`locator`]: per-request composition of sessions, repositories and services

pub mod config;
pub mod db;
pub mod error;
pub mod locator;
pub mod models;
pub mod services;

pub use config::{BazaarConfig, ConfigError};
pub use db::{DbError, Role, RoleRegistry, Session};
pub use error::{Result, ServiceError};
pub use locator::{Repositories, ServiceLocator};
pub use models::{Advert, AdvertWithCategoryDto, Viewer};
