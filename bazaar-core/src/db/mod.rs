//! Database layer - role registry, sessions and repositories
//!
//! # Design Principles
//!
//! - One lazy pool per privilege role; grants live in the database
//! - One session per request, released on drop
//! - Feed enrichment in a single JOIN - no N+1 queries
//! - Database-generated identities, conflicts settled by constraints

pub mod grants;
pub mod migrations;
pub mod repos;
pub mod roles;
pub mod session;

pub use repos::*;
pub use roles::{Role, RoleRegistry};
pub use session::{Session, SessionConnection};
