//! Domain services
//!
//! Each service wraps one repository trait object and adds the rules the
//! repository must not know about.

pub mod adverts;
pub mod auth;
pub mod categories;
pub mod deals;
pub mod liked;

#[cfg(test)]
pub(crate) mod memory;

pub use adverts::AdvertService;
pub use auth::{AuthService, TokenIssuer};
pub use categories::CategoryService;
pub use deals::DealsService;
pub use liked::LikedService;
