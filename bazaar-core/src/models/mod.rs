//! Domain models with validation at construction
//!
//! Row types map 1:1 onto `adv.*` columns. Input types validate when
//! created and return ValidationError, not panic.

pub mod validation;
pub mod advert;
pub mod category;
pub mod deal;
pub mod feed;
pub mod liked;
pub mod user;
pub mod viewer;

pub use validation::ValidationError;
pub use advert::{Advert, NewAdvert, STATUS_ACTIVE};
pub use category::{Category, CATEGORY_NOT_FOUND};
pub use deal::{Deal, DEAL_PENDING, DEFAULT_DEAL_ADDRESS};
pub use feed::AdvertWithCategoryDto;
pub use liked::Liked;
pub use user::{NewUser, RegisterForm, User, MIN_PASSWORD_LEN};
pub use viewer::{viewer_id, Viewer};
