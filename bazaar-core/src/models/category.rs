//! Category reference data

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Display name returned when a category id does not resolve
pub const CATEGORY_NOT_FOUND: &str = "Category not found";

/// Category row from `adv.categories`
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
