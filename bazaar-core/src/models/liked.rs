//! Favorite markers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from `adv.likes`
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Liked {
    pub id: i64,
    pub id_customer: i64,
    pub id_advert: i64,
    pub date_created: DateTime<Utc>,
}
