//! Purchase records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status of a freshly recorded deal
pub const DEAL_PENDING: i32 = 0;

/// Delivery address used when the buyer gives none
pub const DEFAULT_DEAL_ADDRESS: &str = "online";

/// Deal row from `adv.deals`
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Deal {
    pub id: i64,
    pub id_advert: i64,
    pub id_customer: i64,
    pub date_created: DateTime<Utc>,
    pub status: i32,
    pub address: String,
}
