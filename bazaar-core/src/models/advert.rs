//! Advert listing records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{required_text, ValidationError};

/// Status value of a listing that is open for sale
pub const STATUS_ACTIVE: i16 = 1;

/// Maximum length for the advert headline
const MAX_CONTENT_LEN: usize = 200;

/// Maximum length for the advert body
const MAX_DESCRIPTION_LEN: usize = 4000;

/// Advert row as stored in `adv.adverts`
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Advert {
    pub id: i64,
    pub content: String,
    pub description: String,
    pub id_category: i64,
    /// Price in currency minor units
    pub price: i64,
    pub status: i16,
    pub id_seller: i64,
    pub date_created: DateTime<Utc>,
}

/// Validated input for creating an advert.
///
/// The identifier and creation timestamp are assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdvert {
    pub content: String,
    pub description: String,
    pub id_category: i64,
    pub price: i64,
    pub status: i16,
    pub id_seller: i64,
}

impl NewAdvert {
    /// Create an active advert, validating its fields.
    ///
    /// # Rules
    /// - Content is required, max 200 characters
    /// - Description may be empty, max 4000 characters
    /// - Price must not be negative
    ///
    /// # Example
    /// ```
    /// use bazaar_core::models::NewAdvert;
    ///
    /// assert!(NewAdvert::new("Lamp", "", 1, 500, 1).is_ok());
    /// assert!(NewAdvert::new("Lamp", "", 1, -1, 1).is_err());
    /// ```
    pub fn new(
        content: &str,
        description: &str,
        id_category: i64,
        price: i64,
        id_seller: i64,
    ) -> Result<Self, ValidationError> {
        let content = required_text("content", content, MAX_CONTENT_LEN)?;

        let description = description.trim();
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_LEN,
            });
        }

        if price < 0 {
            return Err(ValidationError::OutOfRange {
                field: "price",
                reason: "must not be negative",
            });
        }

        Ok(Self {
            content,
            description: description.to_owned(),
            id_category,
            price,
            status: STATUS_ACTIVE,
            id_seller,
        })
    }
}
