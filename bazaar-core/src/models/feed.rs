//! Viewer-aware listing projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Advert;

/// Denormalized feed row: an advert with its category and seller names,
/// plus flags relative to the current viewer.
///
/// The three flags are only ever true when a viewer identity is known.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct AdvertWithCategoryDto {
    pub id: i64,
    pub content: String,
    pub description: String,
    pub id_category: i64,
    pub category_name: Option<String>,
    pub price: i64,
    pub status: i16,
    pub id_seller: i64,
    pub seller_name: Option<String>,
    pub date_created: DateTime<Utc>,

    #[sqlx(default)]
    #[serde(default)]
    pub is_favorite: bool,
    #[sqlx(default)]
    #[serde(default)]
    pub is_bought: bool,
    #[sqlx(default)]
    #[serde(default)]
    pub is_created: bool,
}

impl AdvertWithCategoryDto {
    /// Build an un-enriched row; names unknown, every flag false.
    pub fn from_advert(advert: Advert) -> Self {
        Self {
            id: advert.id,
            content: advert.content,
            description: advert.description,
            id_category: advert.id_category,
            category_name: None,
            price: advert.price,
            status: advert.status,
            id_seller: advert.id_seller,
            seller_name: None,
            date_created: advert.date_created,
            is_favorite: false,
            is_bought: false,
            is_created: false,
        }
    }

    /// Drop every viewer-relative flag.
    pub fn clear_viewer_flags(&mut self) {
        self.is_favorite = false;
        self.is_bought = false;
        self.is_created = false;
    }

    /// Recompute `is_created` from a known viewer id.
    pub fn mark_created_for(&mut self, viewer_id: i64) {
        self.is_created = self.id_seller == viewer_id;
    }
}
