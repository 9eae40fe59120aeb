use std::sync::Arc;

use crate::db::LikedRepository;
use crate::error::Result;
use crate::models::{Advert, Liked};

pub struct LikedService {
    repo: Arc<dyn LikedRepository>,
}

impl LikedService {
    pub fn new(repo: Arc<dyn LikedRepository>) -> Self {
        Self { repo }
    }

    /// `None` when already favorited.
    pub async fn add_to_liked(&self, customer_id: i64, advert_id: i64) -> Result<Option<Liked>> {
        Ok(self.repo.add_to_liked(customer_id, advert_id).await?)
    }

    pub async fn remove_from_liked(&self, customer_id: i64, advert_id: i64) -> Result<()> {
        Ok(self.repo.remove_from_liked(customer_id, advert_id).await?)
    }

    pub async fn get_liked_by_user(&self, customer_id: i64) -> Result<Vec<Advert>> {
        Ok(self.repo.get_liked_by_user(customer_id).await?)
    }

    pub async fn is_liked(&self, customer_id: i64, advert_id: i64) -> Result<bool> {
        Ok(self.repo.is_liked(customer_id, advert_id).await?)
    }
}
