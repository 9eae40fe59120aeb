//! Category service

use std::sync::Arc;

use crate::db::CategoryRepository;
use crate::error::Result;
use crate::models::Category;

pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<Category>> {
        Ok(self.repo.get_all().await?)
    }

    /// Name for display; unknown ids yield the not-found sentinel.
    pub async fn get_name_by_id(&self, category_id: i64) -> Result<String> {
        Ok(self.repo.get_name_by_id(category_id).await?)
    }
}
