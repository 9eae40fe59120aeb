//! Category repository

use std::sync::Arc;

use async_trait::async_trait;

use super::DbError;
use crate::db::Session;
use crate::models::{Category, CATEGORY_NOT_FOUND};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by id.
    async fn get_all(&self) -> Result<Vec<Category>, DbError>;

    /// Display name, or [`CATEGORY_NOT_FOUND`] when the id is unknown.
    async fn get_name_by_id(&self, id: i64) -> Result<String, DbError>;
}

pub struct PgCategoryRepository {
    session: Arc<Session>,
}

impl PgCategoryRepository {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn get_all(&self) -> Result<Vec<Category>, DbError> {
        let mut conn = self.session.connection().await?;
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM adv.categories ORDER BY id")
                .fetch_all(&mut **conn)
                .await?;
        Ok(categories)
    }

    async fn get_name_by_id(&self, id: i64) -> Result<String, DbError> {
        let mut conn = self.session.connection().await?;
        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM adv.categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut **conn)
                .await?;

        Ok(name.unwrap_or_else(|| {
            tracing::debug!(category_id = id, "category not found");
            CATEGORY_NOT_FOUND.to_string()
        }))
    }
}
