//! Favorites repository
//!
//! add: INSERT ... ON CONFLICT DO NOTHING (no check-then-insert)

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::Connection;

use super::{settle_failed, DbError};
use crate::db::Session;
use crate::models::{Advert, Liked};

#[async_trait]
pub trait LikedRepository: Send + Sync {
    /// `None` when the advert is already favorited or cannot be referenced.
    async fn add_to_liked(&self, customer_id: i64, advert_id: i64) -> Result<Option<Liked>, DbError>;

    /// No-op when the pair is absent.
    async fn remove_from_liked(&self, customer_id: i64, advert_id: i64) -> Result<(), DbError>;

    async fn get_liked_by_user(&self, customer_id: i64) -> Result<Vec<Advert>, DbError>;

    async fn is_liked(&self, customer_id: i64, advert_id: i64) -> Result<bool, DbError>;
}

pub struct PgLikedRepository {
    session: Arc<Session>,
}

impl PgLikedRepository {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl LikedRepository for PgLikedRepository {
    async fn add_to_liked(&self, customer_id: i64, advert_id: i64) -> Result<Option<Liked>, DbError> {
        let mut conn = self.session.connection().await?;
        let mut tx = Connection::begin(&mut **conn).await?;

        let inserted = sqlx::query_as::<_, Liked>(
            r#"
            INSERT INTO adv.likes (id_customer, id_advert)
            VALUES ($1, $2)
            ON CONFLICT (id_customer, id_advert) DO NOTHING
            RETURNING id, id_customer, id_advert, date_created
            "#,
        )
        .bind(customer_id)
        .bind(advert_id)
        .fetch_optional(&mut *tx)
        .await;

        match inserted {
            Ok(liked) => {
                tx.commit().await?;
                tracing::debug!(customer_id, advert_id, added = liked.is_some(), "favorite added");
                Ok(liked)
            }
            Err(err) => settle_failed(tx, "liked.add", err).await,
        }
    }

    async fn remove_from_liked(&self, customer_id: i64, advert_id: i64) -> Result<(), DbError> {
        let mut conn = self.session.connection().await?;
        let mut tx = Connection::begin(&mut **conn).await?;

        let deleted = sqlx::query("DELETE FROM adv.likes WHERE id_customer = $1 AND id_advert = $2")
            .bind(customer_id)
            .bind(advert_id)
            .execute(&mut *tx)
            .await;

        match deleted {
            Ok(result) => {
                tx.commit().await?;
                tracing::debug!(customer_id, advert_id, rows = result.rows_affected(), "favorite removed");
                Ok(())
            }
            Err(err) => settle_failed::<()>(tx, "liked.remove", err).await.map(|_| ()),
        }
    }

    async fn get_liked_by_user(&self, customer_id: i64) -> Result<Vec<Advert>, DbError> {
        let mut conn = self.session.connection().await?;
        let adverts = sqlx::query_as::<_, Advert>(
            r#"
            SELECT a.id, a.content, a.description, a.id_category, a.price, a.status,
                   a.id_seller, a.date_created
            FROM adv.likes l
            JOIN adv.adverts a ON a.id = l.id_advert
            WHERE l.id_customer = $1
            ORDER BY l.date_created DESC, l.id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&mut **conn)
        .await?;
        Ok(adverts)
    }

    async fn is_liked(&self, customer_id: i64, advert_id: i64) -> Result<bool, DbError> {
        let mut conn = self.session.connection().await?;
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM adv.likes WHERE id_customer = $1 AND id_advert = $2)",
        )
        .bind(customer_id)
        .bind(advert_id)
        .fetch_one(&mut **conn)
        .await?;
        Ok(exists)
    }
}
