//! Advert repository
//!
//! Listings plus the viewer-enriched feed:
//! - create: INSERT ... RETURNING (identity assigned by the database)
//! - feed: one JOIN with LEFT JOINs on the viewer's likes and deals

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Connection;

use super::{settle_failed, DbError};
use crate::db::Session;
use crate::models::{Advert, AdvertWithCategoryDto, NewAdvert};

const ADVERT_COLUMNS: &str =
    "id, content, description, id_category, price, status, id_seller, date_created";

/// Feed projection. `$1` is the viewer id and may be NULL, in which case
/// neither LEFT JOIN matches and every flag is false.
const FEED_SQL: &str = r#"
    SELECT a.id, a.content, a.description, a.id_category, c.name AS category_name,
           a.price, a.status, a.id_seller, p.fio AS seller_name, a.date_created,
           CASE WHEN l.id IS NULL THEN FALSE ELSE TRUE END AS is_favorite,
           CASE WHEN d.id IS NULL THEN FALSE ELSE TRUE END AS is_bought,
           COALESCE(a.id_seller = $1::BIGINT, FALSE) AS is_created
    FROM adv.adverts a
    JOIN adv.categories c ON c.id = a.id_category
    JOIN adv.sellers s ON s.profile_id = a.id_seller
    JOIN adv.profiles p ON p.id = s.profile_id
    LEFT JOIN adv.likes l ON l.id_advert = a.id AND l.id_customer = $1::BIGINT
    LEFT JOIN adv.deals d ON d.id_advert = a.id AND d.id_customer = $1::BIGINT
    ORDER BY a.date_created DESC, a.id DESC
"#;

/// Category feed; `is_created` is left to the caller.
const CATEGORY_FEED_SQL: &str = r#"
    SELECT a.id, a.content, a.description, a.id_category, c.name AS category_name,
           a.price, a.status, a.id_seller, p.fio AS seller_name, a.date_created,
           CASE WHEN l.id IS NULL THEN FALSE ELSE TRUE END AS is_favorite,
           CASE WHEN d.id IS NULL THEN FALSE ELSE TRUE END AS is_bought
    FROM adv.adverts a
    JOIN adv.categories c ON c.id = a.id_category
    JOIN adv.sellers s ON s.profile_id = a.id_seller
    JOIN adv.profiles p ON p.id = s.profile_id
    LEFT JOIN adv.likes l ON l.id_advert = a.id AND l.id_customer = $1::BIGINT
    LEFT JOIN adv.deals d ON d.id_advert = a.id AND d.id_customer = $1::BIGINT
    WHERE a.id_category = $2
    ORDER BY a.date_created DESC, a.id DESC
"#;

#[async_trait]
pub trait AdvertRepository: Send + Sync {
    /// Insert a listing. `None` if a constraint rejected it.
    async fn create(&self, advert: &NewAdvert) -> Result<Option<Advert>, DbError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Advert>, DbError>;

    /// Every listing, newest first.
    async fn get_all(&self) -> Result<Vec<Advert>, DbError>;

    async fn get_by_seller(&self, seller_id: i64) -> Result<Vec<Advert>, DbError>;

    async fn is_owned_by(&self, seller_id: i64, advert_id: i64) -> Result<bool, DbError>;

    /// Substring match on content or description via `adv.search_adverts`.
    async fn search(&self, keyword: &str) -> Result<Vec<Advert>, DbError>;

    /// Listings created within `[start, end]`, newest first.
    async fn filter_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Advert>, DbError>;

    async fn get_by_category(&self, category_id: i64) -> Result<Vec<Advert>, DbError>;

    /// Delete only if `seller_id` owns the row; otherwise a no-op.
    async fn delete(&self, advert_id: i64, seller_id: i64) -> Result<(), DbError>;

    async fn get_feed(&self, viewer_id: Option<i64>) -> Result<Vec<AdvertWithCategoryDto>, DbError>;

    async fn get_feed_by_category(
        &self,
        category_id: i64,
        viewer_id: Option<i64>,
    ) -> Result<Vec<AdvertWithCategoryDto>, DbError>;
}

pub struct PgAdvertRepository {
    session: Arc<Session>,
}

impl PgAdvertRepository {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl AdvertRepository for PgAdvertRepository {
    async fn create(&self, advert: &NewAdvert) -> Result<Option<Advert>, DbError> {
        let mut conn = self.session.connection().await?;
        let mut tx = Connection::begin(&mut **conn).await?;

        let inserted = sqlx::query_as::<_, Advert>(&format!(
            r#"
            INSERT INTO adv.adverts (content, description, id_category, price, status, id_seller)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ADVERT_COLUMNS}
            "#
        ))
        .bind(&advert.content)
        .bind(&advert.description)
        .bind(advert.id_category)
        .bind(advert.price)
        .bind(advert.status)
        .bind(advert.id_seller)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                tracing::debug!(advert_id = row.id, seller_id = row.id_seller, "advert created");
                Ok(Some(row))
            }
            Err(err) => settle_failed(tx, "advert.create", err).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Advert>, DbError> {
        let mut conn = self.session.connection().await?;
        let advert = sqlx::query_as::<_, Advert>(&format!(
            "SELECT {ADVERT_COLUMNS} FROM adv.adverts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut **conn)
        .await?;
        Ok(advert)
    }

    async fn get_all(&self) -> Result<Vec<Advert>, DbError> {
        let mut conn = self.session.connection().await?;
        let adverts = sqlx::query_as::<_, Advert>(&format!(
            "SELECT {ADVERT_COLUMNS} FROM adv.adverts ORDER BY date_created DESC, id DESC"
        ))
        .fetch_all(&mut **conn)
        .await?;
        Ok(adverts)
    }

    async fn get_by_seller(&self, seller_id: i64) -> Result<Vec<Advert>, DbError> {
        let mut conn = self.session.connection().await?;
        let adverts = sqlx::query_as::<_, Advert>(&format!(
            r#"
            SELECT {ADVERT_COLUMNS} FROM adv.adverts
            WHERE id_seller = $1
            ORDER BY date_created DESC, id DESC
            "#
        ))
        .bind(seller_id)
        .fetch_all(&mut **conn)
        .await?;
        Ok(adverts)
    }

    async fn is_owned_by(&self, seller_id: i64, advert_id: i64) -> Result<bool, DbError> {
        let mut conn = self.session.connection().await?;
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM adv.adverts WHERE id = $1 AND id_seller = $2)",
        )
        .bind(advert_id)
        .bind(seller_id)
        .fetch_one(&mut **conn)
        .await?;
        Ok(owned)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Advert>, DbError> {
        let pattern = format!("%{keyword}%");
        let mut conn = self.session.connection().await?;
        let adverts = sqlx::query_as::<_, Advert>(&format!(
            "SELECT {ADVERT_COLUMNS} FROM adv.search_adverts($1)"
        ))
        .bind(&pattern)
        .fetch_all(&mut **conn)
        .await?;

        tracing::debug!(keyword, rows = adverts.len(), "advert search");
        Ok(adverts)
    }

    async fn filter_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Advert>, DbError> {
        let mut conn = self.session.connection().await?;
        let adverts = sqlx::query_as::<_, Advert>(&format!(
            r#"
            SELECT {ADVERT_COLUMNS} FROM adv.adverts
            WHERE date_created BETWEEN $1 AND $2
            ORDER BY date_created DESC, id DESC
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&mut **conn)
        .await?;
        Ok(adverts)
    }

    async fn get_by_category(&self, category_id: i64) -> Result<Vec<Advert>, DbError> {
        let mut conn = self.session.connection().await?;
        let adverts = sqlx::query_as::<_, Advert>(&format!(
            r#"
            SELECT {ADVERT_COLUMNS} FROM adv.adverts
            WHERE id_category = $1
            ORDER BY date_created DESC, id DESC
            "#
        ))
        .bind(category_id)
        .fetch_all(&mut **conn)
        .await?;
        Ok(adverts)
    }

    async fn delete(&self, advert_id: i64, seller_id: i64) -> Result<(), DbError> {
        let mut conn = self.session.connection().await?;
        let mut tx = Connection::begin(&mut **conn).await?;

        let deleted = sqlx::query("DELETE FROM adv.adverts WHERE id = $1 AND id_seller = $2")
            .bind(advert_id)
            .bind(seller_id)
            .execute(&mut *tx)
            .await;

        match deleted {
            Ok(result) => {
                tx.commit().await?;
                tracing::debug!(advert_id, seller_id, rows = result.rows_affected(), "advert delete");
                Ok(())
            }
            Err(err) => settle_failed::<()>(tx, "advert.delete", err).await.map(|_| ()),
        }
    }

    async fn get_feed(&self, viewer_id: Option<i64>) -> Result<Vec<AdvertWithCategoryDto>, DbError> {
        let mut conn = self.session.connection().await?;
        let rows = sqlx::query_as::<_, AdvertWithCategoryDto>(FEED_SQL)
            .bind(viewer_id)
            .fetch_all(&mut **conn)
            .await?;

        tracing::debug!(viewer_id, rows = rows.len(), "feed loaded");
        Ok(rows)
    }

    async fn get_feed_by_category(
        &self,
        category_id: i64,
        viewer_id: Option<i64>,
    ) -> Result<Vec<AdvertWithCategoryDto>, DbError> {
        let mut conn = self.session.connection().await?;
        let rows = sqlx::query_as::<_, AdvertWithCategoryDto>(CATEGORY_FEED_SQL)
            .bind(viewer_id)
            .bind(category_id)
            .fetch_all(&mut **conn)
            .await?;

        tracing::debug!(category_id, viewer_id, rows = rows.len(), "category feed loaded");
        Ok(rows)
    }
}
