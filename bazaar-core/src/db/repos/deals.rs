//! Deal repository
//!
//! Unlike the other writes, a failed deal is never settled quietly: the
//! buyer has to be told the purchase did not record.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::Connection;

use super::DbError;
use crate::db::Session;
use crate::models::{Advert, Deal, DEAL_PENDING, DEFAULT_DEAL_ADDRESS};

#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Record a purchase. Every failure, duplicates included, is an error.
    async fn create_deal(&self, customer_id: i64, advert_id: i64) -> Result<Deal, DbError>;

    /// Adverts the customer has bought, most recent deal first.
    async fn get_deals_by_user(&self, customer_id: i64) -> Result<Vec<Advert>, DbError>;

    async fn is_in_deals(&self, customer_id: i64, advert_id: i64) -> Result<bool, DbError>;
}

pub struct PgDealRepository {
    session: Arc<Session>,
}

impl PgDealRepository {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl DealRepository for PgDealRepository {
    async fn create_deal(&self, customer_id: i64, advert_id: i64) -> Result<Deal, DbError> {
        let mut conn = self.session.connection().await?;
        let mut tx = Connection::begin(&mut **conn).await?;

        let inserted = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO adv.deals (id_customer, id_advert, address, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, id_advert, id_customer, date_created, status, address
            "#,
        )
        .bind(customer_id)
        .bind(advert_id)
        .bind(DEFAULT_DEAL_ADDRESS)
        .bind(DEAL_PENDING)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(deal) => {
                tx.commit().await?;
                tracing::info!(deal_id = deal.id, customer_id, advert_id, "deal recorded");
                Ok(deal)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "deal rollback failed");
                }
                tracing::error!(customer_id, advert_id, error = %err, "deal not recorded");
                Err(err.into())
            }
        }
    }

    async fn get_deals_by_user(&self, customer_id: i64) -> Result<Vec<Advert>, DbError> {
        let mut conn = self.session.connection().await?;
        let adverts = sqlx::query_as::<_, Advert>(
            r#"
            SELECT a.id, a.content, a.description, a.id_category, a.price, a.status,
                   a.id_seller, a.date_created
            FROM adv.deals d
            JOIN adv.adverts a ON a.id = d.id_advert
            WHERE d.id_customer = $1
            ORDER BY d.date_created DESC, d.id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&mut **conn)
        .await?;
        Ok(adverts)
    }

    async fn is_in_deals(&self, customer_id: i64, advert_id: i64) -> Result<bool, DbError> {
        let mut conn = self.session.connection().await?;
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM adv.deals WHERE id_customer = $1 AND id_advert = $2)",
        )
        .bind(customer_id)
        .bind(advert_id)
        .fetch_one(&mut **conn)
        .await?;
        Ok(exists)
    }
}
