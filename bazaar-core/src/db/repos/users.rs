//! User repository
//!
//! A user spans three tables: `profiles` plus the `customers` and `sellers`
//! capability rows keyed by the same profile id. Creation and deletion
//! touch all three inside one transaction.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::Connection;

use super::{settle_failed, DbError};
use crate::db::Session;
use crate::models::{NewUser, User};

const USER_SELECT: &str = r#"
    SELECT p.id, p.nickname, p.fio, p.email, p.phone_number, p.password, c.rating
    FROM adv.profiles p
    LEFT JOIN adv.customers c ON c.profile_id = p.id
"#;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert profile, customer and seller rows atomically.
    /// `None` when the email is taken.
    async fn create(&self, user: &NewUser) -> Result<Option<User>, DbError>;

    /// Remove capability rows then the profile. `false` if no profile existed.
    async fn delete(&self, profile_id: i64) -> Result<bool, DbError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError>;

    async fn find_by_id(&self, profile_id: i64) -> Result<Option<User>, DbError>;
}

pub struct PgUserRepository {
    session: Arc<Session>,
}

impl PgUserRepository {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> Result<Option<User>, DbError> {
        let mut conn = self.session.connection().await?;
        let mut tx = Connection::begin(&mut **conn).await?;

        let inserted = async {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO adv.profiles (nickname, fio, email, phone_number, password)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(&user.nickname)
            .bind(&user.fio)
            .bind(&user.email)
            .bind(&user.phone_number)
            .bind(&user.password_hash)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO adv.customers (profile_id, rating) VALUES ($1, $2)")
                .bind(id)
                .bind(user.rating)
                .execute(&mut *tx)
                .await?;

            sqlx::query("INSERT INTO adv.sellers (profile_id, rating) VALUES ($1, $2)")
                .bind(id)
                .bind(user.rating)
                .execute(&mut *tx)
                .await?;

            Ok::<_, sqlx::Error>(id)
        }
        .await;

        match inserted {
            Ok(id) => {
                tx.commit().await?;
                tracing::info!(user_id = id, "user created");
                Ok(Some(User {
                    id,
                    nickname: user.nickname.clone(),
                    fio: user.fio.clone(),
                    email: user.email.clone(),
                    phone_number: user.phone_number.clone(),
                    password: user.password_hash.clone(),
                    rating: Some(user.rating),
                }))
            }
            Err(err) => settle_failed(tx, "user.create", err).await,
        }
    }

    async fn delete(&self, profile_id: i64) -> Result<bool, DbError> {
        let mut conn = self.session.connection().await?;
        let mut tx = Connection::begin(&mut **conn).await?;

        let deleted = async {
            // Capability rows first; profiles is referenced by both
            sqlx::query("DELETE FROM adv.customers WHERE profile_id = $1")
                .bind(profile_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM adv.sellers WHERE profile_id = $1")
                .bind(profile_id)
                .execute(&mut *tx)
                .await?;
            let profile = sqlx::query("DELETE FROM adv.profiles WHERE id = $1")
                .bind(profile_id)
                .execute(&mut *tx)
                .await?;
            Ok::<_, sqlx::Error>(profile.rows_affected() > 0)
        }
        .await;

        match deleted {
            Ok(existed) => {
                tx.commit().await?;
                tracing::info!(user_id = profile_id, existed, "user deleted");
                Ok(existed)
            }
            Err(err) => Ok(settle_failed(tx, "user.delete", err).await?.unwrap_or(false)),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.session.connection().await?;
        let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE p.email = $1"))
            .bind(email)
            .fetch_optional(&mut **conn)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, profile_id: i64) -> Result<Option<User>, DbError> {
        let mut conn = self.session.connection().await?;
        let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE p.id = $1"))
            .bind(profile_id)
            .fetch_optional(&mut **conn)
            .await?;
        Ok(user)
    }
}
