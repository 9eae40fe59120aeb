//! Schema migrations for the `adv` schema
//!
//! Idempotent; run with the admin pool. Concurrent runs serialize on an
//! advisory lock.

use sqlx::{PgConnection, PgPool};

use super::repos::DbError;

/// Advisory lock key held while migrating
const MIGRATION_LOCK: i64 = 0x6164_765f_6d69_67;

/// Create schema, tables, indexes and the keyword search function
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running adv migrations...");

    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK)
        .execute(&mut *tx)
        .await?;

    sqlx::query("CREATE SCHEMA IF NOT EXISTS adv")
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adv.categories (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adv.profiles (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            nickname TEXT NOT NULL,
            fio TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone_number TEXT NOT NULL,
            password TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Capability rows share the profile id
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adv.customers (
            profile_id BIGINT PRIMARY KEY REFERENCES adv.profiles(id),
            rating INTEGER DEFAULT 0
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adv.sellers (
            profile_id BIGINT PRIMARY KEY REFERENCES adv.profiles(id),
            rating INTEGER DEFAULT 0
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adv.adverts (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            content TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            id_category BIGINT NOT NULL REFERENCES adv.categories(id),
            price BIGINT NOT NULL CHECK (price >= 0),
            status SMALLINT NOT NULL DEFAULT 1,
            id_seller BIGINT NOT NULL REFERENCES adv.sellers(profile_id) ON DELETE CASCADE,
            date_created TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adv.likes (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            id_customer BIGINT NOT NULL REFERENCES adv.customers(profile_id) ON DELETE CASCADE,
            id_advert BIGINT NOT NULL REFERENCES adv.adverts(id) ON DELETE CASCADE,
            date_created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (id_customer, id_advert)
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adv.deals (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            id_customer BIGINT NOT NULL REFERENCES adv.customers(profile_id) ON DELETE CASCADE,
            id_advert BIGINT NOT NULL REFERENCES adv.adverts(id) ON DELETE CASCADE,
            address TEXT NOT NULL DEFAULT 'online',
            status INTEGER NOT NULL DEFAULT 0,
            date_created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (id_customer, id_advert)
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION adv.search_adverts(pattern TEXT)
        RETURNS SETOF adv.adverts
        LANGUAGE sql STABLE
        AS $$
            SELECT *
            FROM adv.adverts
            WHERE content LIKE pattern OR description LIKE pattern
            ORDER BY date_created DESC
        $$
        "#,
    )
    .execute(&mut *tx)
    .await?;

    create_indexes(&mut *tx).await?;
    tx.commit().await?;

    tracing::info!("adv migrations complete");
    Ok(())
}

async fn create_indexes(conn: &mut PgConnection) -> Result<(), DbError> {
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_adverts_created ON adv.adverts(date_created DESC)",
        "CREATE INDEX IF NOT EXISTS idx_adverts_category ON adv.adverts(id_category)",
        "CREATE INDEX IF NOT EXISTS idx_adverts_seller ON adv.adverts(id_seller)",
        "CREATE INDEX IF NOT EXISTS idx_deals_customer ON adv.deals(id_customer)",
    ] {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}
