//! Privilege layout for the three login roles
//!
//! The roles themselves must already exist; this only grants.

use sqlx::PgPool;

use super::repos::DbError;
use super::roles::Role;
use crate::config::RolesConfig;

/// Tables `authorized_user` may insert into and delete from
const WRITABLE_TABLES: &str =
    "adv.adverts, adv.likes, adv.deals, adv.profiles, adv.customers, adv.sellers";

/// Quote a role name as a Postgres identifier.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// GRANT statements for one role, in execution order
pub fn statements_for(role: Role, login: &str) -> Vec<String> {
    let who = quote_ident(login);
    match role {
        Role::Admin => vec![
            format!("GRANT USAGE, CREATE ON SCHEMA adv TO {who}"),
            format!("GRANT ALL ON ALL TABLES IN SCHEMA adv TO {who}"),
            format!("GRANT ALL ON ALL SEQUENCES IN SCHEMA adv TO {who}"),
            format!("GRANT EXECUTE ON ALL FUNCTIONS IN SCHEMA adv TO {who}"),
        ],
        Role::AuthorizedUser => vec![
            format!("GRANT USAGE ON SCHEMA adv TO {who}"),
            format!("GRANT SELECT ON ALL TABLES IN SCHEMA adv TO {who}"),
            format!("GRANT INSERT, DELETE ON {WRITABLE_TABLES} TO {who}"),
            format!("GRANT USAGE ON ALL SEQUENCES IN SCHEMA adv TO {who}"),
            format!("GRANT EXECUTE ON FUNCTION adv.search_adverts(TEXT) TO {who}"),
        ],
        // Anonymous reads never see emails, phones or password hashes.
        // The feed LEFT JOINs likes and deals, so both stay readable here.
        Role::AnyUser => vec![
            format!("GRANT USAGE ON SCHEMA adv TO {who}"),
            format!("GRANT SELECT ON adv.adverts, adv.categories, adv.sellers TO {who}"),
            format!("GRANT SELECT (id, nickname, fio) ON adv.profiles TO {who}"),
            format!("GRANT SELECT ON adv.likes, adv.deals TO {who}"),
            format!("GRANT EXECUTE ON FUNCTION adv.search_adverts(TEXT) TO {who}"),
        ],
    }
}

/// Apply grants for every configured role. Run after migrations.
pub async fn apply(pool: &PgPool, roles: &RolesConfig) -> Result<(), DbError> {
    for role in Role::ALL {
        let login = &roles.credentials(role).user;
        for statement in statements_for(role, login) {
            sqlx::query(&statement).execute(pool).await?;
        }
        tracing::info!(%role, login = %login, "grants applied");
    }
    Ok(())
}
