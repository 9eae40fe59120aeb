use anyhow::{Context, Result};
use bazaar_core::db::{grants, migrations};
use bazaar_core::{BazaarConfig, Role, RoleRegistry};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Also grant privileges to the authorized_user and any_user roles
    #[arg(long)]
    pub grants: bool,
}

pub async fn run_migrate(args: MigrateArgs, registry: &RoleRegistry, config: &BazaarConfig) -> Result<()> {
    let pool = registry.pool(Role::Admin);

    migrations::run(pool)
        .await
        .context("Failed to run migrations (is the admin role configured?)")?;

    if args.grants {
        grants::apply(pool, &config.roles)
            .await
            .context("Failed to apply grants (do the roles exist?)")?;
    }

    println!("✓ adv schema is up to date");
    Ok(())
}
