use anyhow::{Context, Result};
use bazaar_core::{Role, RoleRegistry, ServiceLocator};
use clap::Parser;

use super::print_json;

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_categories(args: CategoriesArgs, registry: &RoleRegistry) -> Result<()> {
    let locator = ServiceLocator::open(registry, Role::AnyUser);
    let categories = locator
        .categories()
        .get_all()
        .await
        .context("Failed to list categories")?;
    locator.close().await;

    if args.json {
        return print_json(&categories);
    }
    for category in &categories {
        println!("{:>4}  {}", category.id, category.name);
    }
    Ok(())
}
