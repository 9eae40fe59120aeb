use anyhow::{Context, Result};
use bazaar_core::{Advert, Role, RoleRegistry, ServiceLocator};
use clap::Parser;

use super::{print_json, truncate};

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Substring to match in content or description
    pub keyword: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_search(args: SearchArgs, registry: &RoleRegistry) -> Result<()> {
    let locator = ServiceLocator::open(registry, Role::AnyUser);
    let adverts = locator
        .adverts()
        .search_adverts(&args.keyword)
        .await
        .with_context(|| format!("Search for '{}' failed", args.keyword))?;
    locator.close().await;

    if args.json {
        return print_json(&adverts);
    }
    print_adverts(&adverts);
    Ok(())
}

fn print_adverts(adverts: &[Advert]) {
    if adverts.is_empty() {
        println!("No matches.");
        return;
    }
    println!("{:>6}  {:>10}  {:<20}  CONTENT", "ID", "PRICE", "CREATED");
    for advert in adverts {
        println!(
            "{:>6}  {:>10}  {:<20}  {}",
            advert.id,
            advert.price,
            advert.date_created.format("%Y-%m-%d %H:%M"),
            truncate(&advert.content, 60),
        );
    }
}
