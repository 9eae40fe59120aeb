use anyhow::{Context, Result};
use bazaar_core::{AdvertWithCategoryDto, Role, RoleRegistry, ServiceLocator, Viewer};
use clap::Parser;

use super::{print_json, truncate};

#[derive(Parser, Debug)]
pub struct FeedArgs {
    /// Profile id to compute favorite/bought/created flags for
    #[arg(long)]
    pub viewer: Option<i64>,

    /// Restrict to one category id
    #[arg(long)]
    pub category: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_feed(args: FeedArgs, registry: &RoleRegistry) -> Result<()> {
    // Only the id is bound into feed queries
    let viewer = args
        .viewer
        .map(|id| Viewer::new(id, String::new(), Role::AuthorizedUser.as_str()));
    let locator = ServiceLocator::for_viewer(registry, viewer.as_ref());

    let rows = match args.category {
        Some(category_id) => locator
            .adverts()
            .get_feed_by_category(category_id, viewer.as_ref())
            .await
            .with_context(|| format!("Failed to load feed for category {category_id}"))?,
        None => locator
            .adverts()
            .get_feed(viewer.as_ref())
            .await
            .context("Failed to load feed")?,
    };
    locator.close().await;

    if args.json {
        return print_json(&rows);
    }
    print_feed(&rows);
    Ok(())
}

fn flags(row: &AdvertWithCategoryDto) -> String {
    [
        (row.is_favorite, 'F'),
        (row.is_bought, 'B'),
        (row.is_created, 'C'),
    ]
    .iter()
    .map(|(set, mark)| if *set { *mark } else { '-' })
    .collect()
}

fn print_feed(rows: &[AdvertWithCategoryDto]) {
    if rows.is_empty() {
        println!("No adverts.");
        return;
    }

    println!(
        "{:>6}  {:>10}  {:<5}  {:<16}  {:<16}  CONTENT",
        "ID", "PRICE", "FLAGS", "CATEGORY", "SELLER"
    );
    for row in rows {
        println!(
            "{:>6}  {:>10}  {:<5}  {:<16}  {:<16}  {}",
            row.id,
            row.price,
            flags(row),
            truncate(row.category_name.as_deref().unwrap_or("-"), 16),
            truncate(row.seller_name.as_deref().unwrap_or("-"), 16),
            truncate(&row.content, 48),
        );
    }
    println!("\n{} advert(s)  F=favorite B=bought C=created", rows.len());
}
