//! bazaar CLI - operator tool for the classifieds marketplace database
//!
//! - Schema migration and role grants (`migrate`)
//! - Viewer-relative feed inspection (`feed`, `search`, `categories`)
//! - User registration (`register`)
//! - Connection config management (`config`)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bazaar_core::{BazaarConfig, RoleRegistry};
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "bazaar",
    author,
    version,
    about = "Role-scoped access to the bazaar marketplace database",
    long_about = "Apply the adv schema and grants, inspect viewer-relative listing feeds, \
                  and register users through the same services the marketplace uses."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.bazaar/config.toml)
    #[arg(long, global = true, env = "BAZAAR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update the adv schema (admin role)
    Migrate(commands::migrate::MigrateArgs),
    /// Show the listing feed, optionally relative to a viewer
    Feed(commands::feed::FeedArgs),
    /// Search listings by keyword
    Search(commands::search::SearchArgs),
    /// List categories
    Categories(commands::categories::CategoriesArgs),
    /// Register a new user
    Register(commands::register::RegisterArgs),
    /// Manage bazaar configuration (init, path, show)
    Config(commands::config::ConfigArgs),
}

fn load_config(path: Option<&Path>) -> Result<BazaarConfig> {
    match path {
        Some(path) => BazaarConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => BazaarConfig::load_or_default().context("Failed to load config"),
    }
}

/// Run a database command against a registry built from `config`.
async fn run_database_command(command: Commands, config: &BazaarConfig) -> Result<()> {
    let registry = RoleRegistry::from_config(config);

    let result = match command {
        Commands::Migrate(args) => commands::migrate::run_migrate(args, &registry, config).await,
        Commands::Feed(args) => commands::feed::run_feed(args, &registry).await,
        Commands::Search(args) => commands::search::run_search(args, &registry).await,
        Commands::Categories(args) => commands::categories::run_categories(args, &registry).await,
        Commands::Register(args) => commands::register::run_register(args, &registry).await,
        Commands::Config(args) => commands::config::run_config(args, None),
    };

    registry.close().await;
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        // Config management must work before any config exists
        Commands::Config(args) => commands::config::run_config(args, cli.config.as_deref()),
        command => {
            let config = load_config(cli.config.as_deref())?;
            run_database_command(command, &config).await
        }
    }
}
