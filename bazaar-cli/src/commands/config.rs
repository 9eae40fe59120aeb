use std::path::Path;

use anyhow::{Context, Result};
use bazaar_core::BazaarConfig;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with development defaults
    Init(InitArgs),
    /// Show config file path
    Path,
    /// Print the effective config with passwords masked
    Show,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

/// `path` overrides the default location (`--config` / `$BAZAAR_CONFIG`).
pub fn run_config(args: ConfigArgs, path: Option<&Path>) -> Result<()> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(BazaarConfig::config_path);

    match args.command {
        ConfigCommands::Init(args) => run_init(args, &config_path),
        ConfigCommands::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigCommands::Show => run_show(&config_path),
    }
}

fn run_init(args: InitArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = BazaarConfig::default().to_toml_string()?;
    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Set role passwords (\"${{VAR}}\" reads from the environment)");
    println!("  3. Run: bazaar migrate --grants");
    Ok(())
}

fn run_show(config_path: &Path) -> Result<()> {
    let mut config = if config_path.exists() {
        BazaarConfig::load_from(config_path)?
    } else {
        println!("# {} not found, showing defaults", config_path.display());
        BazaarConfig::default()
    };

    for creds in [
        &mut config.roles.admin,
        &mut config.roles.authorized_user,
        &mut config.roles.any_user,
    ] {
        creds.password = "********".to_string();
    }

    print!("{}", config.to_toml_string()?);
    Ok(())
}
