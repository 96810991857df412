//! Command-line interface.
//!
//! Two subcommands: `serve` runs the HTTP server, `migrate` applies pending
//! schema migrations and exits.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ConfigLoader, Settings};

#[derive(Debug, Parser)]
#[command(name = "shareit", version, about = "ShareIt item rental service")]
pub struct Cli {
    /// Configuration directory (overrides SHAREIT_CONFIG_DIR)
    #[arg(short, long, env = "SHAREIT_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

/// Loads settings honoring a `--config` override.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let loader = match &cli.config {
        Some(dir) => ConfigLoader::with_config_dir(dir.clone()),
        None => ConfigLoader::new(),
    };
    Ok(loader.load()?)
}

/// Executes the selected subcommand.
pub async fn execute(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => crate::server::Server::new(settings).run().await,
        Commands::Migrate => {
            if settings.database.url.is_empty() {
                anyhow::bail!(
                    "Database URL is not configured; set database.url or SHAREIT_DATABASE__URL"
                );
            }
            tracing::info!("Applying pending migrations...");
            crate::db::run_pending_migrations(&settings.database.url).await?;
            tracing::info!("Migrations applied");
            Ok(())
        }
    }
}
