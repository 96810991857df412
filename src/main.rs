use clap::Parser;

use shareit::cli::{self, Cli};
use shareit::logger::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli::load_settings(&cli)?;
    init_logging(&settings.logger)?;

    cli::execute(cli, settings).await
}
