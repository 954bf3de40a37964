mod auth;
mod cli;
mod config;
mod error;
mod insights;
mod output;
mod providers;
mod statistics;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    // GIT_TOKEN may live in a local .env file
    auth::load_env_file(Path::new(".env"))?;

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting stepstats");
    cli.execute().await?;

    Ok(())
}
