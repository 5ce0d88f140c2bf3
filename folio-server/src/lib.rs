//! Library entrypoint for the folio server so integration tests can drive the
//! router without binding a socket.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

use anyhow::{Context, Result};
use folio_core::ArticleStore;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Command},
    config::AppConfig,
};

pub fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Run the CLI (parsed by the caller).
pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose)?;

    let config = AppConfig::from_cli(&cli)?;
    match cli.command {
        Command::Serve { .. } => server::serve(config).await,
        Command::InitDb => init_db(&config),
    }
}

fn init_db(config: &AppConfig) -> Result<()> {
    let path = &config.database_path;
    let store =
        ArticleStore::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let count = store.count()?;

    println!("Database ready at {} ({} articles)", path.display(), count);
    Ok(())
}
