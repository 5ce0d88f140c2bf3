use anyhow::Result;
use clap::Parser;

use folio_server::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    folio_server::run(Cli::parse()).await
}
