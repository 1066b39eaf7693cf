mod api;
mod cli;
mod complete;
mod editor;
mod model;
mod monitor;
mod orchestrator;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG-driven diagnostics; user-facing state goes through the UI.
    env_logger::init();
    let args = cli::Cli::parse();
    cli::run(args).await
}
