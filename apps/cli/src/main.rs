//! MacroFind CLI — monthly web-search enrichment of macro findings documents.
//!
//! Reads a findings JSON file, runs the month's search queries, appends the
//! new, previously unseen findings as three result groups, and writes the
//! file back.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
