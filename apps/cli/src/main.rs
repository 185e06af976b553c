//! GuideConverter CLI: OpenLiberty AsciiDoc guides to Markdown.
//!
//! Fetches a guide's `README.adoc`, expands its directives and shared
//! fragments, and writes `<guide>.md`.

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
