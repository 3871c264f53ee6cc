//! lexa - lexical diversity metrics for art-annotation corpora
//!
//! Computes Type-Token Ratio, Shannon entropy and MTLD over the description
//! and visual-attribute texts of every record in a corpus file.

mod cli;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level. Logs go to stderr; stdout is the report.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
