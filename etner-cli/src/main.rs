//! Linha de comando: exporta o CSV do coletor para CoNLL e inspeciona o pipeline.

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "etner",
    version,
    about = "Rotulagem BIO por regras de mensagens de e-commerce em amárico/inglês"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    Cli::parse().command.run()
}
