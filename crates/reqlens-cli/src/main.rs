//! Reqlens CLI
//!
//! Structured requirement extraction and embeddings from the command line.

use anyhow::Result;
use clap::Parser;
use reqlens_core::error::exit_codes;
use reqlens_core::{Config, ReqlensError};

mod app;
mod commands;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<ReqlensError>()
            .map(ReqlensError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, config).await,
        Commands::Analyze(args) => commands::analyze::run(args, &config, cli.format).await,
        Commands::Embed(args) => commands::embed::run(args, &config, cli.format).await,
        Commands::Config(args) => commands::config::run(args, &config, cli.format),
    }
}
