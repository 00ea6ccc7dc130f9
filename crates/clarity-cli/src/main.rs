//! Clarity CLI - Transaction categorization and financial-health analysis
//!
//! Usage:
//!   clarity classify --amount -245.5 --date 2025-03-15   Categorize one transaction
//!   clarity batch --file transactions.csv                Categorize a file
//!   clarity analyze --file transactions.json             Financial-health report
//!   clarity serve --port 8000                            Start REST API server

mod cli;
mod commands;


use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let model_dir = commands::resolve_model_dir(cli.model_dir.as_deref(), Path::new("."));
    let model = commands::load_model(model_dir.as_deref())?;

    match cli.command {
        Commands::Serve { port, host } => commands::cmd_serve(&config, model, &host, port).await,
        Commands::Classify {
            amount,
            date,
            reference,
            rules_only,
        } => {
            let engine = commands::build_engine(&config, model);
            commands::cmd_classify(&engine, amount, &date, reference.as_deref(), !rules_only)
        }
        Commands::Batch { file, json } => {
            let engine = commands::build_engine(&config, model);
            commands::cmd_batch(&engine, &config, &file, json)
        }
        Commands::Analyze { file, json } => {
            let engine = commands::build_engine(&config, model);
            commands::cmd_analyze(&engine, &config, &file, json)
        }
        Commands::ModelInfo => commands::cmd_model_info(model.as_deref(), &config),
    }
}
