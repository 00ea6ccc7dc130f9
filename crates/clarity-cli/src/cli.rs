//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clarity_core::model::MODEL_DIR_ENV;

/// Clarity - Categorize transactions and check your financial health
#[derive(Parser)]
#[command(name = "clarity")]
#[command(about = "Transaction categorization and financial-health analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding metadata.json and classifier.json
    ///
    /// Defaults to ./models when that directory exists. Without a model only
    /// the rule cascade runs and unmatched transactions are reported as Misc.
    #[arg(long, env = MODEL_DIR_ENV, global = true)]
    pub model_dir: Option<PathBuf>,

    /// Config file (defaults to the data-dir override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Categorize a single transaction
    Classify {
        /// Signed amount (negative for expenses)
        #[arg(short, long, allow_hyphen_values = true)]
        amount: f64,

        /// Transaction date (YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        date: String,

        /// Bank reference text
        #[arg(short = 'r', long = "ref")]
        reference: Option<String>,

        /// Skip the statistical model even when one is loaded
        #[arg(long)]
        rules_only: bool,
    },

    /// Categorize every transaction in a CSV or JSON file
    Batch {
        /// Transaction file (.csv or .json)
        #[arg(short, long)]
        file: PathBuf,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Produce a financial-health report for a CSV or JSON file
    Analyze {
        /// Transaction file (.csv or .json)
        #[arg(short, long)]
        file: PathBuf,

        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },

    /// Show the loaded model and the active rules
    ModelInfo,
}
