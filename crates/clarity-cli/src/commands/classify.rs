//! Categorization commands

use std::path::Path;

use anyhow::{Context, Result};
use clarity_core::{
    check_batch_size, classify_batch, import::read_records, BatchResponse, ClarityConfig,
    ClassificationEngine, PredictionResult, Transaction, TransactionRecord,
};

pub fn cmd_classify(
    engine: &ClassificationEngine,
    amount: f64,
    date: &str,
    reference: Option<&str>,
    allow_statistical: bool,
) -> Result<()> {
    let record = TransactionRecord::new(date, amount, reference.unwrap_or_default());
    let tx = Transaction::try_from(record).context("Invalid transaction")?;

    let prediction = engine.predict(&tx, allow_statistical);
    println!("{}", format_prediction(&prediction));
    Ok(())
}

pub fn cmd_batch(
    engine: &ClassificationEngine,
    config: &ClarityConfig,
    file: &Path,
    json: bool,
) -> Result<()> {
    let response = run_batch(engine, config, file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    for item in &response.results {
        match (&item.prediction, &item.error) {
            (Some(prediction), _) => {
                println!("{:>5}  {}", item.index, format_prediction(prediction))
            }
            (None, Some(error)) => println!("{:>5}  ❌ {}", item.index, error),
            (None, None) => {}
        }
    }
    println!();
    println!(
        "📊 {} transactions: {} classified, {} failed",
        response.summary.total, response.summary.successful, response.summary.failed
    );
    Ok(())
}

/// Read a file and classify it, enforcing the configured batch limit
pub fn run_batch(
    engine: &ClassificationEngine,
    config: &ClarityConfig,
    file: &Path,
) -> Result<BatchResponse> {
    let records = read_records(file)
        .with_context(|| format!("Failed to read transactions from {}", file.display()))?;
    check_batch_size(records.len(), config.batch.max_size)?;
    Ok(classify_batch(engine, records))
}

/// One-line summary: category, confidence and how it was reached
pub fn format_prediction(prediction: &PredictionResult) -> String {
    format!(
        "{:<12} {:>5.1}%  ({})",
        prediction.category,
        prediction.confidence * 100.0,
        prediction.method
    )
}
