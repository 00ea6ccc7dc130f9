//! Batch classification
//!
//! Items are independent: a record that fails validation is reported at its
//! index and never aborts its siblings.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::ClassificationEngine;
use crate::error::{Error, Result};
use crate::models::{PredictionResult, Transaction, TransactionRecord};

/// Outcome for one record of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: usize,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub success: bool,
    pub results: Vec<BatchItem>,
    pub summary: BatchSummary,
}

/// Reject batches above the configured maximum
pub fn check_batch_size(len: usize, max_size: usize) -> Result<()> {
    if len > max_size {
        return Err(Error::Validation(format!("Too many transactions. Max: {}", max_size)));
    }
    Ok(())
}

/// Classify every record, isolating per-item failures
pub fn classify_batch(
    engine: &ClassificationEngine,
    records: Vec<TransactionRecord>,
) -> BatchResponse {
    let results: Vec<BatchItem> = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| match Transaction::try_from(record) {
            Ok(tx) => BatchItem {
                index,
                success: true,
                prediction: Some(engine.classify(&tx)),
                error: None,
            },
            Err(e) => {
                debug!(index, "Batch item rejected: {}", e);
                BatchItem {
                    index,
                    success: false,
                    prediction: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    let successful = results.iter().filter(|r| r.success).count();
    let summary = BatchSummary {
        total: results.len(),
        successful,
        failed: results.len() - successful,
    };

    BatchResponse {
        success: true,
        results,
        summary,
    }
}
