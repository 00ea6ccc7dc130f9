//! Categorization handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;

use clarity_core::{
    check_batch_size, classify_batch, BatchResponse, PredictionResult, Transaction,
    TransactionRecord,
};

use crate::{AppError, AppState};

/// Response for the short categorization endpoint
#[derive(Debug, Serialize)]
pub struct CategorizeResponse {
    pub category: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: PredictionResult,
}

/// POST /categorize - Category and confidence for one transaction
pub async fn categorize(
    State(state): State<Arc<AppState>>,
    Json(record): Json<TransactionRecord>,
) -> Result<Json<CategorizeResponse>, AppError> {
    let prediction = classify_one(&state, record)?;
    Ok(Json(CategorizeResponse {
        category: prediction.category,
        confidence: prediction.confidence,
    }))
}

/// POST /predict - Full prediction including method and rule flag
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(record): Json<TransactionRecord>,
) -> Result<Json<PredictResponse>, AppError> {
    let prediction = classify_one(&state, record)?;
    Ok(Json(PredictResponse {
        success: true,
        prediction,
    }))
}

/// POST /batch_predict - Classify a list, isolating per-item failures
pub async fn batch_predict(
    State(state): State<Arc<AppState>>,
    Json(records): Json<Vec<TransactionRecord>>,
) -> Result<Json<BatchResponse>, AppError> {
    check_batch_size(records.len(), state.config.max_batch_size)?;

    let response = classify_batch(&state.engine, records);
    debug!(
        total = response.summary.total,
        failed = response.summary.failed,
        "Batch classified"
    );
    Ok(Json(response))
}

fn classify_one(
    state: &AppState,
    record: TransactionRecord,
) -> Result<PredictionResult, AppError> {
    let tx = Transaction::try_from(record)?;
    Ok(state.engine.classify(&tx))
}
