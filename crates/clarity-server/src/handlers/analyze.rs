//! Financial-health analysis handler

use std::sync::Arc;

use axum::{extract::State, Json};

use clarity_core::{AnalysisReport, TransactionRecord};

use crate::{AppError, AppState};

/// POST /analyze - Full financial-health report for a transaction list
///
/// The forecaster fits a regression over the whole history, so the work runs
/// on the blocking pool instead of a runtime worker.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(records): Json<Vec<TransactionRecord>>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = tokio::task::spawn_blocking(move || state.analyzer.analyze_records(records))
        .await??;
    Ok(Json(report))
}
