//! Health and model introspection handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Reported as the model name when only rules are active
const RULES_ONLY: &str = "RuleCascade";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub categories: Vec<String>,
    pub features_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub categories: Vec<String>,
    pub feature_columns: Vec<String>,
    pub category_mapping: BTreeMap<String, String>,
    pub rules: BTreeMap<String, String>,
}

/// GET /health - Liveness plus a summary of the loaded model
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let response = match state.model() {
        Some(model) => HealthResponse {
            status: "ok",
            model: model.model_name().to_string(),
            categories: model.categories().to_vec(),
            features_count: model.feature_columns().len(),
        },
        None => HealthResponse {
            status: "ok",
            model: RULES_ONLY.to_string(),
            categories: vec![],
            features_count: 0,
        },
    };
    Json(response)
}

/// GET /model_info - Categories, feature columns, class mapping and rules
pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfoResponse> {
    let rules = state.engine.rules().describe();

    let response = match state.model() {
        Some(model) => ModelInfoResponse {
            categories: model.categories().to_vec(),
            feature_columns: model.feature_names().to_vec(),
            category_mapping: model
                .category_mapping()
                .iter()
                .map(|(index, name)| (index.to_string(), name.clone()))
                .collect(),
            rules,
        },
        None => ModelInfoResponse {
            categories: vec![],
            feature_columns: vec![],
            category_mapping: BTreeMap::new(),
            rules,
        },
    };
    Json(response)
}
