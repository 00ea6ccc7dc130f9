//! Statistical fallback classifier
//!
//! Wraps the pre-trained categorical model. Every failure is turned into a
//! `StatisticalOutcome::Degraded` so callers never see an error.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::features::FeatureVector;
use crate::model::ModelContext;
use crate::models::{PredictionMethod, PredictionResult, Transaction};

/// Category used whenever nothing better is known
pub const DEFAULT_CATEGORY: &str = "Misc";
/// Confidence reported alongside the default category
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Why the model could not produce a prediction
#[derive(Debug, Clone, PartialEq)]
pub enum DegradationReason {
    /// No model was loaded
    NoModel,
    /// The model lists no feature columns
    NoFeatureColumns,
    /// The model failed or returned an unusable answer
    Inference(String),
}

impl DegradationReason {
    pub fn method(&self) -> PredictionMethod {
        match self {
            DegradationReason::NoModel => PredictionMethod::MlFallback,
            DegradationReason::NoFeatureColumns | DegradationReason::Inference(_) => {
                PredictionMethod::MlError
            }
        }
    }
}

impl std::fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradationReason::NoModel => write!(f, "no model loaded"),
            DegradationReason::NoFeatureColumns => write!(f, "model has no feature columns"),
            DegradationReason::Inference(msg) => write!(f, "inference failed: {}", msg),
        }
    }
}

/// Result of asking the model
#[derive(Debug, Clone, PartialEq)]
pub enum StatisticalOutcome {
    Predicted { category: String, confidence: f64 },
    Degraded(DegradationReason),
}

impl StatisticalOutcome {
    pub fn into_prediction(self) -> PredictionResult {
        match self {
            StatisticalOutcome::Predicted {
                category,
                confidence,
            } => PredictionResult::statistical(category, confidence, PredictionMethod::Ml),
            StatisticalOutcome::Degraded(reason) => PredictionResult::statistical(
                DEFAULT_CATEGORY,
                DEFAULT_CONFIDENCE,
                reason.method(),
            ),
        }
    }
}

/// Statistical classifier over an optional shared model
#[derive(Debug, Clone, Default)]
pub struct StatisticalClassifier {
    context: Option<Arc<ModelContext>>,
}

impl StatisticalClassifier {
    pub fn new(context: Option<Arc<ModelContext>>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> Option<&Arc<ModelContext>> {
        self.context.as_ref()
    }

    pub fn classify(&self, tx: &Transaction) -> StatisticalOutcome {
        let Some(ctx) = &self.context else {
            return StatisticalOutcome::Degraded(DegradationReason::NoModel);
        };

        if ctx.feature_columns().is_empty() {
            warn!("Statistical classification skipped: model has no feature columns");
            return StatisticalOutcome::Degraded(DegradationReason::NoFeatureColumns);
        }

        match infer(ctx, tx) {
            Ok((category, confidence)) => {
                debug!(category = %category, confidence, "Model prediction");
                StatisticalOutcome::Predicted {
                    category,
                    confidence,
                }
            }
            Err(e) => {
                warn!("Statistical classification failed: {}", e);
                StatisticalOutcome::Degraded(DegradationReason::Inference(e.to_string()))
            }
        }
    }
}

fn infer(ctx: &ModelContext, tx: &Transaction) -> Result<(String, f64)> {
    let features = FeatureVector::from_transaction(tx).project(ctx.feature_columns());

    let class = ctx.model().predict(&features)?;
    let proba = ctx.model().predict_proba(&features)?;

    let confidence = *proba.get(class).ok_or_else(|| {
        Error::Inference(format!(
            "Predicted class {} outside probability vector of {}",
            class,
            proba.len()
        ))
    })?;
    if !confidence.is_finite() {
        return Err(Error::Inference(format!("Non-finite probability {}", confidence)));
    }

    let category = ctx.category_for(class).unwrap_or(DEFAULT_CATEGORY).to_string();
    Ok((category, confidence.clamp(0.0, 1.0)))
}
