//! Clarity Core Library
//!
//! Transaction categorization and financial-health analysis:
//! - Feature encoding for the statistical classifier
//! - Deterministic rule cascade with a pre-trained model fallback
//! - Batch classification with per-item error isolation
//! - Ledger aggregation, mandatory-expense detection, savings cushion
//! - Trend + weekly seasonal expense forecasting
//! - Budget health scoring and optimization advice
//! - CSV/JSON transaction file readers

pub mod analysis;
pub mod batch;
pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod import;
pub mod model;
pub mod models;

pub use analysis::{AnalysisReport, Analyzer};
pub use batch::{check_batch_size, classify_batch, BatchItem, BatchResponse, BatchSummary};
pub use classifier::{ClassificationEngine, DegradationReason, RuleCascade, StatisticalOutcome};
pub use config::{AnalysisConfig, BatchConfig, ClarityConfig, ForecastConfig, RuleConfig};
pub use error::{Error, Result};
pub use features::{Feature, FeatureVector};
pub use model::{CategoricalModel, DecisionForest, MockModel, ModelContext, ModelMetadata};
pub use models::{PredictionMethod, PredictionResult, Transaction, TransactionRecord};
