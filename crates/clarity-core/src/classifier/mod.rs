//! Per-transaction categorization
//!
//! - `rules`: ordered deterministic predicates, first match wins
//! - `statistical`: pre-trained model fallback with explicit degradation
//! - `engine`: the single `predict` contract combining both

pub mod engine;
pub mod rules;
pub mod statistical;

pub use engine::ClassificationEngine;
pub use rules::{Rule, RuleCascade};
pub use statistical::{
    DegradationReason, StatisticalClassifier, StatisticalOutcome, DEFAULT_CATEGORY,
    DEFAULT_CONFIDENCE,
};
