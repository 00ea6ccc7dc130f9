//! Classification engine: rule cascade first, statistical model second

use std::sync::Arc;

use tracing::debug;

use crate::config::RuleConfig;
use crate::model::ModelContext;
use crate::models::{PredictionMethod, PredictionResult, Transaction};

use super::rules::RuleCascade;
use super::statistical::{StatisticalClassifier, DEFAULT_CATEGORY, DEFAULT_CONFIDENCE};

/// Composes the rule cascade and the statistical classifier
///
/// `predict` never fails: every problem degrades to a result whose `method`
/// records what happened.
#[derive(Debug, Clone, Default)]
pub struct ClassificationEngine {
    rules: RuleCascade,
    statistical: StatisticalClassifier,
}

impl ClassificationEngine {
    pub fn new(rules: RuleConfig, model: Option<Arc<ModelContext>>) -> Self {
        Self {
            rules: RuleCascade::new(rules),
            statistical: StatisticalClassifier::new(model),
        }
    }

    /// Engine without a statistical model
    pub fn rules_only(rules: RuleConfig) -> Self {
        Self::new(rules, None)
    }

    pub fn model(&self) -> Option<&Arc<ModelContext>> {
        self.statistical.context()
    }

    pub fn has_model(&self) -> bool {
        self.model().is_some()
    }

    pub fn rules(&self) -> &RuleCascade {
        &self.rules
    }

    pub fn predict(&self, tx: &Transaction, allow_statistical_fallback: bool) -> PredictionResult {
        if let Some(rule) = self.rules.evaluate(tx) {
            debug!(rule = %rule, amount = tx.amount, "Rule matched");
            return PredictionResult::rule(rule.category(), rule.confidence());
        }

        if allow_statistical_fallback && self.has_model() {
            return self.statistical.classify(tx).into_prediction();
        }

        debug!(amount = tx.amount, "No rule matched, using default category");
        PredictionResult::statistical(
            DEFAULT_CATEGORY,
            DEFAULT_CONFIDENCE,
            PredictionMethod::Fallback,
        )
    }

    /// `predict` with the statistical fallback enabled
    pub fn classify(&self, tx: &Transaction) -> PredictionResult {
        self.predict(tx, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MockModel, ModelMetadata};
    use chrono::NaiveDate;

    fn tx(day: u32, amount: f64, reference: &str) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(2025, 3, day).unwrap(), amount, reference)
    }

    fn engine_with(model: MockModel) -> ClassificationEngine {
        let metadata = ModelMetadata {
            categories: vec![],
            feature_columns: vec!["Amount".into(), "Day".into()],
            category_mapping: [("0".to_string(), "Rent".to_string())].into_iter().collect(),
        };
        let ctx = ModelContext::new(Box::new(model), metadata).unwrap();
        ClassificationEngine::new(RuleConfig::default(), Some(Arc::new(ctx)))
    }

    #[test]
    fn test_rule_short_circuits_model() {
        let engine = engine_with(MockModel::failing(1, "must not be called"));
        let result = engine.classify(&tx(15, 6000.0, "X"));

        assert_eq!(result.category, "Salary");
        assert_eq!(result.confidence, 0.99);
        assert_eq!(result.method, PredictionMethod::Rule);
        assert!(result.is_rule_based);
    }

    #[test]
    fn test_transport_mid_month() {
        let result = ClassificationEngine::default().classify(&tx(15, -3062.0, ""));
        assert_eq!(result.category, "Transport");
        assert_eq!(result.confidence, 0.97);
    }

    #[test]
    fn test_unmatched_goes_to_model() {
        let engine = engine_with(MockModel::fixed(0, vec![0.64]));
        let result = engine.classify(&tx(3, -30000.0, "").mandatory());

        assert_eq!(result.category, "Rent");
        assert_eq!(result.method, PredictionMethod::Ml);
        assert!((result.confidence - 0.64).abs() < 1e-9);
        assert!(!result.is_rule_based);
    }

    #[test]
    fn test_fallback_disallowed() {
        let engine = engine_with(MockModel::fixed(0, vec![0.64]));
        let result = engine.predict(&tx(3, -30000.0, ""), false);

        assert_eq!(result.category, "Misc");
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.method, PredictionMethod::Fallback);
    }

    #[test]
    fn test_no_model_uses_fallback() {
        let result = ClassificationEngine::rules_only(RuleConfig::default())
            .classify(&tx(3, -30000.0, ""));
        assert_eq!(result.method, PredictionMethod::Fallback);
        assert_eq!(result.category, "Misc");
    }

    #[test]
    fn test_model_failure_never_raises() {
        let engine = engine_with(MockModel::failing(1, "corrupt"));
        let result = engine.classify(&tx(3, -30000.0, ""));
        assert_eq!(result.method, PredictionMethod::MlError);
        assert!((0.0..=1.0).contains(&result.confidence));
    }
}
