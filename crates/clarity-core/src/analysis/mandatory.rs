//! Mandatory-expense detection
//!
//! A category is mandatory when its payments barely vary (at least
//! `mandatory_min_observations` payments with sample stddev below
//! `mandatory_max_variation` times the absolute mean), or when any of its
//! transactions carries the caller's `is_mandatory` flag.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::AnalysisConfig;

use super::ledger::{category_of, Ledger};
use super::stats::{mean, monthly_mean, sample_std};

/// Detected fixed monthly obligations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MandatorySummary {
    /// Absolute monthly mean over the mandatory categories
    pub monthly_amount: f64,
    /// Sorted category names
    pub categories: Vec<String>,
}

impl MandatorySummary {
    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MandatoryDetector {
    config: AnalysisConfig,
}

impl MandatoryDetector {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, ledger: &Ledger) -> MandatorySummary {
        if !ledger.has_expenses() {
            return MandatorySummary::default();
        }

        let mut by_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        let mut categories = BTreeSet::new();
        for tx in ledger.expenses() {
            let category = category_of(tx);
            by_category.entry(category).or_default().push(tx.amount);
            if tx.is_mandatory {
                categories.insert(category);
            }
        }

        for (category, amounts) in &by_category {
            if self.is_low_variance(amounts) {
                debug!(category, payments = amounts.len(), "Low-variance category");
                categories.insert(*category);
            }
        }

        let monthly_amount = monthly_mean(
            ledger
                .expenses()
                .filter(|t| categories.contains(category_of(t)))
                .map(|t| (t.date, t.amount)),
        )
        .abs();

        MandatorySummary {
            monthly_amount,
            categories: categories.into_iter().map(String::from).collect(),
        }
    }

    fn is_low_variance(&self, amounts: &[f64]) -> bool {
        if amounts.len() < self.config.mandatory_min_observations {
            return false;
        }
        match (mean(amounts), sample_std(amounts)) {
            (Some(m), Some(s)) => s < self.config.mandatory_max_variation * m.abs(),
            // A single observation has no spread
            (Some(m), None) => 0.0 < self.config.mandatory_max_variation * m.abs(),
            _ => false,
        }
    }
}
