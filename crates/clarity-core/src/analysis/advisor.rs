//! Optimization advice for discretionary categories

use std::collections::BTreeMap;

use crate::config::AnalysisConfig;

use super::ledger::{category_of, Ledger};
use super::mandatory::MandatorySummary;
use super::stats::{round_to, round_whole};

/// One suggested reduction
#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub category: String,
    /// Average monthly spend
    pub monthly_average: f64,
    pub potential_saving: f64,
}

impl Advice {
    /// Whole-unit monthly spend as reported
    pub fn current_spend(&self) -> f64 {
        round_whole(self.monthly_average)
    }

    pub fn action(&self) -> String {
        format!(
            "Category '{}' takes {} per month.",
            self.category, self.monthly_average as i64
        )
    }

    pub fn recommendation(&self, cut_rate: f64) -> String {
        format!(
            "Cut by {}% (+{}).",
            (cut_rate * 100.0).round() as i64,
            self.potential_saving as i64
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct OptimizationAdvisor {
    config: AnalysisConfig,
}

impl OptimizationAdvisor {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn cut_rate(&self) -> f64 {
        self.config.advice_cut_rate
    }

    /// Non-mandatory categories whose monthly spend exceeds the income share,
    /// largest total first
    pub fn advise(&self, ledger: &Ledger, mandatory: &MandatorySummary) -> Vec<Advice> {
        let months = ledger.distinct_months();
        if !ledger.has_expenses() || months == 0 {
            return Vec::new();
        }

        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for tx in ledger.expenses() {
            *totals.entry(category_of(tx)).or_insert(0.0) += tx.amount;
        }

        let mut ranked: Vec<(&str, f64)> = totals
            .into_iter()
            .map(|(category, total)| (category, total.abs()))
            .collect();
        // BTreeMap order already sorts names, so a stable sort keeps ties by name
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let threshold = self.config.advice_income_share * ledger.monthly_income();
        ranked
            .into_iter()
            .filter(|(category, _)| !mandatory.contains(category))
            .filter_map(|(category, total)| {
                let avg = total / months as f64;
                (avg > threshold).then(|| Advice {
                    category: category.to_string(),
                    monthly_average: avg,
                    potential_saving: round_to(avg * self.config.advice_cut_rate, 2),
                })
            })
            .collect()
    }
}
