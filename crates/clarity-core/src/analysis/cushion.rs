//! Emergency-fund target sized to income volatility

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;

use super::ledger::Ledger;
use super::stats::{mean, sample_std};

/// How steady the income stream is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeRisk {
    NoIncome,
    HighVolatility,
    StableIncome,
}

impl IncomeRisk {
    pub fn label(&self) -> &'static str {
        match self {
            IncomeRisk::NoIncome => "no income",
            IncomeRisk::HighVolatility => "high volatility",
            IncomeRisk::StableIncome => "stable income",
        }
    }
}

impl fmt::Display for IncomeRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CushionTarget {
    /// Always a multiple of 100
    pub target_amount: f64,
    pub months_target: u32,
    pub risk: IncomeRisk,
}

#[derive(Debug, Clone, Default)]
pub struct CushionCalculator {
    config: AnalysisConfig,
}

impl CushionCalculator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, ledger: &Ledger, mandatory_monthly: f64) -> CushionTarget {
        if !ledger.has_income() {
            return CushionTarget {
                target_amount: 0.0,
                months_target: self.config.volatile_months,
                risk: IncomeRisk::NoIncome,
            };
        }

        let cv = income_variation(&ledger.monthly_income_sums());
        let (months_target, risk) = if cv > self.config.volatility_threshold {
            (self.config.volatile_months, IncomeRisk::HighVolatility)
        } else {
            (self.config.stable_months, IncomeRisk::StableIncome)
        };

        let monthly_expense = ledger.monthly_expense();
        let base = if mandatory_monthly > 0.0 {
            mandatory_monthly
        } else {
            monthly_expense * 0.5
        };
        let raw = base * months_target as f64 + monthly_expense * 0.5;
        debug!(cv, months_target, raw, "Cushion target");

        CushionTarget {
            target_amount: round_hundreds(raw),
            months_target,
            risk,
        }
    }
}

/// Coefficient of variation of monthly income; 0 with fewer than two months
fn income_variation(monthly: &[f64]) -> f64 {
    match (mean(monthly), sample_std(monthly)) {
        (Some(m), Some(s)) if m != 0.0 => s / m,
        _ => 0.0,
    }
}

/// Nearest multiple of 100, ties to even
fn round_hundreds(value: f64) -> f64 {
    (value / 100.0).round_ties_even() * 100.0
}
