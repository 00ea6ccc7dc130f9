//! Analysis orchestrator
//!
//! Runs the stages in order over one request's transactions:
//! ledger -> mandatory -> cushion -> forecast -> health -> advice.
//! Transactions without a category are classified first.

use tracing::debug;

use crate::classifier::ClassificationEngine;
use crate::config::{AnalysisConfig, ClarityConfig, ForecastConfig};
use crate::error::{Error, Result};
use crate::models::{validate_records, Transaction, TransactionRecord};

use super::advisor::OptimizationAdvisor;
use super::cushion::CushionCalculator;
use super::forecast::ExpenseForecaster;
use super::health::score_budget;
use super::ledger::Ledger;
use super::mandatory::MandatoryDetector;
use super::stats::{round_to, round_whole};
use super::types::{
    AnalysisReport, BudgetHealth, FinancialCushion, MandatoryExpenses, Metrics, MlForecast,
    OptimizationAdvice,
};

pub struct Analyzer {
    classifier: ClassificationEngine,
    detector: MandatoryDetector,
    cushion: CushionCalculator,
    forecaster: ExpenseForecaster,
    advisor: OptimizationAdvisor,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(
            ClassificationEngine::default(),
            AnalysisConfig::default(),
            ForecastConfig::default(),
        )
    }
}

impl Analyzer {
    pub fn new(
        classifier: ClassificationEngine,
        analysis: AnalysisConfig,
        forecast: ForecastConfig,
    ) -> Self {
        Self {
            classifier,
            detector: MandatoryDetector::new(analysis.clone()),
            cushion: CushionCalculator::new(analysis.clone()),
            forecaster: ExpenseForecaster::new(forecast),
            advisor: OptimizationAdvisor::new(analysis),
        }
    }

    pub fn from_config(classifier: ClassificationEngine, config: &ClarityConfig) -> Self {
        Self::new(classifier, config.analysis.clone(), config.forecast.clone())
    }

    /// Validate raw records, then analyze them
    pub fn analyze_records(&self, records: Vec<TransactionRecord>) -> Result<AnalysisReport> {
        if records.is_empty() {
            return Err(no_data());
        }
        self.analyze(validate_records(records)?)
    }

    pub fn analyze(&self, transactions: Vec<Transaction>) -> Result<AnalysisReport> {
        if transactions.is_empty() {
            return Err(no_data());
        }

        let transactions: Vec<Transaction> = transactions
            .into_iter()
            .map(|tx| {
                if tx.category.is_some() {
                    tx
                } else {
                    let category = self.classifier.classify(&tx).category;
                    tx.with_category(category)
                }
            })
            .collect();

        let ledger = Ledger::new(transactions);
        let monthly_income = ledger.monthly_income();
        let monthly_expense = ledger.monthly_expense();
        debug!(monthly_income, monthly_expense, "Ledger aggregated");

        let mandatory = self.detector.detect(&ledger);
        debug!(
            categories = ?mandatory.categories,
            amount = mandatory.monthly_amount,
            "Mandatory expenses"
        );

        let cushion = self.cushion.calculate(&ledger, mandatory.monthly_amount);
        let forecast = self.forecaster.forecast(&ledger);
        let health = score_budget(monthly_income, monthly_expense);
        let advice = self.advisor.advise(&ledger, &mandatory);

        let balance = ledger.balance();
        let progress = if cushion.target_amount > 0.0 {
            100.0 * balance / cushion.target_amount
        } else {
            0.0
        };

        let cut_rate = self.advisor.cut_rate();
        Ok(AnalysisReport {
            budget_health: BudgetHealth {
                score: health.score,
                status: health.status,
                saved_percent: round_to(health.saved_percent, 1),
                spent_percent: round_to(health.spent_percent, 1),
                description: format!(
                    "You spend {}% and save {}%. Rating: {}/100.",
                    health.spent_percent as i64, health.saved_percent as i64, health.score
                ),
            },
            ml_forecast: MlForecast {
                predicted_expense_next_month: forecast.predicted_expense_next_month,
                model_used: forecast.model_used,
            },
            financial_cushion: FinancialCushion {
                target_amount: cushion.target_amount,
                current_amount: round_whole(balance),
                progress_percent: round_to(progress, 1),
                months_target: cushion.months_target,
                risk_label: cushion.risk.label().to_string(),
                reasoning: format!("Target: {} months.", cushion.months_target),
            },
            metrics: Metrics {
                monthly_income: monthly_income as i64,
                monthly_expense: monthly_expense as i64,
            },
            mandatory_expenses: MandatoryExpenses {
                total: round_whole(mandatory.monthly_amount),
                categories: mandatory.categories,
            },
            optimization_plan: advice
                .iter()
                .map(|a| OptimizationAdvice {
                    category: a.category.clone(),
                    current_spend: a.current_spend(),
                    potential_saving: a.potential_saving,
                    action: a.action(),
                    recommendation: a.recommendation(cut_rate),
                })
                .collect(),
        })
    }
}

fn no_data() -> Error {
    Error::Validation("No transactions to analyze".into())
}
