//! Analysis report wire types

use serde::{Deserialize, Serialize};

use super::health::HealthStatus;

/// Complete financial-health report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub budget_health: BudgetHealth,
    pub ml_forecast: MlForecast,
    pub financial_cushion: FinancialCushion,
    pub metrics: Metrics,
    pub mandatory_expenses: MandatoryExpenses,
    pub optimization_plan: Vec<OptimizationAdvice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetHealth {
    /// 0-100
    pub score: u32,
    pub status: HealthStatus,
    pub saved_percent: f64,
    pub spent_percent: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlForecast {
    pub predicted_expense_next_month: f64,
    /// `trend_seasonal` or `historical_mean`
    pub model_used: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialCushion {
    pub target_amount: f64,
    /// Current balance in whole units
    pub current_amount: f64,
    pub progress_percent: f64,
    pub months_target: u32,
    pub risk_label: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub monthly_income: i64,
    pub monthly_expense: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandatoryExpenses {
    pub total: f64,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationAdvice {
    pub category: String,
    pub current_spend: f64,
    pub potential_saving: f64,
    pub action: String,
    pub recommendation: String,
}
