//! Financial-health analysis
//!
//! ## Stages
//!
//! - **Ledger** - income/expense split and calendar-month means
//! - **Mandatory** - low-variance and flagged recurring expenses
//! - **Cushion** - emergency-fund target sized to income volatility
//! - **Forecast** - trend + weekly seasonal projection of next month's spend
//! - **Health** - savings-rate score and status
//! - **Advisor** - ranked reduction advice for discretionary categories
//!
//! `Analyzer` runs them in that order and assembles an `AnalysisReport`.

pub mod advisor;
pub mod cushion;
pub mod engine;
pub mod forecast;
pub mod health;
pub mod ledger;
pub mod mandatory;
pub mod stats;
pub mod types;

pub use advisor::{Advice, OptimizationAdvisor};
pub use cushion::{CushionCalculator, CushionTarget, IncomeRisk};
pub use engine::Analyzer;
pub use forecast::{
    ExpenseForecast, ExpenseForecaster, SeasonalModel, TrendSeasonalModel, HISTORICAL_MEAN,
};
pub use health::{score_budget, HealthScore, HealthStatus};
pub use ledger::Ledger;
pub use mandatory::{MandatoryDetector, MandatorySummary};
pub use types::{
    AnalysisReport, BudgetHealth, FinancialCushion, MandatoryExpenses, Metrics, MlForecast,
    OptimizationAdvice,
};
