//! Next-month expense forecast
//!
//! Daily absolute expense totals are fitted with a `SeasonalModel` and
//! projected `horizon_days` past the last observed day. Short histories and
//! any fit failure fall back to the historical monthly mean.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, warn};

use crate::config::ForecastConfig;
use crate::error::{Error, Result};

use super::ledger::Ledger;
use super::stats::round_to;

/// `model_used` value when no time-series model was applied
pub const HISTORICAL_MEAN: &str = "historical_mean";

const WEEK_DAYS: f64 = 7.0;
/// Diagonal shrinkage on non-intercept terms keeps the normal equations
/// solvable when some weekdays never occur
const RIDGE: f64 = 1e-8;

/// Time-series fitting capability
pub trait SeasonalModel: Send + Sync {
    /// Value reported as `model_used`
    fn name(&self) -> &str;

    /// Fit `history` and predict a value for each of `days`
    fn fit_predict(&self, history: &[(NaiveDate, f64)], days: &[NaiveDate]) -> Result<Vec<f64>>;
}

/// Least-squares intercept + linear trend + weekly Fourier terms
#[derive(Debug, Clone)]
pub struct TrendSeasonalModel {
    weekly_seasonality: bool,
    fourier_order: usize,
}

impl Default for TrendSeasonalModel {
    fn default() -> Self {
        Self {
            weekly_seasonality: true,
            fourier_order: 3,
        }
    }
}

impl TrendSeasonalModel {
    pub fn new(weekly_seasonality: bool, fourier_order: usize) -> Self {
        Self {
            weekly_seasonality,
            fourier_order,
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.weekly_seasonality, config.fourier_order)
    }

    fn n_params(&self) -> usize {
        if self.weekly_seasonality {
            2 + 2 * self.fourier_order
        } else {
            2
        }
    }

    fn design_row(&self, day: NaiveDate, origin: NaiveDate, span: f64) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.n_params());
        row.push(1.0);
        row.push((day - origin).num_days() as f64 / span);
        if self.weekly_seasonality {
            let x = day.num_days_from_ce() as f64;
            for k in 1..=self.fourier_order {
                let angle = 2.0 * PI * k as f64 * x / WEEK_DAYS;
                row.push(angle.sin());
                row.push(angle.cos());
            }
        }
        row
    }
}

impl SeasonalModel for TrendSeasonalModel {
    fn name(&self) -> &str {
        "trend_seasonal"
    }

    fn fit_predict(&self, history: &[(NaiveDate, f64)], days: &[NaiveDate]) -> Result<Vec<f64>> {
        let p = self.n_params();
        if history.len() < p {
            return Err(Error::Forecast(format!(
                "{} points cannot fit {} parameters",
                history.len(),
                p
            )));
        }

        let origin = history
            .iter()
            .map(|(d, _)| *d)
            .min()
            .ok_or_else(|| Error::Forecast("Empty history".into()))?;
        let last = history.iter().map(|(d, _)| *d).max().unwrap_or(origin);
        let span = ((last - origin).num_days() as f64).max(1.0);

        // Normal equations X'X b = X'y
        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for (day, value) in history {
            let row = self.design_row(*day, origin, span);
            for i in 0..p {
                xty[i] += row[i] * value;
                for j in 0..p {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }
        for (i, r) in xtx.iter_mut().enumerate().skip(1) {
            r[i] += RIDGE * history.len() as f64;
        }

        let coef = solve(xtx, xty)?;

        days.iter()
            .map(|day| {
                let row = self.design_row(*day, origin, span);
                let y: f64 = row.iter().zip(&coef).map(|(x, b)| x * b).sum();
                if y.is_finite() {
                    Ok(y)
                } else {
                    Err(Error::Forecast(format!("Non-finite prediction for {}", day)))
                }
            })
            .collect()
    }
}

/// Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .ok_or_else(|| Error::Forecast("Empty system".into()))?;
        if a[pivot][col].abs() < 1e-12 {
            return Err(Error::Forecast("Singular design matrix".into()));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

/// Days following `last`, failing when the calendar runs out
fn horizon(last: NaiveDate, days: u32) -> Result<Vec<NaiveDate>> {
    (1..=i64::from(days))
        .map(|d| {
            last.checked_add_signed(Duration::days(d)).ok_or_else(|| {
                Error::Forecast(format!("Horizon of {} days past {} is out of range", days, last))
            })
        })
        .collect()
}

/// Forecast outcome
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForecast {
    /// Non-negative, rounded to 2 decimals
    pub predicted_expense_next_month: f64,
    pub model_used: String,
}

impl ExpenseForecast {
    fn historical(ledger: &Ledger) -> Self {
        Self {
            predicted_expense_next_month: round_to(ledger.monthly_expense(), 2),
            model_used: HISTORICAL_MEAN.to_string(),
        }
    }
}

pub struct ExpenseForecaster<M: SeasonalModel = TrendSeasonalModel> {
    config: ForecastConfig,
    model: M,
}

impl ExpenseForecaster {
    pub fn new(config: ForecastConfig) -> Self {
        let model = TrendSeasonalModel::from_config(&config);
        Self { config, model }
    }
}

impl Default for ExpenseForecaster {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

impl<M: SeasonalModel> ExpenseForecaster<M> {
    pub fn with_model(config: ForecastConfig, model: M) -> Self {
        Self { config, model }
    }

    pub fn forecast(&self, ledger: &Ledger) -> ExpenseForecast {
        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for tx in ledger.expenses() {
            *daily.entry(tx.date).or_insert(0.0) += tx.amount.abs();
        }

        let Some(last) = daily.keys().next_back().copied() else {
            return ExpenseForecast {
                predicted_expense_next_month: 0.0,
                model_used: HISTORICAL_MEAN.to_string(),
            };
        };

        if daily.len() < self.config.min_days {
            debug!(days = daily.len(), "Too few expense days, using historical mean");
            return ExpenseForecast::historical(ledger);
        }

        let history: Vec<(NaiveDate, f64)> = daily.into_iter().collect();
        let projection = horizon(last, self.config.horizon_days)
            .and_then(|future| self.model.fit_predict(&history, &future));

        match projection {
            Ok(predictions) => {
                let total: f64 = predictions.iter().sum();
                debug!(total, days = predictions.len(), "Expense forecast");
                ExpenseForecast {
                    predicted_expense_next_month: round_to(total.max(0.0), 2),
                    model_used: self.model.name().to_string(),
                }
            }
            Err(e) => {
                warn!("Forecast failed, using historical mean: {}", e);
                ExpenseForecast::historical(ledger)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;

    fn day(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(i)
    }

    fn ledger_from(values: impl IntoIterator<Item = (i64, f64)>) -> Ledger {
        Ledger::new(
            values
                .into_iter()
                .map(|(i, v)| Transaction::new(day(i), -v, ""))
                .collect(),
        )
    }

    struct BrokenModel;

    impl SeasonalModel for BrokenModel {
        fn name(&self) -> &str {
            "broken"
        }

        fn fit_predict(&self, _: &[(NaiveDate, f64)], _: &[NaiveDate]) -> Result<Vec<f64>> {
            Err(Error::Forecast("did not converge".into()))
        }
    }

    #[test]
    fn test_no_expenses_is_zero() {
        let ledger = Ledger::new(vec![Transaction::new(day(0), 5000.0, "")]);
        let forecast = ExpenseForecaster::default().forecast(&ledger);
        assert_eq!(forecast.predicted_expense_next_month, 0.0);
    }

    #[test]
    fn test_short_history_uses_monthly_mean() {
        // 10 distinct days in January
        let ledger = ledger_from((0..10).map(|i| (i, 33.333)));
        let forecast = ExpenseForecaster::default().forecast(&ledger);

        assert_eq!(forecast.model_used, HISTORICAL_MEAN);
        assert_eq!(forecast.predicted_expense_next_month, 333.33);
    }

    #[test]
    fn test_min_days_boundary() {
        let forecaster = ExpenseForecaster::default();

        let forecast = forecaster.forecast(&ledger_from((0..13).map(|i| (i, 10.0))));
        assert_eq!(forecast.model_used, HISTORICAL_MEAN);
        assert_eq!(forecast.predicted_expense_next_month, 130.0);

        let forecast = forecaster.forecast(&ledger_from((0..14).map(|i| (i, 10.0))));
        assert_eq!(forecast.model_used, "trend_seasonal");
        assert!((forecast.predicted_expense_next_month - 300.0).abs() < 0.01);
    }

    #[test]
    fn test_horizon_past_calendar_end_falls_back() {
        // Last 20 days of the latest representable year
        let ledger = Ledger::new(
            (0..20)
                .map(|i| Transaction::new(NaiveDate::MAX - Duration::days(i), -10.0, ""))
                .collect(),
        );
        let forecast = ExpenseForecaster::default().forecast(&ledger);

        assert_eq!(forecast.model_used, HISTORICAL_MEAN);
        assert_eq!(forecast.predicted_expense_next_month, 200.0);
    }

    #[test]
    fn test_horizon_days() {
        let last = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        let days = horizon(last, 3).unwrap();
        assert_eq!(days.first(), NaiveDate::from_ymd_opt(2025, 2, 28).as_ref());
        assert_eq!(days.last(), NaiveDate::from_ymd_opt(2025, 3, 2).as_ref());
        assert!(horizon(NaiveDate::MAX, 1).is_err());
    }

    #[test]
    fn test_constant_spend_projects_horizon() {
        let ledger = ledger_from((0..28).map(|i| (i, 100.0)));
        let forecast = ExpenseForecaster::default().forecast(&ledger);

        assert_eq!(forecast.model_used, "trend_seasonal");
        assert!((forecast.predicted_expense_next_month - 3000.0).abs() < 0.01);
    }

    #[test]
    fn test_sum_covers_only_days_after_history() {
        // Linear growth: 100 + 10 i for i in 0..28, projected over i = 28..58
        let ledger = ledger_from((0..28).map(|i| (i, 100.0 + 10.0 * i as f64)));
        let forecast = ExpenseForecaster::default().forecast(&ledger);

        assert!((forecast.predicted_expense_next_month - 15750.0).abs() < 0.5);
    }

    #[test]
    fn test_weekly_pattern_is_learned() {
        // Weekend-heavy spending over four weeks
        let ledger = ledger_from((0..28).map(|i| {
            let weekend = day(i).weekday().num_days_from_monday() >= 5;
            (i, if weekend { 500.0 } else { 100.0 })
        }));
        let config = ForecastConfig {
            horizon_days: 7,
            ..ForecastConfig::default()
        };
        let forecast = ExpenseForecaster::new(config).forecast(&ledger);

        // One full week: 5 weekdays + 2 weekend days
        assert!((forecast.predicted_expense_next_month - 1500.0).abs() < 0.5);
    }

    #[test]
    fn test_declining_trend_clamps_to_zero() {
        let ledger = ledger_from((0..15).map(|i| (i, 1000.0 - 70.0 * i as f64)));
        let forecast = ExpenseForecaster::default().forecast(&ledger);

        assert_eq!(forecast.predicted_expense_next_month, 0.0);
        assert_eq!(forecast.model_used, "trend_seasonal");
    }

    #[test]
    fn test_model_failure_falls_back() {
        let ledger = ledger_from((0..20).map(|i| (i, 10.0)));
        let forecaster = ExpenseForecaster::with_model(ForecastConfig::default(), BrokenModel);
        let forecast = forecaster.forecast(&ledger);

        assert_eq!(forecast.model_used, HISTORICAL_MEAN);
        assert_eq!(forecast.predicted_expense_next_month, 200.0);
    }

    #[test]
    fn test_solve_small_system() {
        let x = solve(vec![vec![2.0, 1.0], vec![1.0, 3.0]], vec![3.0, 5.0]).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
        assert!(solve(vec![vec![1.0, 2.0], vec![2.0, 4.0]], vec![1.0, 2.0]).is_err());
    }
}
