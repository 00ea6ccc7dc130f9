//! Configuration for rules, analysis thresholds and the forecaster
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, else the override in the data dir
//!    (~/.local/share/clarity/config/clarity.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/clarity.toml");

/// Thresholds of the deterministic rule cascade
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    pub salary_min_amount: f64,
    /// Upper-case marker in the reference text that identifies payroll
    pub salary_marker: String,
    pub rent_min_amount: f64,
    pub rent_max_amount: f64,
    pub rent_max_day: u32,
    /// Exact amounts treated as fares and passes
    pub transport_amounts: Vec<f64>,
    pub food_min_amount: f64,
    pub food_max_amount: f64,
    /// Only fractional amounts count as food (split/rounded bill heuristic)
    pub food_requires_fractional: bool,
    pub shopping_min_amount: f64,
    pub shopping_max_amount: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            salary_min_amount: 5000.0,
            salary_marker: "CHAS".to_string(),
            rent_min_amount: -15000.0,
            rent_max_amount: -2000.0,
            rent_max_day: 7,
            transport_amounts: vec![-3062.0, -1718.0, -500.0, -100.0, -50.0, -200.0],
            food_min_amount: -500.0,
            food_max_amount: -10.0,
            food_requires_fractional: true,
            shopping_min_amount: -10000.0,
            shopping_max_amount: -100.0,
        }
    }
}

/// Thresholds used by the analysis pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Observations a category needs before its variance is trusted
    pub mandatory_min_observations: usize,
    /// Max stddev / |mean| for a category to count as a fixed payment
    pub mandatory_max_variation: f64,
    /// Income coefficient of variation above which income is volatile
    pub volatility_threshold: f64,
    pub volatile_months: u32,
    pub stable_months: u32,
    /// Share of monthly income a category must exceed to get advice
    pub advice_income_share: f64,
    /// Suggested reduction rate
    pub advice_cut_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mandatory_min_observations: 3,
            mandatory_max_variation: 0.1,
            volatility_threshold: 0.2,
            volatile_months: 6,
            stable_months: 3,
            advice_income_share: 0.05,
            advice_cut_rate: 0.15,
        }
    }
}

/// Expense forecaster settings
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Distinct expense days needed before a model is fitted
    pub min_days: usize,
    /// Days projected past the last observation
    pub horizon_days: u32,
    pub weekly_seasonality: bool,
    /// Fourier order of the weekly term (at most 3 for a 7-day period)
    pub fourier_order: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_days: 14,
            horizon_days: 30,
            weekly_seasonality: true,
            fourier_order: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Largest batch accepted by `classify_batch` callers
    pub max_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_size: 1000 }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClarityConfig {
    pub rules: RuleConfig,
    pub analysis: AnalysisConfig,
    pub forecast: ForecastConfig,
    pub batch: BatchConfig,
}

impl ClarityConfig {
    /// Load from an explicit path, the data-dir override, or the embedded default
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(p) => fs::read_to_string(p).map_err(|e| {
                Error::Config(format!("Failed to read config {}: {}", p.display(), e))
            })?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(p) => fs::read_to_string(&p)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?,
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// The embedded default configuration
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("clarity").join("config").join("clarity.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    rules: Option<RawRules>,
    analysis: Option<RawAnalysis>,
    forecast: Option<RawForecast>,
    batch: Option<RawBatch>,
}

#[derive(Debug, Deserialize)]
struct RawRules {
    salary_min_amount: Option<f64>,
    salary_marker: Option<String>,
    rent_min_amount: Option<f64>,
    rent_max_amount: Option<f64>,
    rent_max_day: Option<u32>,
    transport_amounts: Option<Vec<f64>>,
    food_min_amount: Option<f64>,
    food_max_amount: Option<f64>,
    food_requires_fractional: Option<bool>,
    shopping_min_amount: Option<f64>,
    shopping_max_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    mandatory_min_observations: Option<usize>,
    mandatory_max_variation: Option<f64>,
    volatility_threshold: Option<f64>,
    volatile_months: Option<u32>,
    stable_months: Option<u32>,
    advice_income_share: Option<f64>,
    advice_cut_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    min_days: Option<usize>,
    horizon_days: Option<u32>,
    weekly_seasonality: Option<bool>,
    fourier_order: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawBatch {
    max_size: Option<usize>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<ClarityConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = ClarityConfig::default();

    if let Some(r) = raw.rules {
        let rules = &mut config.rules;
        if let Some(v) = r.salary_min_amount {
            rules.salary_min_amount = v;
        }
        if let Some(v) = r.salary_marker {
            rules.salary_marker = v.to_uppercase();
        }
        if let Some(v) = r.rent_min_amount {
            rules.rent_min_amount = v;
        }
        if let Some(v) = r.rent_max_amount {
            rules.rent_max_amount = v;
        }
        if let Some(v) = r.rent_max_day {
            rules.rent_max_day = v;
        }
        if let Some(v) = r.transport_amounts {
            rules.transport_amounts = v;
        }
        if let Some(v) = r.food_min_amount {
            rules.food_min_amount = v;
        }
        if let Some(v) = r.food_max_amount {
            rules.food_max_amount = v;
        }
        if let Some(v) = r.food_requires_fractional {
            rules.food_requires_fractional = v;
        }
        if let Some(v) = r.shopping_min_amount {
            rules.shopping_min_amount = v;
        }
        if let Some(v) = r.shopping_max_amount {
            rules.shopping_max_amount = v;
        }
    }

    if let Some(a) = raw.analysis {
        let analysis = &mut config.analysis;
        if let Some(v) = a.mandatory_min_observations {
            analysis.mandatory_min_observations = v;
        }
        if let Some(v) = a.mandatory_max_variation {
            analysis.mandatory_max_variation = v;
        }
        if let Some(v) = a.volatility_threshold {
            analysis.volatility_threshold = v;
        }
        if let Some(v) = a.volatile_months {
            analysis.volatile_months = v;
        }
        if let Some(v) = a.stable_months {
            analysis.stable_months = v;
        }
        if let Some(v) = a.advice_income_share {
            analysis.advice_income_share = v;
        }
        if let Some(v) = a.advice_cut_rate {
            analysis.advice_cut_rate = v;
        }
    }

    if let Some(f) = raw.forecast {
        let forecast = &mut config.forecast;
        if let Some(v) = f.min_days {
            forecast.min_days = v;
        }
        if let Some(v) = f.horizon_days {
            forecast.horizon_days = v;
        }
        if let Some(v) = f.weekly_seasonality {
            forecast.weekly_seasonality = v;
        }
        if let Some(v) = f.fourier_order {
            forecast.fourier_order = v;
        }
    }

    if let Some(b) = raw.batch {
        if let Some(v) = b.max_size {
            config.batch.max_size = v;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &ClarityConfig) -> Result<()> {
    if config.forecast.horizon_days == 0 {
        return Err(Error::Config("forecast.horizon_days must be positive".into()));
    }
    if config.forecast.fourier_order > 3 {
        return Err(Error::Config(format!(
            "forecast.fourier_order must be at most 3, got {}",
            config.forecast.fourier_order
        )));
    }
    if config.batch.max_size == 0 {
        return Err(Error::Config("batch.max_size must be positive".into()));
    }
    if !(0.0..=1.0).contains(&config.analysis.advice_cut_rate) {
        return Err(Error::Config("analysis.advice_cut_rate must be within [0, 1]".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ClarityConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [rules]
            food_requires_fractional = false
            salary_marker = "payroll"

            [forecast]
            min_days = 21
            "#,
        )
        .unwrap();

        assert!(!config.rules.food_requires_fractional);
        assert_eq!(config.rules.salary_marker, "PAYROLL");
        assert_eq!(config.rules.rent_max_day, 7);
        assert_eq!(config.forecast.min_days, 21);
        assert_eq!(config.forecast.horizon_days, 30);
        assert_eq!(config.batch.max_size, 1000);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), ClarityConfig::default());
    }

    #[test]
    fn test_invalid_fourier_order_rejected() {
        let err = parse_config("[forecast]\nfourier_order = 4\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(parse_config("[rules\n").is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch]\nmax_size = 10").unwrap();

        let config = ClarityConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.batch.max_size, 10);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = ClarityConfig::load(Some(Path::new("/nonexistent/clarity.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
