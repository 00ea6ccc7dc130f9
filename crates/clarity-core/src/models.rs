//! Domain models for Clarity

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated bank transaction
///
/// The sign of `amount` decides the side of the ledger: positive is income,
/// negative is expense, zero belongs to neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: f64,
    /// Free-form bank reference (ref_no on the wire)
    #[serde(default, alias = "ref_no")]
    pub reference_text: String,
    /// Spending category; classified on demand when absent
    #[serde(default)]
    pub category: Option<String>,
    /// Caller-provided hint that the expense is obligatory (rent, loan...)
    #[serde(default, alias = "is_essential")]
    pub is_mandatory: bool,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: f64, reference_text: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            reference_text: reference_text.into(),
            category: None,
            is_mandatory: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.is_mandatory = true;
        self
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

/// Raw, unvalidated transaction as it arrives from an API body or a file
///
/// Every field is optional so that a missing field becomes a validation
/// error with a useful message instead of a deserialization failure for the
/// whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, alias = "ref_no")]
    pub reference_text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "is_essential")]
    pub is_mandatory: Option<bool>,
}

impl TransactionRecord {
    pub fn new(date: &str, amount: f64, reference_text: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            amount: Some(amount),
            reference_text: Some(reference_text.to_string()),
            ..Default::default()
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(record: TransactionRecord) -> Result<Self> {
        let date_str = record
            .date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Validation("Missing date".into()))?;
        let date = parse_date(date_str)?;

        let amount = record
            .amount
            .ok_or_else(|| Error::Validation("Missing amount".into()))?;
        if !amount.is_finite() {
            return Err(Error::Validation(format!("Invalid amount: {}", amount)));
        }

        let category = record
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            date,
            amount,
            reference_text: record.reference_text.unwrap_or_default(),
            category,
            is_mandatory: record.is_mandatory.unwrap_or(false),
        })
    }
}

/// Validate a whole list of records, failing on the first bad one
pub fn validate_records(records: Vec<TransactionRecord>) -> Result<Vec<Transaction>> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            Transaction::try_from(r)
                .map_err(|e| Error::Validation(format!("transaction {}: {}", i, strip_prefix(&e))))
        })
        .collect()
}

fn strip_prefix(e: &Error) -> String {
    match e {
        Error::Validation(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Parse a transaction date
///
/// Accepts plain `YYYY-MM-DD` and RFC 3339 timestamps such as
/// `2025-12-09T00:00:00Z`; for timestamps the UTC calendar date is used.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.naive_utc().date());
    }
    if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts.date());
    }
    Err(Error::Validation(format!("Invalid date: {}", s)))
}

/// How a prediction was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    /// Deterministic rule matched
    Rule,
    /// Statistical model produced the label
    Ml,
    /// Statistical path was requested but no model is loaded
    MlFallback,
    /// Statistical model misconfigured or failed at inference
    MlError,
    /// No rule matched and the statistical path was not used
    Fallback,
}

impl PredictionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Ml => "ml",
            Self::MlFallback => "ml_fallback",
            Self::MlError => "ml_error",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PredictionMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rule" => Ok(Self::Rule),
            "ml" => Ok(Self::Ml),
            "ml_fallback" => Ok(Self::MlFallback),
            "ml_error" => Ok(Self::MlError),
            "fallback" => Ok(Self::Fallback),
            _ => Err(format!("Unknown prediction method: {}", s)),
        }
    }
}

/// Category assigned to one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub category: String,
    /// Always within [0, 1]
    pub confidence: f64,
    pub method: PredictionMethod,
    pub is_rule_based: bool,
}

impl PredictionResult {
    pub fn rule(category: impl Into<String>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            confidence: confidence.clamp(0.0, 1.0),
            method: PredictionMethod::Rule,
            is_rule_based: true,
        }
    }

    pub fn statistical(
        category: impl Into<String>,
        confidence: f64,
        method: PredictionMethod,
    ) -> Self {
        Self {
            category: category.into(),
            confidence: confidence.clamp(0.0, 1.0),
            method,
            is_rule_based: false,
        }
    }
}
