//! Feature encoding for the statistical classifier
//!
//! `FeatureVector` is a fixed struct built from one transaction. Models name
//! the columns they were trained on; those names are resolved to `Feature`
//! values once, when the model is loaded, so an unknown column fails fast
//! instead of silently becoming zero at inference time.

use chrono::Datelike;

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Reference marker that flags payroll transfers
const SALARY_MARKER: &str = "CHAS";
/// Reference marker produced when a numeric account id was exported in
/// scientific notation
const SCIENTIFIC_MARKER: &str = "E+11";

/// Every feature the encoder can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Amount,
    AmountAbs,
    IsPositive,
    IsNegative,
    IsLargePositive,
    IsMediumNegative,
    IsSmallNegative,
    Month,
    Day,
    DayOfWeek,
    IsFirstWeek,
    IsWeekend,
    HasChas,
    HasE11,
}

impl Feature {
    /// Column name as written in model metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "Amount",
            Self::AmountAbs => "Amount_Abs",
            Self::IsPositive => "Is_Positive",
            Self::IsNegative => "Is_Negative",
            Self::IsLargePositive => "Is_Large_Positive",
            Self::IsMediumNegative => "Is_Medium_Negative",
            Self::IsSmallNegative => "Is_Small_Negative",
            Self::Month => "Month",
            Self::Day => "Day",
            Self::DayOfWeek => "DayOfWeek",
            Self::IsFirstWeek => "Is_FirstWeek",
            Self::IsWeekend => "Is_Weekend",
            Self::HasChas => "Has_CHAS",
            Self::HasE11 => "Has_E11",
        }
    }

    pub fn all() -> &'static [Feature] {
        &[
            Self::Amount,
            Self::AmountAbs,
            Self::IsPositive,
            Self::IsNegative,
            Self::IsLargePositive,
            Self::IsMediumNegative,
            Self::IsSmallNegative,
            Self::Month,
            Self::Day,
            Self::DayOfWeek,
            Self::IsFirstWeek,
            Self::IsWeekend,
            Self::HasChas,
            Self::HasE11,
        ]
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Feature::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Unknown feature: {}", s))
    }
}

/// Resolve the model's ordered column names against the encoder
pub fn resolve_columns(names: &[String]) -> Result<Vec<Feature>> {
    names
        .iter()
        .map(|name| name.parse::<Feature>().map_err(Error::ModelLoad))
        .collect()
}

/// Numeric description of one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub amount: f64,
    pub amount_abs: f64,
    pub is_positive: bool,
    pub is_negative: bool,
    pub is_large_positive: bool,
    pub is_medium_negative: bool,
    pub is_small_negative: bool,
    pub month: u32,
    pub day: u32,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    pub is_first_week: bool,
    pub is_weekend: bool,
    pub has_chas: bool,
    pub has_e11: bool,
}

impl FeatureVector {
    pub fn from_transaction(tx: &Transaction) -> Self {
        let amount = tx.amount;
        let reference = tx.reference_text.to_uppercase();
        let day_of_week = tx.date.weekday().num_days_from_monday();

        Self {
            amount,
            amount_abs: amount.abs(),
            is_positive: amount > 0.0,
            is_negative: amount < 0.0,
            is_large_positive: amount > 5000.0,
            is_medium_negative: -10000.0 < amount && amount < -100.0,
            is_small_negative: -500.0 < amount && amount < 0.0,
            month: tx.date.month(),
            day: tx.date.day(),
            day_of_week,
            is_first_week: tx.date.day() <= 7,
            is_weekend: day_of_week >= 5,
            has_chas: reference.contains(SALARY_MARKER),
            has_e11: reference.contains(SCIENTIFIC_MARKER),
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match feature {
            Feature::Amount => self.amount,
            Feature::AmountAbs => self.amount_abs,
            Feature::IsPositive => flag(self.is_positive),
            Feature::IsNegative => flag(self.is_negative),
            Feature::IsLargePositive => flag(self.is_large_positive),
            Feature::IsMediumNegative => flag(self.is_medium_negative),
            Feature::IsSmallNegative => flag(self.is_small_negative),
            Feature::Month => self.month as f64,
            Feature::Day => self.day as f64,
            Feature::DayOfWeek => self.day_of_week as f64,
            Feature::IsFirstWeek => flag(self.is_first_week),
            Feature::IsWeekend => flag(self.is_weekend),
            Feature::HasChas => flag(self.has_chas),
            Feature::HasE11 => flag(self.has_e11),
        }
    }

    /// Values in the given column order
    pub fn project(&self, columns: &[Feature]) -> Vec<f64> {
        columns.iter().map(|f| self.get(*f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(y: i32, m: u32, d: u32, amount: f64, reference: &str) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), amount, reference)
    }

    #[test]
    fn test_feature_names_round_trip() {
        for feature in Feature::all() {
            assert_eq!(feature.as_str().parse::<Feature>().unwrap(), *feature);
        }
        assert!("Amount_Squared".parse::<Feature>().is_err());
    }

    #[test]
    fn test_encode_weekend_expense() {
        // 2025-03-02 is a Sunday
        let v = FeatureVector::from_transaction(&tx(2025, 3, 2, -250.5, "pos e+11 card"));

        assert_eq!(v.amount_abs, 250.5);
        assert!(v.is_negative && !v.is_positive);
        assert!(v.is_medium_negative);
        assert!(v.is_small_negative);
        assert_eq!(v.day_of_week, 6);
        assert!(v.is_weekend);
        assert!(v.is_first_week);
        assert!(v.has_e11);
        assert!(!v.has_chas);
    }

    #[test]
    fn test_encode_salary() {
        // 2025-01-15 is a Wednesday
        let v = FeatureVector::from_transaction(&tx(2025, 1, 15, 60000.0, "chase payroll"));

        assert!(v.is_large_positive);
        assert!(v.has_chas);
        assert_eq!(v.day_of_week, 2);
        assert!(!v.is_weekend);
        assert!(!v.is_first_week);
        assert_eq!(v.month, 1);
    }

    #[test]
    fn test_project_follows_column_order() {
        let v = FeatureVector::from_transaction(&tx(2025, 6, 20, -42.0, ""));
        let columns = resolve_columns(&["Day".to_string(), "Amount".to_string()]).unwrap();

        assert_eq!(v.project(&columns), vec![20.0, -42.0]);
    }

    #[test]
    fn test_resolve_unknown_column_fails() {
        let err = resolve_columns(&["Amount".to_string(), "Merchant_Id".to_string()]).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }
}
