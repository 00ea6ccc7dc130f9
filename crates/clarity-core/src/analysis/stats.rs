//! Small numeric helpers shared by the analysis stages

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

/// Calendar month bucket key
pub type MonthKey = (i32, u32);

pub fn month_key(date: NaiveDate) -> MonthKey {
    (date.year(), date.month())
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator); `None` below two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Sum amounts per calendar month, observed months only
pub fn monthly_sums<I>(entries: I) -> BTreeMap<MonthKey, f64>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut sums = BTreeMap::new();
    for (date, amount) in entries {
        *sums.entry(month_key(date)).or_insert(0.0) += amount;
    }
    sums
}

/// Mean of the monthly sums, 0.0 when there is nothing to average
pub fn monthly_mean<I>(entries: I) -> f64
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let sums: Vec<f64> = monthly_sums(entries).into_values().collect();
    mean(&sums).unwrap_or(0.0)
}

/// Round half to even at a number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Round half to even at whole units
pub fn round_whole(value: f64) -> f64 {
    value.round_ties_even()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_sample_std() {
        assert_eq!(sample_std(&[5.0]), None);
        let s = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn test_monthly_mean_skips_empty_months() {
        // January and March only; February is not zero-filled
        let mean = monthly_mean(vec![
            (d(2025, 1, 5), 100.0),
            (d(2025, 1, 20), 50.0),
            (d(2025, 3, 1), 250.0),
        ]);
        assert_eq!(mean, 200.0);
        assert_eq!(monthly_mean(Vec::new()), 0.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(-0.06, 1), -0.1);
        // Exact halves go to the even digit
        assert_eq!(round_to(0.25, 1), 0.2);
        assert_eq!(round_to(0.75, 1), 0.8);
        assert_eq!(round_to(-0.125, 2), -0.12);
        assert_eq!(round_whole(2.5), 2.0);
        assert_eq!(round_whole(3.5), 4.0);
    }
}
