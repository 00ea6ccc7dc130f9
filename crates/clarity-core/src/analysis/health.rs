//! Budget health score: the savings rate on a 0-100 scale

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Excellent,
    Stable,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 50 => HealthStatus::Excellent,
            s if s >= 20 => HealthStatus::Stable,
            s if s > 0 => HealthStatus::Warning,
            _ => HealthStatus::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Stable => "Stable",
            HealthStatus::Warning => "Warning",
            HealthStatus::Critical => "Critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthScore {
    pub score: u32,
    pub status: HealthStatus,
    pub spent_percent: f64,
    pub saved_percent: f64,
}

/// Score monthly spending against monthly income
pub fn score_budget(monthly_income: f64, monthly_expense: f64) -> HealthScore {
    let (spent_percent, saved_percent) = if monthly_income > 0.0 {
        let spent = 100.0 * monthly_expense / monthly_income;
        (spent, 100.0 - spent)
    } else {
        (100.0, 0.0)
    };

    let score = saved_percent.clamp(0.0, 100.0).trunc() as u32;
    HealthScore {
        score,
        status: HealthStatus::from_score(score),
        spent_percent,
        saved_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_income_is_excellent() {
        let h = score_budget(50000.0, 0.0);
        assert_eq!(h.spent_percent, 0.0);
        assert_eq!(h.saved_percent, 100.0);
        assert_eq!(h.score, 100);
        assert_eq!(h.status, HealthStatus::Excellent);
    }

    #[test]
    fn test_no_income_is_critical() {
        let h = score_budget(0.0, 1200.0);
        assert_eq!(h.spent_percent, 100.0);
        assert_eq!(h.saved_percent, 0.0);
        assert_eq!(h.score, 0);
        assert_eq!(h.status, HealthStatus::Critical);
    }

    #[test]
    fn test_overspending_clamps_score() {
        let h = score_budget(1000.0, 1500.0);
        assert_eq!(h.saved_percent, -50.0);
        assert_eq!(h.score, 0);
        assert_eq!(h.status, HealthStatus::Critical);
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(score_budget(100.0, 50.0).status, HealthStatus::Excellent);
        assert_eq!(score_budget(100.0, 60.5).status, HealthStatus::Stable);
        assert_eq!(score_budget(100.0, 80.0).status, HealthStatus::Stable);
        assert_eq!(score_budget(100.0, 99.5).status, HealthStatus::Critical);
        assert_eq!(score_budget(100.0, 95.0).status, HealthStatus::Warning);
        // 39.5 saved truncates to 39
        assert_eq!(score_budget(100.0, 60.5).score, 39);
    }
}
