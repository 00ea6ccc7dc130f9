//! Deterministic rule cascade
//!
//! Rules are evaluated strictly in order and the first match wins. A match
//! short-circuits the statistical model entirely.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;

use crate::config::RuleConfig;
use crate::models::Transaction;

/// Tolerance for matching exact fare amounts
const AMOUNT_EPSILON: f64 = 1e-9;

/// A rule that can decide a category on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Salary,
    Rent,
    Transport,
    Food,
    Shopping,
}

impl Rule {
    pub fn category(&self) -> &'static str {
        match self {
            Rule::Salary => "Salary",
            Rule::Rent => "Rent",
            Rule::Transport => "Transport",
            Rule::Food => "Food",
            Rule::Shopping => "Shopping",
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            Rule::Salary => 0.99,
            Rule::Rent => 0.98,
            Rule::Transport => 0.97,
            Rule::Food => 0.85,
            Rule::Shopping => 0.80,
        }
    }

    /// Evaluation order
    pub fn cascade() -> &'static [Rule] {
        &[
            Rule::Salary,
            Rule::Rent,
            Rule::Transport,
            Rule::Food,
            Rule::Shopping,
        ]
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category())
    }
}

/// Ordered predicates over amount, date and reference text
#[derive(Debug, Clone, Default)]
pub struct RuleCascade {
    config: RuleConfig,
}

impl RuleCascade {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// First rule that matches, or `None` when the cascade has no decision
    pub fn evaluate(&self, tx: &Transaction) -> Option<Rule> {
        Rule::cascade().iter().copied().find(|rule| self.matches(*rule, tx))
    }

    /// Human-readable form of every rule, keyed by lower-case category
    pub fn describe(&self) -> BTreeMap<String, String> {
        let c = &self.config;
        let transport = c
            .transport_amounts
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let food_suffix = if c.food_requires_fractional {
            " AND not integer"
        } else {
            ""
        };

        Rule::cascade()
            .iter()
            .map(|rule| {
                let text = match rule {
                    Rule::Salary => format!(
                        "Amount > {} OR (RefNo contains \"{}\" AND Amount > 0)",
                        c.salary_min_amount, c.salary_marker
                    ),
                    Rule::Rent => format!(
                        "Amount between {} and {} AND Day <= {}",
                        c.rent_max_amount, c.rent_min_amount, c.rent_max_day
                    ),
                    Rule::Transport => format!("Amount in [{}]", transport),
                    Rule::Food => format!(
                        "Amount between {} and {}{}",
                        c.food_min_amount, c.food_max_amount, food_suffix
                    ),
                    Rule::Shopping => format!(
                        "Amount between {} and {} (if not transport)",
                        c.shopping_min_amount, c.shopping_max_amount
                    ),
                };
                (rule.category().to_lowercase(), text)
            })
            .collect()
    }

    fn matches(&self, rule: Rule, tx: &Transaction) -> bool {
        let c = &self.config;
        let amount = tx.amount;

        match rule {
            Rule::Salary => {
                amount > c.salary_min_amount
                    || (amount > 0.0
                        && !c.salary_marker.is_empty()
                        && tx.reference_text.to_uppercase().contains(&c.salary_marker))
            }
            Rule::Rent => {
                c.rent_min_amount < amount
                    && amount < c.rent_max_amount
                    && tx.date.day() <= c.rent_max_day
            }
            Rule::Transport => self.is_transport_amount(amount),
            Rule::Food => {
                c.food_min_amount < amount
                    && amount < c.food_max_amount
                    && (!c.food_requires_fractional || amount.fract() != 0.0)
            }
            Rule::Shopping => {
                c.shopping_min_amount < amount
                    && amount < c.shopping_max_amount
                    && !self.is_transport_amount(amount)
            }
        }
    }

    fn is_transport_amount(&self, amount: f64) -> bool {
        self.config
            .transport_amounts
            .iter()
            .any(|t| (t - amount).abs() < AMOUNT_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(day: u32, amount: f64, reference: &str) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(2025, 3, day).unwrap(), amount, reference)
    }

    fn cascade() -> RuleCascade {
        RuleCascade::default()
    }

    #[test]
    fn test_large_income_is_salary() {
        assert_eq!(cascade().evaluate(&tx(15, 6000.0, "X")), Some(Rule::Salary));
    }

    #[test]
    fn test_marker_income_is_salary() {
        assert_eq!(cascade().evaluate(&tx(15, 1200.0, "chase corp")), Some(Rule::Salary));
        // Marker alone does not make an expense a salary
        assert_ne!(cascade().evaluate(&tx(15, -1200.0, "CHASE")), Some(Rule::Salary));
    }

    #[test]
    fn test_rent_needs_first_week() {
        assert_eq!(cascade().evaluate(&tx(3, -8000.0, "")), Some(Rule::Rent));
        assert_eq!(cascade().evaluate(&tx(7, -8000.0, "")), Some(Rule::Rent));
        // Later in the month the same payment is shopping
        assert_eq!(cascade().evaluate(&tx(8, -8000.0, "")), Some(Rule::Shopping));
    }

    #[test]
    fn test_transport_amounts() {
        assert_eq!(cascade().evaluate(&tx(15, -3062.0, "")), Some(Rule::Transport));
        assert_eq!(cascade().evaluate(&tx(20, -100.0, "")), Some(Rule::Transport));
        // Rent wins over transport in the first week
        assert_eq!(cascade().evaluate(&tx(2, -3062.0, "")), Some(Rule::Rent));
    }

    #[test]
    fn test_fractional_small_expense_is_food() {
        assert_eq!(cascade().evaluate(&tx(15, -245.5, "")), Some(Rule::Food));
        // Whole amounts fall through to shopping
        assert_eq!(cascade().evaluate(&tx(15, -245.0, "")), Some(Rule::Shopping));
    }

    #[test]
    fn test_food_fraction_requirement_is_configurable() {
        let rules = RuleCascade::new(RuleConfig {
            food_requires_fractional: false,
            ..RuleConfig::default()
        });
        assert_eq!(rules.evaluate(&tx(15, -245.0, "")), Some(Rule::Food));
    }

    #[test]
    fn test_no_decision() {
        assert_eq!(cascade().evaluate(&tx(3, -30000.0, "")), None);
        assert_eq!(cascade().evaluate(&tx(15, -5.0, "")), None);
        assert_eq!(cascade().evaluate(&tx(15, 0.0, "")), None);
        assert_eq!(cascade().evaluate(&tx(15, 300.0, "refund")), None);
    }

    #[test]
    fn test_describe_reflects_config() {
        let rules = cascade().describe();
        assert_eq!(rules.len(), 5);
        assert_eq!(rules["rent"], "Amount between -2000 and -15000 AND Day <= 7");
        assert_eq!(rules["transport"], "Amount in [-3062, -1718, -500, -100, -50, -200]");
        assert!(rules["salary"].contains("\"CHAS\""));
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        assert_ne!(cascade().evaluate(&tx(15, 5000.0, "")), Some(Rule::Salary));
        assert_eq!(cascade().evaluate(&tx(3, -2000.0, "")), Some(Rule::Shopping));
        assert_eq!(cascade().evaluate(&tx(15, -10000.0, "")), None);
    }
}
