//! Ledger aggregation: income/expense split and monthly means

use std::collections::BTreeSet;

use crate::classifier::DEFAULT_CATEGORY;
use crate::models::Transaction;

use super::stats::{month_key, monthly_mean, monthly_sums};

/// Categorized transactions with their monthly aggregates
///
/// Income is `amount > 0`, expense is `amount < 0`; zero amounts sit in
/// neither subset but still count toward the balance and the month span.
#[derive(Debug, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    monthly_income: f64,
    monthly_expense: f64,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let monthly_income = monthly_mean(
            transactions
                .iter()
                .filter(|t| t.is_income())
                .map(|t| (t.date, t.amount)),
        );
        let monthly_expense = monthly_mean(
            transactions
                .iter()
                .filter(|t| t.is_expense())
                .map(|t| (t.date, t.amount)),
        )
        .abs();

        Self {
            transactions,
            monthly_income,
            monthly_expense,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn incomes(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_income())
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_expense())
    }

    pub fn has_income(&self) -> bool {
        self.incomes().next().is_some()
    }

    pub fn has_expenses(&self) -> bool {
        self.expenses().next().is_some()
    }

    /// Mean of calendar-month income sums
    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    /// Absolute mean of calendar-month expense sums
    pub fn monthly_expense(&self) -> f64 {
        self.monthly_expense
    }

    /// Income summed per observed month, in calendar order
    pub fn monthly_income_sums(&self) -> Vec<f64> {
        monthly_sums(self.incomes().map(|t| (t.date, t.amount)))
            .into_values()
            .collect()
    }

    /// Sum of every signed amount
    pub fn balance(&self) -> f64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Distinct calendar months across the whole dataset
    pub fn distinct_months(&self) -> usize {
        self.transactions
            .iter()
            .map(|t| month_key(t.date))
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Category a transaction is grouped under
pub fn category_of(tx: &Transaction) -> &str {
    tx.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
}
