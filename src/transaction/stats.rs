//! Aggregate statistics over one user's transactions.
//!
//! Both computations are pure: they take a snapshot of decoded records and
//! return fresh totals. All arithmetic is done in [`Decimal`] so whole-cent
//! inputs always sum exactly.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Month};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use super::models::{Transaction, TransactionKind};

/// Labels for the twelve monthly buckets, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A record that cannot be aggregated. Any of these aborts the whole
/// computation; a financial summary never silently drops a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    UnknownKind { id: Uuid, value: String },
    NegativeAmount { id: Uuid },
    /// A running total left the representable range while adding this record
    Overflow { id: Uuid },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::UnknownKind { id, value } => {
                write!(f, "transaction {id} has unknown kind '{value}'")
            }
            StatsError::NegativeAmount { id } => {
                write!(f, "transaction {id} has a negative amount")
            }
            StatsError::Overflow { id } => {
                write!(f, "total overflowed while adding transaction {id}")
            }
        }
    }
}

impl std::error::Error for StatsError {}

/// Totals across every transaction in the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateStats {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    /// Income and expense amounts share one bucket per category.
    pub category_totals: BTreeMap<String, Decimal>,
    pub transaction_count: usize,
}

/// Income and expense totals for one month-of-year bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, ToSchema)]
pub struct MonthTotals {
    #[schema(value_type = String, example = "2000")]
    pub income: Decimal,
    #[schema(value_type = String, example = "150")]
    pub expense: Decimal,
}

impl MonthTotals {
    fn add(&mut self, transaction: &Transaction, amount: Decimal) -> Result<(), StatsError> {
        let total = match transaction.kind {
            TransactionKind::Income => &mut self.income,
            TransactionKind::Expense => &mut self.expense,
        };
        accumulate(total, amount, transaction)
    }
}

/// Twelve month-of-year buckets, January through December.
///
/// Records from different years that share a month land in the same bucket.
/// Serializes as a map keyed by [`MONTH_ABBREVIATIONS`] in calendar order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonthlySummary {
    months: [MonthTotals; 12],
}

impl MonthlySummary {
    pub fn get(&self, month: Month) -> &MonthTotals {
        &self.months[month.number_from_month() as usize - 1]
    }

    /// `(label, totals)` pairs in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &MonthTotals)> {
        MONTH_ABBREVIATIONS.iter().copied().zip(self.months.iter())
    }
}

impl Serialize for MonthlySummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.months.len()))?;
        for (label, totals) in self.iter() {
            map.serialize_entry(label, totals)?;
        }
        map.end()
    }
}

fn checked_amount(transaction: &Transaction) -> Result<Decimal, StatsError> {
    if transaction.amount < Decimal::ZERO {
        return Err(StatsError::NegativeAmount { id: transaction.id });
    }
    Ok(transaction.amount)
}

fn accumulate(total: &mut Decimal, amount: Decimal, transaction: &Transaction) -> Result<(), StatsError> {
    *total = total
        .checked_add(amount)
        .ok_or(StatsError::Overflow { id: transaction.id })?;
    Ok(())
}

/// Income, expense, balance, per-category totals and count.
pub fn compute_aggregate_stats(transactions: &[Transaction]) -> Result<AggregateStats, StatsError> {
    let mut stats = AggregateStats::default();

    for transaction in transactions {
        let amount = checked_amount(transaction)?;

        let total = match transaction.kind {
            TransactionKind::Income => &mut stats.total_income,
            TransactionKind::Expense => &mut stats.total_expense,
        };
        accumulate(total, amount, transaction)?;

        let category_total = stats
            .category_totals
            .entry(transaction.category.clone())
            .or_insert(Decimal::ZERO);
        accumulate(category_total, amount, transaction)?;
    }

    stats.balance = stats.total_income - stats.total_expense;
    stats.transaction_count = transactions.len();

    Ok(stats)
}

/// Month-of-year histogram of income and expense.
pub fn compute_monthly_summary(transactions: &[Transaction]) -> Result<MonthlySummary, StatsError> {
    let mut summary = MonthlySummary::default();

    for transaction in transactions {
        let amount = checked_amount(transaction)?;
        let index = transaction.occurred_on.month0() as usize;
        summary.months[index].add(transaction, amount)?;
    }

    Ok(summary)
}
