//! Aggregated analytics over the transaction collection.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use neon_domain::{Transaction, TransactionKind};

/// Income, expense, and their difference.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Income and expense within one `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotals {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

impl MonthlyTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub net: f64,
    pub running_total: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(transactions: &[Transaction]) -> Totals {
        let mut totals = Totals::default();
        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => totals.income += txn.amount,
                TransactionKind::Expense => totals.expense += txn.amount,
            }
        }
        totals.balance = totals.income - totals.expense;
        totals
    }

    /// Share of income kept, in percent. Zero when there is no income.
    pub fn savings_rate(transactions: &[Transaction]) -> f64 {
        let totals = Self::totals(transactions);
        if totals.income > 0.0 {
            (totals.income - totals.expense) / totals.income * 100.0
        } else {
            0.0
        }
    }

    /// Expense sums per category, in order of first appearance.
    pub fn expenses_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
        let mut rows: Vec<CategoryTotal> = Vec::new();
        for txn in transactions.iter().filter(|txn| txn.is_expense()) {
            match rows.iter_mut().find(|row| row.category == txn.category) {
                Some(row) => row.amount += txn.amount,
                None => rows.push(CategoryTotal {
                    category: txn.category.clone(),
                    amount: txn.amount,
                }),
            }
        }
        rows
    }

    /// Per-month totals in ascending month order, keeping the last `limit` months.
    pub fn monthly_breakdown(transactions: &[Transaction], limit: usize) -> Vec<MonthlyTotals> {
        let mut months: BTreeMap<String, MonthlyTotals> = BTreeMap::new();
        for txn in transactions {
            let key = txn.date.format("%Y-%m").to_string();
            let entry = months.entry(key.clone()).or_insert_with(|| MonthlyTotals {
                month: key,
                income: 0.0,
                expense: 0.0,
            });
            match txn.kind {
                TransactionKind::Income => entry.income += txn.amount,
                TransactionKind::Expense => entry.expense += txn.amount,
            }
        }
        let skip = months.len().saturating_sub(limit);
        months.into_values().skip(skip).collect()
    }

    /// Daily net over the `days` days ending at `today`, with a running total.
    pub fn balance_trend(
        transactions: &[Transaction],
        today: NaiveDate,
        days: u32,
    ) -> Vec<TrendPoint> {
        let mut running_total = 0.0;
        (0..days)
            .rev()
            .map(|offset| today - Duration::days(i64::from(offset)))
            .map(|date| {
                let net: f64 = transactions
                    .iter()
                    .filter(|txn| txn.date == date)
                    .map(Transaction::signed_amount)
                    .sum();
                running_total += net;
                TrendPoint {
                    date,
                    net,
                    running_total,
                }
            })
            .collect()
    }

    /// The first `limit` transactions in collection order (most recent first by convention).
    pub fn recent(transactions: &[Transaction], limit: usize) -> &[Transaction] {
        &transactions[..limit.min(transactions.len())]
    }
}
