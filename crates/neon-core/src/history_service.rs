//! Searching and filtering the transaction history.

use std::{fmt, str::FromStr};

use neon_domain::{Transaction, TransactionKind};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(TransactionKind),
}

impl KindFilter {
    fn matches(self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(wanted) => wanted == kind,
        }
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindFilter::All => f.write_str("all"),
            KindFilter::Only(kind) => f.write_str(kind.as_str()),
        }
    }
}

impl FromStr for KindFilter {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        value
            .parse::<TransactionKind>()
            .map(KindFilter::Only)
            .map_err(|err| CoreError::Validation(err.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub query: String,
    pub kind: KindFilter,
}

impl HistoryFilter {
    pub fn new(query: impl Into<String>, kind: KindFilter) -> Self {
        Self {
            query: query.into(),
            kind,
        }
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if !self.kind.matches(txn.kind) {
            return false;
        }
        let needle = self.query.trim().to_lowercase();
        needle.is_empty()
            || txn.description.to_lowercase().contains(&needle)
            || txn.category.to_lowercase().contains(&needle)
    }
}

pub struct HistoryService;

impl HistoryService {
    /// Matching transactions, newest date first. Same-day entries keep collection order.
    pub fn filter<'a>(
        transactions: &'a [Transaction],
        filter: &HistoryFilter,
    ) -> Vec<&'a Transaction> {
        let mut rows: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| filter.matches(txn))
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_domain::TransactionDraft;

    fn history() -> Vec<Transaction> {
        let on = |raw: &str| -> chrono::NaiveDate { raw.parse().unwrap() };
        vec![
            TransactionDraft::new(TransactionKind::Expense, "Food", 12.0, on("2024-06-01"))
                .with_description("Groceries")
                .into_transaction("a"),
            TransactionDraft::new(TransactionKind::Income, "Salary", 100.0, on("2024-06-03"))
                .into_transaction("b"),
            TransactionDraft::new(TransactionKind::Expense, "Transport", 3.0, on("2024-06-03"))
                .with_description("Bus FOOD truck")
                .into_transaction("c"),
        ]
    }

    #[test]
    fn search_matches_description_or_category_case_insensitively() {
        let items = history();
        let rows = HistoryService::filter(&items, &HistoryFilter::new("food", KindFilter::All));
        let ids: Vec<_> = rows.iter().map(|txn| txn.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn type_filter_and_date_order() {
        let items = history();
        let expenses = HistoryService::filter(
            &items,
            &HistoryFilter::new("", "expense".parse().unwrap()),
        );
        let ids: Vec<_> = expenses.iter().map(|txn| txn.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);

        let everything = HistoryService::filter(&items, &HistoryFilter::default());
        let ids: Vec<_> = everything.iter().map(|txn| txn.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }
}
