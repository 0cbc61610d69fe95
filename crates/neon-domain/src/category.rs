//! Built-in category catalogue offered when recording transactions.

use crate::transaction::TransactionKind;

pub const INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Investments", "Gift", "Other"];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Housing",
    "Loan Payment",
    "Entertainment",
    "Health",
    "Shopping",
    "Utilities",
    "Other",
];

/// Category assigned to templates created by the loan planner.
pub const LOAN_PAYMENT_CATEGORY: &str = "Loan Payment";

pub fn categories_for(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Income => INCOME_CATEGORIES,
        TransactionKind::Expense => EXPENSE_CATEGORIES,
    }
}

/// Case-insensitive lookup returning the canonical spelling of a known category.
pub fn canonical_category(kind: TransactionKind, value: &str) -> Option<&'static str> {
    let needle = value.trim();
    categories_for(kind)
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(needle))
}
