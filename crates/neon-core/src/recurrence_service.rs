//! Materialization of recurring templates into transactions.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use neon_domain::{Transaction, TransactionTemplate};

use crate::IdGenerator;

/// Suffix appended to the template name on generated transactions.
pub const AUTO_GENERATED_SUFFIX: &str = " (Auto-generated)";

/// Months scanned when looking for the next date carrying a template's day.
const NEXT_RUN_LOOKAHEAD_MONTHS: u32 = 12;

/// A transaction produced from a due template.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTransaction {
    pub transaction: Transaction,
    pub template_id: String,
}

/// Proposed changes from one evaluation pass. Nothing is committed here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurrenceOutcome {
    pub generated: Vec<GeneratedTransaction>,
    /// The full template collection, with `last_generated` bumped on due templates.
    pub updated_templates: Vec<TransactionTemplate>,
}

impl RecurrenceOutcome {
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }

    pub fn new_transactions(&self) -> Vec<Transaction> {
        self.generated
            .iter()
            .map(|item| item.transaction.clone())
            .collect()
    }
}

/// Decides which templates generate a transaction and builds the proposals.
pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// A template is due when it auto-adds, its day matches today, and it has
    /// not generated anything in the current calendar month. A day missed
    /// entirely is not caught up later in the month.
    pub fn is_due(template: &TransactionTemplate, now: DateTime<Utc>) -> bool {
        if template.auto_add != Some(true) {
            return false;
        }
        let Some(day) = template.day_of_month else {
            return false;
        };
        let today = now.date_naive();
        if day != today.day() {
            return false;
        }
        match template.last_generated {
            None => true,
            Some(last) => year_month(last.date_naive()) < year_month(today),
        }
    }

    /// Evaluates every template against `now`. Templates that are not due are
    /// passed through unchanged in `updated_templates`.
    pub fn evaluate(
        templates: &[TransactionTemplate],
        now: DateTime<Utc>,
        ids: &dyn IdGenerator,
    ) -> RecurrenceOutcome {
        if templates.is_empty() {
            return RecurrenceOutcome::default();
        }

        let today = now.date_naive();
        let mut generated = Vec::new();
        let updated_templates = templates
            .iter()
            .map(|template| {
                if !Self::is_due(template, now) {
                    return template.clone();
                }
                generated.push(GeneratedTransaction {
                    transaction: Self::materialize(template, today, ids.next_id()),
                    template_id: template.id.clone(),
                });
                let mut updated = template.clone();
                updated.last_generated = Some(now);
                updated
            })
            .collect();

        RecurrenceOutcome {
            generated,
            updated_templates,
        }
    }

    /// Builds the transaction a template produces on `date`.
    pub fn materialize(template: &TransactionTemplate, date: NaiveDate, id: String) -> Transaction {
        Transaction {
            id,
            kind: template.kind,
            category: template.category.clone(),
            amount: template.amount,
            date,
            description: format!("{}{}", template.name, AUTO_GENERATED_SUFFIX),
        }
    }

    /// The next date on or after `today` on which the template would generate,
    /// or `None` when it is not automated or its day never occurs.
    pub fn next_run_date(template: &TransactionTemplate, today: NaiveDate) -> Option<NaiveDate> {
        if !template.is_automated() {
            return None;
        }
        let day = template.day_of_month?;
        let generated_this_month = template
            .last_generated
            .map(|last| year_month(last.date_naive()) >= year_month(today))
            .unwrap_or(false);

        if !generated_this_month && day >= today.day() {
            if let Some(date) = NaiveDate::from_ymd_opt(today.year(), today.month(), day) {
                return Some(date);
            }
        }

        let (mut year, mut month) = (today.year(), today.month());
        for _ in 0..NEXT_RUN_LOOKAHEAD_MONTHS {
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
        None
    }
}

fn year_month(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
