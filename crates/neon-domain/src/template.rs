//! Recurring-payment templates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::transaction::{TransactionDraft, TransactionKind};

/// A reusable pattern that can be materialized into a [`crate::Transaction`].
///
/// When `auto_add` is set together with `day_of_month`, the recurrence engine
/// produces one transaction per calendar month on that day. `last_generated`
/// is the only de-duplication guard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTemplate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_add: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_generated: Option<DateTime<Utc>>,
}

impl TransactionTemplate {
    /// True when the template can ever materialize on its own.
    pub fn is_automated(&self) -> bool {
        self.auto_add == Some(true) && self.day_of_month.is_some()
    }

    /// Pre-fills a transaction from this template for the given date.
    pub fn to_draft(&self, date: NaiveDate) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            category: self.category.clone(),
            amount: self.amount,
            date,
            description: self.description.clone(),
        }
    }

    /// Editable fields, leaving out the identifier and generation bookkeeping.
    pub fn to_draft_template(&self) -> TemplateDraft {
        TemplateDraft {
            name: self.name.clone(),
            kind: self.kind,
            category: self.category.clone(),
            amount: self.amount,
            description: self.description.clone(),
            day_of_month: self.day_of_month,
            auto_add: self.auto_add,
        }
    }
}

impl Identifiable for TransactionTemplate {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for TransactionTemplate {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for TransactionTemplate {
    fn display_label(&self) -> String {
        match (self.day_of_month, self.is_automated()) {
            (Some(day), true) => format!("{} (auto, day {})", self.name, day),
            (Some(day), false) => format!("{} (day {})", self.name, day),
            (None, _) => self.name.clone(),
        }
    }
}

/// Template fields supplied by the user when creating or replacing a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDraft {
    pub name: String,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub day_of_month: Option<u32>,
    pub auto_add: Option<bool>,
}

impl TemplateDraft {
    pub fn new(
        name: impl Into<String>,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            category: category.into(),
            amount,
            description: String::new(),
            day_of_month: None,
            auto_add: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Schedules the template on `day` of every month, optionally auto-adding.
    pub fn scheduled(mut self, day: u32, auto_add: bool) -> Self {
        self.day_of_month = Some(day);
        self.auto_add = Some(auto_add);
        self
    }

    pub fn into_template(
        self,
        id: impl Into<String>,
        last_generated: Option<DateTime<Utc>>,
    ) -> TransactionTemplate {
        TransactionTemplate {
            id: id.into(),
            name: self.name,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            description: self.description,
            day_of_month: self.day_of_month,
            auto_add: self.auto_add,
            last_generated,
        }
    }
}
