//! Local backup snapshots of the transaction collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::transaction::Transaction;

/// A frozen, independent copy of the transaction collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Byte length of the compact JSON serialization of `data`.
    pub size: u64,
    pub item_count: usize,
    pub data: Vec<Transaction>,
}

impl Identifiable for Backup {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Backup {
    fn display_label(&self) -> String {
        format!("{} ({} items)", self.name, self.item_count)
    }
}
