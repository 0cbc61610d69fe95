//! Import/export data contract and backup snapshot construction.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use neon_domain::{Backup, Transaction};

use crate::CoreError;

const EXPORT_FILE_PREFIX: &str = "neon_budget_backup_";
const SNAPSHOT_NAME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Download name for an export produced on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Pretty-printed JSON array of the transaction collection.
pub fn export_json(transactions: &[Transaction]) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(transactions)?)
}

/// Parses an import document. The top-level value must be an array of
/// transaction-shaped objects; any other shape is rejected.
pub fn parse_import(json: &str) -> Result<Vec<Transaction>, CoreError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|err| CoreError::InvalidImport(format!("malformed JSON: {err}")))?;
    if !value.is_array() {
        return Err(CoreError::InvalidImport(
            "top-level value must be an array of transactions".into(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|err| CoreError::InvalidImport(format!("invalid transaction entry: {err}")))
}

/// Copies `transactions` into a new backup, measuring its compact JSON size.
pub fn snapshot(
    id: String,
    created_at: DateTime<Utc>,
    transactions: &[Transaction],
) -> Result<Backup, CoreError> {
    let data = transactions.to_vec();
    let size = serde_json::to_vec(&data)?.len() as u64;
    Ok(Backup {
        id,
        name: format!("Snapshot {}", created_at.format(SNAPSHOT_NAME_FORMAT)),
        created_at,
        size,
        item_count: data.len(),
        data,
    })
}
