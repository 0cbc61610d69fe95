//! Key-addressed persistence contract and typed collection loading.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::RwLock,
};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::CoreError;

/// Browser local storage allows roughly five megabytes per origin.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// The four independently persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Transactions,
    Backups,
    Templates,
    Theme,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Transactions,
        StorageKey::Backups,
        StorageKey::Templates,
        StorageKey::Theme,
    ];

    /// Namespaced key under which the collection is stored.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Transactions => "neon-budget-data",
            StorageKey::Backups => "neon-budget-backups",
            StorageKey::Templates => "neon-budget-templates",
            StorageKey::Theme => "neon-budget-theme",
        }
    }

    /// The theme is stored as a bare identifier; everything else is JSON.
    pub fn is_json(self) -> bool {
        !matches!(self, StorageKey::Theme)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bytes used across all keys relative to the store quota.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageUsage {
    pub used_bytes: u64,
    pub quota_bytes: u64,
}

impl StorageUsage {
    /// Percentage of the quota in use, capped at 100.
    pub fn percent(&self) -> f64 {
        if self.quota_bytes == 0 {
            return 100.0;
        }
        ((self.used_bytes as f64 / self.quota_bytes as f64) * 100.0).min(100.0)
    }
}

/// Abstraction over durable string storage addressed by [`StorageKey`].
pub trait BudgetStore: Send + Sync {
    fn read(&self, key: StorageKey) -> Result<Option<String>, CoreError>;
    fn write(&self, key: StorageKey, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: StorageKey) -> Result<(), CoreError>;

    /// Byte budget shared by all keys, if the backend enforces one.
    fn quota_bytes(&self) -> Option<u64> {
        None
    }

    /// Writes several keys as one unit. When a later write fails, keys already
    /// written in this batch are put back to their previous values.
    fn write_all(&self, entries: &[(StorageKey, String)]) -> Result<(), CoreError> {
        let mut written: Vec<(StorageKey, Option<String>)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let previous = self.read(*key)?;
            if let Err(err) = self.write(*key, value) {
                for (done, prior) in written.into_iter().rev() {
                    let restored = match prior {
                        Some(prior) => self.write(done, &prior),
                        None => self.remove(done),
                    };
                    if let Err(rollback) = restored {
                        warn!(key = %done, error = %rollback, "failed to roll back batched write");
                    }
                }
                return Err(err);
            }
            written.push((*key, previous));
        }
        Ok(())
    }

    fn usage(&self) -> Result<StorageUsage, CoreError> {
        let mut used_bytes = 0u64;
        for key in StorageKey::ALL {
            if let Some(value) = self.read(key)? {
                used_bytes += value.len() as u64;
            }
        }
        Ok(StorageUsage {
            used_bytes,
            quota_bytes: self.quota_bytes().unwrap_or(DEFAULT_QUOTA_BYTES),
        })
    }
}

/// Fails with [`CoreError::QuotaExceeded`] when replacing `key` with a value of
/// `new_len` bytes would push the store past its quota.
pub fn ensure_within_quota(
    store: &dyn BudgetStore,
    key: StorageKey,
    new_len: usize,
) -> Result<(), CoreError> {
    let Some(quota) = store.quota_bytes() else {
        return Ok(());
    };
    let mut needed = new_len as u64;
    for other in StorageKey::ALL.into_iter().filter(|other| *other != key) {
        if let Some(value) = store.read(other)? {
            needed += value.len() as u64;
        }
    }
    if needed > quota {
        return Err(CoreError::QuotaExceeded { needed, quota });
    }
    Ok(())
}

/// Reads and decodes a JSON collection. Absent, unreadable, or corrupt values
/// yield `None` so callers fall back to the collection default.
pub fn load_collection<T: DeserializeOwned>(store: &dyn BudgetStore, key: StorageKey) -> Option<T> {
    let raw = match store.read(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => {
            debug!(key = %key, "no stored value, using default");
            return None;
        }
        Err(err) => {
            warn!(key = %key, error = %err, "failed to read stored value, using default");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key = %key, error = %err, "stored value is corrupt, using default");
            None
        }
    }
}

/// Reads a plain-text value such as the theme identifier.
pub fn load_text(store: &dyn BudgetStore, key: StorageKey) -> Option<String> {
    match store.read(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        Ok(_) => None,
        Err(err) => {
            warn!(key = %key, error = %err, "failed to read stored value, using default");
            None
        }
    }
}

/// In-memory store with an optional quota and per-key failure injection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<StorageKey, String>>,
    failing: RwLock<HashSet<StorageKey>>,
    quota: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: u64) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Seeds a raw value without quota checks.
    pub fn insert(&self, key: StorageKey, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key, value.into());
        }
    }

    /// Makes every subsequent write to `key` fail.
    pub fn fail_writes_to(&self, key: StorageKey) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(key);
        }
    }

    pub fn heal(&self) {
        if let Ok(mut failing) = self.failing.write() {
            failing.clear();
        }
    }

    pub fn raw(&self, key: StorageKey) -> Option<String> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(&key).cloned())
    }

    fn lock_error() -> CoreError {
        CoreError::Storage("memory store lock poisoned".into())
    }
}

impl BudgetStore for MemoryStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>, CoreError> {
        let values = self.values.read().map_err(|_| Self::lock_error())?;
        Ok(values.get(&key).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), CoreError> {
        let failing = self
            .failing
            .read()
            .map_err(|_| Self::lock_error())?
            .contains(&key);
        if failing {
            return Err(CoreError::Storage(format!("write to `{key}` rejected")));
        }
        ensure_within_quota(self, key, value.len())?;
        let mut values = self.values.write().map_err(|_| Self::lock_error())?;
        values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), CoreError> {
        let mut values = self.values.write().map_err(|_| Self::lock_error())?;
        values.remove(&key);
        Ok(())
    }

    fn quota_bytes(&self) -> Option<u64> {
        self.quota
    }
}
