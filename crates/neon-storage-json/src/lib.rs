//! neon-storage-json
//!
//! Filesystem-backed [`BudgetStore`]: one file per storage key inside a data
//! directory, replaced atomically on every write.

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use neon_core::{
    storage::{ensure_within_quota, DEFAULT_QUOTA_BYTES},
    BudgetStore, CoreError, StorageKey,
};
use tracing::debug;

const JSON_EXTENSION: &str = "json";
const TEXT_EXTENSION: &str = "txt";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    quota: u64,
}

impl JsonFileStore {
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_quota(data_dir, DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota(data_dir: PathBuf, quota: u64) -> Result<Self, CoreError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir, quota })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// `<data_dir>/<key>.json`, or `.txt` for the plain-text theme value.
    pub fn key_path(&self, key: StorageKey) -> PathBuf {
        let extension = if key.is_json() {
            JSON_EXTENSION
        } else {
            TEXT_EXTENSION
        };
        self.data_dir.join(format!("{}.{}", key.as_str(), extension))
    }
}

impl BudgetStore for JsonFileStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>, CoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), CoreError> {
        ensure_within_quota(self, key, value.len())?;
        let path = self.key_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(key = %key, bytes = value.len(), "stored");
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), CoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn quota_bytes(&self) -> Option<u64> {
        Some(self.quota)
    }
}

/// Writes an export artifact named `file_name` into `dir`, returning its path.
pub fn write_export(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, CoreError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let tmp = tmp_path(&path);
    write_atomic(&tmp, contents)?;
    fs::rename(&tmp, &path)?;
    Ok(path)
}

/// Reads an import document from disk.
pub fn read_import(path: &Path) -> Result<String, CoreError> {
    Ok(fs::read_to_string(path)?)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
