use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("Backup not found: {0}")]
    BackupNotFound(String),
    #[error("Invalid import: {0}")]
    InvalidImport(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage quota exceeded: {needed} bytes needed, quota is {quota} bytes")]
    QuotaExceeded { needed: u64, quota: u64 },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
