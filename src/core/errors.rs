use std::result::Result as StdResult;

use neon_config::ConfigError;
use neon_core::CoreError;
use thiserror::Error;

/// Unified error type for the service, storage, and configuration layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Import rejected: {0}")]
    ImportRejected(String),
    #[error("Storage is full: {needed} bytes needed but the quota is {quota} bytes")]
    QuotaExceeded { needed: u64, quota: u64 },
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<CoreError> for BudgetError {
    fn from(err: CoreError) -> Self {
        match err {
            err @ (CoreError::TransactionNotFound(_)
            | CoreError::TemplateNotFound(_)
            | CoreError::BackupNotFound(_)) => BudgetError::NotFound(err.to_string()),
            CoreError::InvalidImport(message) => BudgetError::ImportRejected(message),
            CoreError::Validation(message) => BudgetError::InvalidInput(message),
            CoreError::QuotaExceeded { needed, quota } => {
                BudgetError::QuotaExceeded { needed, quota }
            }
            CoreError::Storage(message) | CoreError::Serde(message) => {
                BudgetError::StorageError(message)
            }
            CoreError::Io(err) => BudgetError::StorageError(err.to_string()),
        }
    }
}

impl From<ConfigError> for BudgetError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => BudgetError::StorageError(io.to_string()),
            other => BudgetError::ConfigError(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(BudgetError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}
