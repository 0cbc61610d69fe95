//! neon-core
//!
//! Business logic and services for Neon Budget: the recurrence engine, the
//! budget mutator API, analytics, and the persistence contract.
//! Depends on neon-domain. No CLI, no terminal I/O, no filesystem access.

pub mod budget_service;
pub mod capabilities;
pub mod error;
pub mod history_service;
pub mod loan_service;
pub mod recurrence_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transfer;

pub use budget_service::*;
pub use capabilities::*;
pub use error::CoreError;
pub use history_service::*;
pub use loan_service::*;
pub use recurrence_service::*;
pub use storage::{BudgetStore, MemoryStore, StorageKey, StorageUsage};
pub use summary_service::*;
pub use time::*;
