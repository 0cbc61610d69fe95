//! neon-domain
//!
//! Pure domain models (Transaction, TransactionTemplate, Backup, ThemeId).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod backup;
pub mod category;
pub mod common;
pub mod template;
pub mod theme;
pub mod transaction;

pub use backup::*;
pub use category::*;
pub use common::*;
pub use template::*;
pub use theme::*;
pub use transaction::*;
