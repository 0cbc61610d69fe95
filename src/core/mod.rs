pub mod errors;
pub mod paths;
pub mod session;

pub use errors::{BudgetError, CliError};
pub use session::BudgetSession;
