use std::{env, path::PathBuf};

/// Overrides the base directory holding config and data.
pub const HOME_ENV: &str = "NEON_BUDGET_HOME";
const DEFAULT_DIR_NAME: &str = ".neon_budget";

/// `$NEON_BUDGET_HOME`, else `~/.neon_budget`, else `./.neon_budget`.
pub fn resolve_base_dir() -> PathBuf {
    if let Some(path) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
