pub mod build_info;

use tracing_subscriber::{fmt, EnvFilter};

/// Directive applied when neither `RUST_LOG` nor the config names a filter.
pub const DEFAULT_LOG_FILTER: &str = "neon_budget=info,neon_core=info,neon_storage_json=info";

/// Installs the global subscriber. Logs go to stderr so they never mix with
/// shell output on stdout.
pub fn init_tracing(configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| configured.and_then(|raw| EnvFilter::try_new(raw).ok()))
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
