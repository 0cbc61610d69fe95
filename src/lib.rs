#![doc(test(attr(deny(warnings))))]

//! Neon Budget: a personal finance shell over income and expense records,
//! recurring-payment templates, and local backup snapshots.

pub mod cli;
pub mod core;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing, preferring `RUST_LOG`, then `configured`.
pub fn init_with_filter(configured: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(configured);
        tracing::debug!("Neon Budget tracing initialized.");
    });
}
