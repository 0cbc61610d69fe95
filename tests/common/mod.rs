#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use neon_budget::core::BudgetSession;
use neon_core::{Capabilities, FixedClock, SequentialIds, StaticConfirmer};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh base directory for config and data.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn fixed_caps(year: i32, month: u32, day: u32) -> Capabilities {
    Capabilities::new(
        Arc::new(FixedClock::on(year, month, day).expect("valid test date")),
        Arc::new(SequentialIds::new(format!("{year}{month:02}{day:02}"))),
        Arc::new(StaticConfirmer(true)),
    )
}

/// Opens a session under `base` with the clock pinned to the given day.
pub fn open_session(base: &Path, year: i32, month: u32, day: u32) -> BudgetSession {
    BudgetSession::open(base.to_path_buf(), fixed_caps(year, month, day)).expect("open session")
}
