use std::sync::Arc;

use neon_core::{
    BudgetService, BudgetStore, Capabilities, CoreError, FixedClock, SequentialIds,
    StaticConfirmer, StorageKey,
};
use neon_domain::{ThemeId, TransactionDraft, TransactionKind};
use neon_storage_json::{read_import, write_export, JsonFileStore};
use tempfile::TempDir;

fn caps() -> Capabilities {
    Capabilities::new(
        Arc::new(FixedClock::on(2024, 6, 19).unwrap()),
        Arc::new(SequentialIds::new("txn")),
        Arc::new(StaticConfirmer(true)),
    )
}

#[test]
fn missing_files_read_as_absent() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp.path().join("data")).unwrap();
    assert_eq!(store.read(StorageKey::Transactions).unwrap(), None);
    store.remove(StorageKey::Backups).unwrap();
}

#[test]
fn keys_map_to_namespaced_files() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp.path().to_path_buf()).unwrap();
    store.write(StorageKey::Theme, "forest").unwrap();
    store.write(StorageKey::Templates, "[]").unwrap();

    assert!(temp.path().join("neon-budget-theme.txt").exists());
    assert!(temp.path().join("neon-budget-templates.json").exists());
    assert!(!temp.path().join("neon-budget-templates.json.tmp").exists());
    assert_eq!(store.read(StorageKey::Theme).unwrap().as_deref(), Some("forest"));
}

#[test]
fn quota_rejects_oversized_writes_and_keeps_previous_file() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::with_quota(temp.path().to_path_buf(), 16).unwrap();
    store.write(StorageKey::Backups, "[]").unwrap();

    let err = store
        .write(StorageKey::Backups, &"x".repeat(32))
        .unwrap_err();
    assert!(matches!(err, CoreError::QuotaExceeded { quota: 16, .. }));
    assert_eq!(store.read(StorageKey::Backups).unwrap().as_deref(), Some("[]"));
}

#[test]
fn budget_state_survives_a_restart() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("data");

    {
        let store = Arc::new(JsonFileStore::new(dir.clone()).unwrap());
        let mut service = BudgetService::open(store, caps());
        let date = service.today();
        service
            .add_transaction(
                TransactionDraft::new(TransactionKind::Expense, "Food", 20.0, date)
                    .with_description("Dinner"),
            )
            .unwrap();
        service.create_backup().unwrap();
        service.set_theme(ThemeId::Polar).unwrap();
    }

    let store = Arc::new(JsonFileStore::new(dir).unwrap());
    let service = BudgetService::open(store.clone(), caps());
    assert_eq!(service.transactions().len(), 2);
    assert_eq!(service.transactions()[0].description, "Dinner");
    assert_eq!(service.backups().len(), 1);
    assert_eq!(service.backups()[0].item_count, 2);
    assert_eq!(service.theme(), ThemeId::Polar);
    assert!(store.usage().unwrap().used_bytes > 0);
}

#[test]
fn export_file_can_be_imported_again() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(temp.path().join("data")).unwrap());
    let mut service = BudgetService::open(store, caps());

    let path = write_export(
        &temp.path().join("exports"),
        &service.export_file_name(),
        &service.export_data().unwrap(),
    )
    .unwrap();
    assert!(path.ends_with("neon_budget_backup_2024-06-19.json"));

    let before = service.transactions().to_vec();
    assert!(service.clear_transactions().unwrap());
    assert_eq!(service.try_import(&read_import(&path).unwrap()).unwrap(), 1);
    assert_eq!(service.transactions(), before.as_slice());
}
