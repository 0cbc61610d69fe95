use std::sync::Arc;

use neon_core::{
    BudgetService, BudgetStore, Capabilities, CoreError, FixedClock, MemoryStore,
    ScriptedConfirmer, SequentialIds, StaticConfirmer, StorageKey, SummaryService, CLEAR_PROMPT,
};
use neon_domain::{TemplateDraft, ThemeId, Transaction, TransactionDraft, TransactionKind};

fn caps(day: u32, confirmer: Arc<dyn neon_core::Confirmer>) -> Capabilities {
    Capabilities::new(
        Arc::new(FixedClock::on(2024, 6, day).unwrap()),
        Arc::new(SequentialIds::new("id")),
        confirmer,
    )
}

fn open(store: &Arc<MemoryStore>, day: u32) -> BudgetService {
    BudgetService::open(store.clone(), caps(day, Arc::new(StaticConfirmer(true))))
}

fn expense(category: &str, amount: f64, date: &str) -> TransactionDraft {
    TransactionDraft::new(TransactionKind::Expense, category, amount, date.parse().unwrap())
}

fn stored_transactions(store: &MemoryStore) -> Vec<Transaction> {
    serde_json::from_str(&store.raw(StorageKey::Transactions).unwrap()).unwrap()
}

#[test]
fn hydration_reads_existing_data_before_any_write() {
    let store = Arc::new(MemoryStore::new());
    store.insert(
        StorageKey::Transactions,
        r#"[{"id":"a","type":"expense","category":"Food","amount":9.5,"date":"2024-06-01","description":"Lunch"}]"#,
    );
    store.insert(StorageKey::Theme, "ocean");

    let service = open(&store, 2);
    assert_eq!(service.transactions().len(), 1);
    assert_eq!(service.transactions()[0].id, "a");
    assert_eq!(service.theme(), ThemeId::Ocean);
    assert_eq!(stored_transactions(&store)[0].description, "Lunch");
}

#[test]
fn corrupt_values_fall_back_to_defaults_and_are_left_in_place() {
    let store = Arc::new(MemoryStore::new());
    store.insert(StorageKey::Transactions, "{broken");
    store.insert(StorageKey::Templates, "42");

    let service = open(&store, 2);
    assert_eq!(service.transactions().len(), 1);
    assert_eq!(service.transactions()[0].category, "Salary");
    assert!(service.templates().is_empty());
    assert_eq!(store.raw(StorageKey::Transactions).as_deref(), Some("{broken"));
}

#[test]
fn corrupt_transactions_are_not_overwritten_by_recurring_generation() {
    let store = Arc::new(MemoryStore::new());
    store.insert(StorageKey::Transactions, "{broken");
    store.insert(
        StorageKey::Templates,
        r#"[{"id":"t","name":"Rent","type":"expense","category":"Housing","amount":700,"description":"","dayOfMonth":19,"autoAdd":true}]"#,
    );

    let service = open(&store, 19);
    assert_eq!(service.transactions().len(), 1);
    assert!(service.templates()[0].last_generated.is_none());
    assert_eq!(store.raw(StorageKey::Transactions).as_deref(), Some("{broken"));
    assert!(!store.raw(StorageKey::Templates).unwrap().contains("lastGenerated"));
}

#[test]
fn recurring_template_generates_once_per_month_across_reopens() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 18);
    service
        .add_template(
            TemplateDraft::new("Housing Loan", TransactionKind::Expense, "Loan Payment", 1000.0)
                .scheduled(19, true),
        )
        .unwrap();
    assert_eq!(service.transactions().len(), 1);

    let reopened = open(&store, 19);
    assert_eq!(reopened.transactions().len(), 2);
    let generated = &reopened.transactions()[0];
    assert_eq!(generated.amount, 1000.0);
    assert_eq!(generated.date.to_string(), "2024-06-19");
    assert_eq!(generated.description, "Housing Loan (Auto-generated)");
    let last = reopened.templates()[0].last_generated.unwrap();
    assert_eq!(last.date_naive().to_string(), "2024-06-19");

    let again = open(&store, 19);
    assert_eq!(again.transactions().len(), 2);
    assert_eq!(stored_transactions(&store).len(), 2);
}

#[test]
fn failed_recurrence_commit_changes_nothing() {
    let store = Arc::new(MemoryStore::new());
    store.insert(
        StorageKey::Templates,
        r#"[{"id":"t","name":"Rent","type":"expense","category":"Housing","amount":700,"description":"","dayOfMonth":19,"autoAdd":true}]"#,
    );
    store.fail_writes_to(StorageKey::Transactions);

    let service = open(&store, 19);
    assert_eq!(service.transactions().len(), 1);
    assert!(service.templates()[0].last_generated.is_none());
    assert!(!store.raw(StorageKey::Templates).unwrap().contains("lastGenerated"));

    store.heal();
    let retried = open(&store, 19);
    assert_eq!(retried.transactions().len(), 2);
}

#[test]
fn deleting_a_template_keeps_generated_transactions() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 19);
    let template = service
        .add_template(
            TemplateDraft::new("Gym", TransactionKind::Expense, "Health", 30.0).scheduled(19, true),
        )
        .unwrap();
    let before = service.transactions().to_vec();

    service.delete_template(&template.id).unwrap();
    assert!(service.templates().is_empty());
    assert_eq!(service.transactions(), before.as_slice());
}

#[test]
fn editing_a_template_preserves_last_generated() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 19);
    let template = service
        .add_template(
            TemplateDraft::new("Gym", TransactionKind::Expense, "Health", 30.0).scheduled(19, true),
        )
        .unwrap();
    let count = service.transactions().len();

    let edited = service
        .edit_template(
            &template.id,
            TemplateDraft::new("Gym Plus", TransactionKind::Expense, "Health", 45.0)
                .scheduled(19, true),
        )
        .unwrap();
    assert_eq!(edited.last_generated, template.last_generated);
    assert_eq!(service.transactions().len(), count);
}

#[test]
fn export_then_import_round_trips() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 5);
    service.add_transaction(expense("Food", 12.0, "2024-06-03")).unwrap();
    service
        .add_transaction(expense("Transport", 3.25, "2024-06-04").with_description("Bus"))
        .unwrap();
    let before = service.transactions().to_vec();
    let exported = service.export_data().unwrap();
    assert!(exported.starts_with("[\n  {"));

    service.clear_transactions().unwrap();
    assert!(service.import_data(&exported));
    assert_eq!(service.transactions(), before.as_slice());
    assert_eq!(service.export_file_name(), "neon_budget_backup_2024-06-05.json");
}

#[test]
fn importing_an_object_fails_and_leaves_data_alone() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 5);
    let before = service.transactions().to_vec();

    assert!(!service.import_data("{}"));
    assert!(matches!(
        service.try_import("not json"),
        Err(CoreError::InvalidImport(_))
    ));
    assert_eq!(service.transactions(), before.as_slice());
    assert!(store.raw(StorageKey::Transactions).is_none());
}

#[test]
fn importing_invalid_entries_rejects_the_whole_document() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 5);
    let before = service.transactions().to_vec();

    let negative = r#"[
        {"id":"a","type":"income","category":"Salary","amount":10,"date":"2024-06-01","description":""},
        {"id":"b","type":"expense","category":"Food","amount":-250,"date":"2024-06-01","description":""}
    ]"#;
    assert!(!service.import_data(negative));
    assert!(matches!(
        service.try_import(negative),
        Err(CoreError::InvalidImport(ref msg)) if msg.contains("entry 1")
    ));

    let blank_category =
        r#"[{"id":"x","type":"expense","category":" ","amount":5,"date":"2024-06-01","description":""}]"#;
    assert!(!service.import_data(blank_category));

    assert_eq!(service.transactions(), before.as_slice());
    assert!(store.raw(StorageKey::Transactions).is_none());
    assert_eq!(SummaryService::totals(service.transactions()).expense, 0.0);
}

#[test]
fn snapshot_copies_and_restore_is_independent() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 5);
    service.add_transaction(expense("Food", 1.0, "2024-06-01")).unwrap();
    service.add_transaction(expense("Fun", 2.0, "2024-06-02")).unwrap();
    assert_eq!(service.transactions().len(), 3);

    let backup = service.create_backup().unwrap();
    assert_eq!(backup.item_count, 3);
    assert_eq!(backup.data, service.transactions());
    assert_eq!(
        backup.size,
        serde_json::to_string(&backup.data).unwrap().len() as u64
    );
    assert_eq!(backup.name, "Snapshot 2024-06-05 12:00:00");
    assert_eq!(service.backups()[0].id, backup.id);

    service.add_transaction(expense("Food", 9.0, "2024-06-05")).unwrap();
    assert_eq!(service.backups()[0].data.len(), 3);

    assert!(service.restore_backup(&backup.id).unwrap());
    assert_eq!(service.transactions(), backup.data.as_slice());

    let first = service.transactions()[0].id.clone();
    service.delete_transaction(&first).unwrap();
    assert_eq!(service.backups()[0].data.len(), 3);
}

#[test]
fn quota_failure_keeps_backup_out_of_memory() {
    let store = Arc::new(MemoryStore::with_quota(400));
    let mut service = open(&store, 5);
    service.add_transaction(expense("Food", 1.0, "2024-06-01")).unwrap();

    let err = service.create_backup().unwrap_err();
    assert!(matches!(err, CoreError::QuotaExceeded { .. }));
    assert!(service.backups().is_empty());
    assert!(store.raw(StorageKey::Backups).is_none());
}

#[test]
fn destructive_operations_ask_first() {
    let store = Arc::new(MemoryStore::new());
    let confirmer = Arc::new(ScriptedConfirmer::new([false, true]));
    let mut service = BudgetService::open(store.clone(), caps(5, confirmer.clone()));
    let backup = service.create_backup().unwrap();
    service.add_transaction(expense("Food", 1.0, "2024-06-01")).unwrap();

    assert!(!service.clear_transactions().unwrap());
    assert_eq!(service.transactions().len(), 2);

    assert!(service.restore_backup(&backup.id).unwrap());
    assert_eq!(service.transactions().len(), 1);

    let prompts = confirmer.prompts();
    assert_eq!(prompts[0], CLEAR_PROMPT);
    assert_eq!(
        prompts[1],
        format!("Restore backup \"{}\"? Current data will be replaced.", backup.name)
    );
}

#[test]
fn failed_write_leaves_memory_untouched() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 5);
    store.fail_writes_to(StorageKey::Transactions);

    assert!(service.add_transaction(expense("Food", 1.0, "2024-06-01")).is_err());
    assert_eq!(service.transactions().len(), 1);
}

#[test]
fn theme_is_stored_as_plain_identifier() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 5);
    service.set_theme(ThemeId::Sunset).unwrap();
    assert_eq!(store.raw(StorageKey::Theme).as_deref(), Some("sunset"));
    assert!(store.usage().unwrap().used_bytes >= 6);
}

#[test]
fn add_from_template_prefills_fields() {
    let store = Arc::new(MemoryStore::new());
    let mut service = open(&store, 5);
    let template = service
        .add_template(
            TemplateDraft::new("Coffee", TransactionKind::Expense, "Food", 4.5)
                .with_description("Morning coffee"),
        )
        .unwrap();
    let date = service.today();
    let txn = service.add_from_template(&template.id, date).unwrap();
    assert_eq!(txn.amount, 4.5);
    assert_eq!(txn.description, "Morning coffee");
    assert_eq!(service.transactions()[0].id, txn.id);
}
