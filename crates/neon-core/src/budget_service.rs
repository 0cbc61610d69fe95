//! The budget aggregate: sole owner of the four persisted collections.
//!
//! Every mutator stages the new collection, writes it through the
//! [`BudgetStore`], and only then swaps it into memory. A failed write leaves
//! both memory and storage as they were.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use neon_domain::{
    find_by_id, position_by_id, Backup, TemplateDraft, ThemeId, Transaction, TransactionDraft,
    TransactionKind, TransactionTemplate,
};

use crate::{
    storage::{load_collection, load_text},
    transfer, BudgetStore, Capabilities, CoreError, RecurrenceEngine, StorageKey, StorageUsage,
};

pub const CLEAR_PROMPT: &str = "Are you sure? This will wipe all current transactions.";

const SEED_ID: &str = "1";
const SEED_CATEGORY: &str = "Salary";
const SEED_AMOUNT: f64 = 5000.0;
const SEED_DESCRIPTION: &str = "Initial Deposit";

/// The starting collection for a store with no saved transactions.
pub fn seed_transactions(today: NaiveDate) -> Vec<Transaction> {
    vec![
        TransactionDraft::new(TransactionKind::Income, SEED_CATEGORY, SEED_AMOUNT, today)
            .with_description(SEED_DESCRIPTION)
            .into_transaction(SEED_ID),
    ]
}

pub fn restore_prompt(backup: &Backup) -> String {
    format!(
        "Restore backup \"{}\"? Current data will be replaced.",
        backup.name
    )
}

pub struct BudgetService {
    store: Arc<dyn BudgetStore>,
    caps: Capabilities,
    transactions: Vec<Transaction>,
    backups: Vec<Backup>,
    templates: Vec<TransactionTemplate>,
    theme: ThemeId,
}

impl BudgetService {
    /// Hydrates every collection from `store`, then runs the recurrence engine
    /// once. No write can happen before hydration completes.
    pub fn open(store: Arc<dyn BudgetStore>, caps: Capabilities) -> Self {
        let today = caps.clock.today();
        let stored = load_collection(store.as_ref(), StorageKey::Transactions);
        let unreadable =
            stored.is_none() && has_stored_value(store.as_ref(), StorageKey::Transactions);
        let transactions = stored.unwrap_or_else(|| seed_transactions(today));
        let backups = load_collection(store.as_ref(), StorageKey::Backups).unwrap_or_default();
        let templates = load_collection(store.as_ref(), StorageKey::Templates).unwrap_or_default();
        let theme = load_text(store.as_ref(), StorageKey::Theme)
            .map(|raw| ThemeId::from_stored(&raw))
            .unwrap_or_default();

        let mut service = Self {
            store,
            caps,
            transactions,
            backups,
            templates,
            theme,
        };
        debug!(
            transactions = service.transactions.len(),
            backups = service.backups.len(),
            templates = service.templates.len(),
            theme = %service.theme,
            "budget hydrated"
        );
        if unreadable {
            warn!("stored transactions are unreadable; skipping recurring generation");
        } else {
            service.refresh_recurring();
        }
        service
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn backups(&self) -> &[Backup] {
        &self.backups
    }

    pub fn templates(&self) -> &[TransactionTemplate] {
        &self.templates
    }

    pub fn theme(&self) -> ThemeId {
        self.theme
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.caps.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.caps.clock.today()
    }

    pub fn transaction(&self, id: &str) -> Result<&Transaction, CoreError> {
        find_by_id(&self.transactions, id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))
    }

    pub fn template(&self, id: &str) -> Result<&TransactionTemplate, CoreError> {
        find_by_id(&self.templates, id).ok_or_else(|| CoreError::TemplateNotFound(id.to_string()))
    }

    pub fn backup(&self, id: &str) -> Result<&Backup, CoreError> {
        find_by_id(&self.backups, id).ok_or_else(|| CoreError::BackupNotFound(id.to_string()))
    }

    // ---- transactions --------------------------------------------------

    /// Assigns a fresh id and prepends the transaction.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction, CoreError> {
        validate_transaction(&draft)?;
        let transaction = draft.into_transaction(self.caps.ids.next_id());
        let mut next = Vec::with_capacity(self.transactions.len() + 1);
        next.push(transaction.clone());
        next.extend(self.transactions.iter().cloned());
        self.commit_transactions(next)?;
        info!(
            id = %transaction.id,
            kind = %transaction.kind,
            amount = transaction.amount,
            "transaction added"
        );
        Ok(transaction)
    }

    /// Replaces every field except the id.
    pub fn edit_transaction(
        &mut self,
        id: &str,
        draft: TransactionDraft,
    ) -> Result<Transaction, CoreError> {
        validate_transaction(&draft)?;
        let index = position_by_id(&self.transactions, id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;
        let updated = draft.into_transaction(id);
        let mut next = self.transactions.clone();
        next[index] = updated.clone();
        self.commit_transactions(next)?;
        info!(id, "transaction updated");
        Ok(updated)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction, CoreError> {
        let index = position_by_id(&self.transactions, id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;
        let mut next = self.transactions.clone();
        let removed = next.remove(index);
        self.commit_transactions(next)?;
        info!(id, "transaction deleted");
        Ok(removed)
    }

    /// Empties the transaction collection once the user confirms.
    /// Returns `false` when the prompt was declined.
    pub fn clear_transactions(&mut self) -> Result<bool, CoreError> {
        if !self.caps.confirmer.confirm(CLEAR_PROMPT) {
            debug!("clear declined");
            return Ok(false);
        }
        let removed = self.transactions.len();
        self.commit_transactions(Vec::new())?;
        info!(removed, "transactions cleared");
        Ok(true)
    }

    /// Records a transaction pre-filled from a template on `date`.
    pub fn add_from_template(
        &mut self,
        template_id: &str,
        date: NaiveDate,
    ) -> Result<Transaction, CoreError> {
        let draft = self.template(template_id)?.to_draft(date);
        self.add_transaction(draft)
    }

    // ---- templates -----------------------------------------------------

    /// Appends a template, then re-runs recurrence.
    pub fn add_template(&mut self, draft: TemplateDraft) -> Result<TransactionTemplate, CoreError> {
        validate_template(&draft)?;
        let template = draft.into_template(self.caps.ids.next_id(), None);
        let mut next = self.templates.clone();
        next.push(template.clone());
        self.commit_templates(next)?;
        info!(id = %template.id, name = %template.name, "template added");
        self.refresh_recurring();
        Ok(self.template(&template.id).cloned().unwrap_or(template))
    }

    /// Replaces the editable fields. Generation bookkeeping is kept so an
    /// edit never re-arms a template that already ran this month.
    pub fn edit_template(
        &mut self,
        id: &str,
        draft: TemplateDraft,
    ) -> Result<TransactionTemplate, CoreError> {
        validate_template(&draft)?;
        let index = position_by_id(&self.templates, id)
            .ok_or_else(|| CoreError::TemplateNotFound(id.to_string()))?;
        let updated = draft.into_template(id, self.templates[index].last_generated);
        let mut next = self.templates.clone();
        next[index] = updated.clone();
        self.commit_templates(next)?;
        info!(id, "template updated");
        self.refresh_recurring();
        Ok(self.template(id).cloned().unwrap_or(updated))
    }

    /// Removes a template. Transactions it generated are left alone.
    pub fn delete_template(&mut self, id: &str) -> Result<TransactionTemplate, CoreError> {
        let index = position_by_id(&self.templates, id)
            .ok_or_else(|| CoreError::TemplateNotFound(id.to_string()))?;
        let mut next = self.templates.clone();
        let removed = next.remove(index);
        self.commit_templates(next)?;
        info!(id, "template deleted");
        self.refresh_recurring();
        Ok(removed)
    }

    // ---- recurrence ----------------------------------------------------

    /// Evaluates templates against the clock and commits any generations.
    /// Templates and transactions are written as one batch.
    pub fn run_recurring(&mut self) -> Result<usize, CoreError> {
        let outcome = RecurrenceEngine::evaluate(
            &self.templates,
            self.caps.clock.now(),
            self.caps.ids.as_ref(),
        );
        if outcome.is_empty() {
            return Ok(0);
        }

        let mut transactions = outcome.new_transactions();
        let count = transactions.len();
        transactions.extend(self.transactions.iter().cloned());

        self.store.write_all(&[
            (StorageKey::Templates, encode(&outcome.updated_templates)?),
            (StorageKey::Transactions, encode(&transactions)?),
        ])?;
        self.templates = outcome.updated_templates;
        self.transactions = transactions;

        for item in &outcome.generated {
            info!(
                template = %item.template_id,
                id = %item.transaction.id,
                amount = item.transaction.amount,
                "recurring transaction generated"
            );
        }
        Ok(count)
    }

    /// Like [`Self::run_recurring`] but failures are logged and swallowed.
    pub fn refresh_recurring(&mut self) -> usize {
        match self.run_recurring() {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, "recurring evaluation failed; nothing committed");
                0
            }
        }
    }

    // ---- backups -------------------------------------------------------

    /// Snapshots the current transactions and prepends the backup.
    pub fn create_backup(&mut self) -> Result<Backup, CoreError> {
        let backup = transfer::snapshot(
            self.caps.ids.next_id(),
            self.caps.clock.now(),
            &self.transactions,
        )?;
        let mut next = Vec::with_capacity(self.backups.len() + 1);
        next.push(backup.clone());
        next.extend(self.backups.iter().cloned());
        self.commit_backups(next)?;
        info!(id = %backup.id, items = backup.item_count, size = backup.size, "backup created");
        Ok(backup)
    }

    pub fn delete_backup(&mut self, id: &str) -> Result<Backup, CoreError> {
        let index = position_by_id(&self.backups, id)
            .ok_or_else(|| CoreError::BackupNotFound(id.to_string()))?;
        let mut next = self.backups.clone();
        let removed = next.remove(index);
        self.commit_backups(next)?;
        info!(id, "backup deleted");
        Ok(removed)
    }

    /// Replaces live transactions with a copy of the backup's data once the
    /// user confirms. Returns `false` when declined.
    pub fn restore_backup(&mut self, id: &str) -> Result<bool, CoreError> {
        let backup = self.backup(id)?;
        if !self.caps.confirmer.confirm(&restore_prompt(backup)) {
            debug!(id, "restore declined");
            return Ok(false);
        }
        let data = backup.data.clone();
        let restored = data.len();
        self.commit_transactions(data)?;
        info!(id, restored, "backup restored");
        Ok(true)
    }

    // ---- import / export -----------------------------------------------

    /// Replaces the transaction collection with an imported document.
    pub fn try_import(&mut self, json: &str) -> Result<usize, CoreError> {
        let imported = transfer::parse_import(json)?;
        for (index, transaction) in imported.iter().enumerate() {
            validate_amount(transaction.amount)
                .and_then(|()| validate_category(&transaction.category))
                .map_err(|err| CoreError::InvalidImport(format!("entry {index}: {err}")))?;
        }
        let count = imported.len();
        self.commit_transactions(imported)?;
        info!(count, "transactions imported");
        Ok(count)
    }

    /// Boolean form of [`Self::try_import`]; the collection is untouched on failure.
    pub fn import_data(&mut self, json: &str) -> bool {
        match self.try_import(json) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "import rejected");
                false
            }
        }
    }

    pub fn export_data(&self) -> Result<String, CoreError> {
        transfer::export_json(&self.transactions)
    }

    /// File name for an export made today.
    pub fn export_file_name(&self) -> String {
        transfer::export_file_name(self.today())
    }

    // ---- settings ------------------------------------------------------

    pub fn set_theme(&mut self, theme: ThemeId) -> Result<(), CoreError> {
        self.store.write(StorageKey::Theme, theme.as_str())?;
        self.theme = theme;
        info!(theme = %theme, "theme changed");
        Ok(())
    }

    pub fn storage_usage(&self) -> Result<StorageUsage, CoreError> {
        self.store.usage()
    }

    // ---- commits -------------------------------------------------------

    fn commit_transactions(&mut self, next: Vec<Transaction>) -> Result<(), CoreError> {
        self.store.write(StorageKey::Transactions, &encode(&next)?)?;
        self.transactions = next;
        Ok(())
    }

    fn commit_templates(&mut self, next: Vec<TransactionTemplate>) -> Result<(), CoreError> {
        self.store.write(StorageKey::Templates, &encode(&next)?)?;
        self.templates = next;
        Ok(())
    }

    fn commit_backups(&mut self, next: Vec<Backup>) -> Result<(), CoreError> {
        self.store.write(StorageKey::Backups, &encode(&next)?)?;
        self.backups = next;
        Ok(())
    }
}

fn has_stored_value(store: &dyn BudgetStore, key: StorageKey) -> bool {
    matches!(store.read(key), Ok(Some(raw)) if !raw.trim().is_empty())
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CoreError> {
    Ok(serde_json::to_string(value)?)
}

fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::Validation(
            "amount must be a non-negative number".into(),
        ));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), CoreError> {
    if category.trim().is_empty() {
        return Err(CoreError::Validation("category is required".into()));
    }
    Ok(())
}

fn validate_transaction(draft: &TransactionDraft) -> Result<(), CoreError> {
    validate_amount(draft.amount)?;
    validate_category(&draft.category)
}

fn validate_template(draft: &TemplateDraft) -> Result<(), CoreError> {
    if draft.name.trim().is_empty() {
        return Err(CoreError::Validation("template name is required".into()));
    }
    validate_amount(draft.amount)?;
    validate_category(&draft.category)?;
    match draft.day_of_month {
        Some(day) if !(1..=31).contains(&day) => Err(CoreError::Validation(format!(
            "day of month must be between 1 and 31, got {day}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, MemoryStore, SequentialIds, StaticConfirmer};

    fn service_on(store: Arc<MemoryStore>, day: u32) -> BudgetService {
        let caps = Capabilities::new(
            Arc::new(FixedClock::on(2024, 6, day).unwrap()),
            Arc::new(SequentialIds::new("id")),
            Arc::new(StaticConfirmer(true)),
        );
        BudgetService::open(store, caps)
    }

    #[test]
    fn empty_store_hydrates_seed_without_writing_it() {
        let store = Arc::new(MemoryStore::new());
        let service = service_on(store.clone(), 1);
        assert_eq!(service.transactions().len(), 1);
        assert_eq!(service.transactions()[0].id, "1");
        assert_eq!(service.transactions()[0].description, "Initial Deposit");
        assert_eq!(service.theme(), ThemeId::Cosmic);
        assert!(store.raw(StorageKey::Transactions).is_none());
    }

    #[test]
    fn new_transactions_are_prepended() {
        let store = Arc::new(MemoryStore::new());
        let mut service = service_on(store.clone(), 1);
        let draft = TransactionDraft::new(
            TransactionKind::Expense,
            "Food",
            12.5,
            service.today(),
        );
        let added = service.add_transaction(draft).unwrap();
        assert_eq!(service.transactions()[0], added);
        assert_eq!(service.transactions()[1].id, "1");
        assert!(store.raw(StorageKey::Transactions).unwrap().contains(&added.id));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut service = service_on(store, 1);
        let draft = TransactionDraft::new(TransactionKind::Expense, "Food", -1.0, service.today());
        assert!(matches!(
            service.add_transaction(draft),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn template_with_out_of_range_day_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut service = service_on(store, 1);
        let draft = TemplateDraft::new("Rent", TransactionKind::Expense, "Housing", 10.0)
            .scheduled(32, true);
        assert!(service.add_template(draft).is_err());
        assert!(service.templates().is_empty());
    }

    #[test]
    fn editing_unknown_ids_reports_not_found() {
        let store = Arc::new(MemoryStore::new());
        let mut service = service_on(store, 1);
        let draft = TransactionDraft::new(TransactionKind::Income, "Salary", 1.0, service.today());
        assert!(matches!(
            service.edit_transaction("missing", draft),
            Err(CoreError::TransactionNotFound(_))
        ));
        assert!(matches!(
            service.delete_template("missing"),
            Err(CoreError::TemplateNotFound(_))
        ));
        assert!(matches!(
            service.restore_backup("missing"),
            Err(CoreError::BackupNotFound(_))
        ));
    }

    #[test]
    fn adding_a_due_template_generates_immediately() {
        let store = Arc::new(MemoryStore::new());
        let mut service = service_on(store, 19);
        let draft = TemplateDraft::new(
            "Housing Loan",
            TransactionKind::Expense,
            "Loan Payment",
            1000.0,
        )
        .scheduled(19, true);
        let template = service.add_template(draft).unwrap();
        assert!(template.last_generated.is_some());
        assert_eq!(service.transactions()[0].description, "Housing Loan (Auto-generated)");
        assert_eq!(service.transactions().len(), 2);
    }
}
