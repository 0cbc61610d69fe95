//! Application lifecycle: configuration, file store, and the budget service
//! opened together once at startup.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use neon_config::{Config, ConfigManager};
use neon_core::{BudgetService, Capabilities};
use neon_storage_json::{read_import, write_export, JsonFileStore};
use tracing::info;

use super::errors::{BudgetError, Result};

pub struct BudgetSession {
    config_manager: ConfigManager,
    config: Config,
    data_dir: PathBuf,
    budget: BudgetService,
}

impl BudgetSession {
    /// Loads config under `base`, opens the file store it points at, and
    /// hydrates the budget before anything can write.
    pub fn open(base: PathBuf, caps: Capabilities) -> Result<Self> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        Self::open_with(config_manager, config, caps)
    }

    pub fn open_with(
        config_manager: ConfigManager,
        config: Config,
        caps: Capabilities,
    ) -> Result<Self> {
        let data_dir = config.resolve_data_dir(config_manager.base_dir());
        let store = JsonFileStore::with_quota(data_dir.clone(), config.storage_quota_bytes)?;
        let budget = BudgetService::open(Arc::new(store), caps);
        info!(data_dir = %data_dir.display(), "budget session opened");
        Ok(Self {
            config_manager,
            config,
            data_dir,
            budget,
        })
    }

    pub fn budget(&self) -> &BudgetService {
        &self.budget
    }

    pub fn budget_mut(&mut self) -> &mut BudgetService {
        &mut self.budget
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        self.config_manager.config_path()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Applies and saves a single config change. The in-memory config only
    /// changes when the save succeeds.
    pub fn update_config(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.config.clone();
        next.set(key, value)?;
        self.config_manager.save(&next)?;
        self.config = next;
        Ok(())
    }

    /// Writes the pretty JSON export into `dir` (or the configured export
    /// directory) under today's export file name.
    pub fn export_to_dir(&self, dir: Option<&Path>) -> Result<PathBuf> {
        let target = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.resolve_export_dir());
        let contents = self.budget.export_data()?;
        let path = write_export(&target, &self.budget.export_file_name(), &contents)?;
        info!(path = %path.display(), "export written");
        Ok(path)
    }

    /// Replaces the transaction collection with the contents of `path`.
    pub fn import_file(&mut self, path: &Path) -> Result<usize> {
        let contents = read_import(path)?;
        self.budget
            .try_import(&contents)
            .map_err(BudgetError::from)
    }
}
