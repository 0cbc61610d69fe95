use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Stores user-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_storage_quota_bytes")]
    pub storage_quota_bytes: u64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom data directory. Defaults to `<base>/data`.
    pub data_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional export directory. Defaults to the user's download folder.
    pub export_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            storage_quota_bytes: Self::default_storage_quota_bytes(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_dir: None,
            export_dir: None,
            log_filter: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "currency_symbol",
        "storage_quota_bytes",
        "ui_color_enabled",
        "data_dir",
        "export_dir",
        "log_filter",
    ];

    pub fn default_currency_symbol() -> String {
        "₱".into()
    }

    pub fn default_storage_quota_bytes() -> u64 {
        DEFAULT_QUOTA_BYTES
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_dir(&self, base: &std::path::Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| base.join("data"))
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        if let Some(path) = &self.export_dir {
            return path.clone();
        }

        dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Current value of `key` rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let display_path = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(default)".into())
        };
        Ok(match key {
            "currency_symbol" => self.currency_symbol.clone(),
            "storage_quota_bytes" => self.storage_quota_bytes.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "data_dir" => display_path(&self.data_dir),
            "export_dir" => display_path(&self.export_dir),
            "log_filter" => self.log_filter.clone().unwrap_or_else(|| "(default)".into()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        })
    }

    /// Parses and assigns `value` to `key`. `default` clears optional keys
    /// and resets the others.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let reset = value.eq_ignore_ascii_case("default");
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        let optional_path = |value: &str| (!reset).then(|| PathBuf::from(value));

        match key {
            "currency_symbol" if reset => self.currency_symbol = Self::default_currency_symbol(),
            "currency_symbol" if value.is_empty() => return Err(invalid("cannot be empty")),
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "storage_quota_bytes" if reset => {
                self.storage_quota_bytes = Self::default_storage_quota_bytes()
            }
            "storage_quota_bytes" => {
                self.storage_quota_bytes = value
                    .parse::<u64>()
                    .ok()
                    .filter(|bytes| *bytes > 0)
                    .ok_or_else(|| invalid("expected a positive byte count"))?;
            }
            "ui_color_enabled" if reset => {
                self.ui_color_enabled = Self::default_ui_color_enabled()
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid("expected on or off")),
                };
            }
            "data_dir" => self.data_dir = optional_path(value),
            "export_dir" => self.export_dir = optional_path(value),
            "log_filter" => self.log_filter = (!reset).then(|| value.to_string()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}
