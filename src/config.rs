// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::error::{PlannerError, PlannerResult};
use crate::model::{Vocabulary, VocabularyPreset};
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_archive_after_days() -> u32 {
    7
}

/// Persisted settings. Every path is a plain string; relative paths are
/// resolved against `vault_root`, and an empty string means "not set".
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub vault_root: String,
    pub customer_template_path: String,
    pub customer_destination_path: String,
    pub deployment_template_path: String,
    pub deployment_types_path: String,
    pub remote_day_template_path: String,
    pub remote_day_destination_path: String,
    pub remote_task_template_path: String,
    pub xml_program_path: String,
    #[serde(default = "default_archive_after_days")]
    pub archive_after_days: u32,
    pub vocabulary: VocabularyPreset,
    /// Scan templates completely before copying anything.
    pub plan_template_copies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault_root: String::new(),
            customer_template_path: String::new(),
            customer_destination_path: String::new(),
            deployment_template_path: String::new(),
            deployment_types_path: String::new(),
            remote_day_template_path: String::new(),
            remote_day_destination_path: String::new(),
            remote_task_template_path: String::new(),
            xml_program_path: String::new(),
            archive_after_days: default_archive_after_days(),
            vocabulary: VocabularyPreset::default(),
            plan_template_copies: false,
        }
    }
}

/// Setting keys, as they appear in `config.toml`.
pub mod keys {
    pub const CUSTOMER_TEMPLATE: &str = "customer_template_path";
    pub const CUSTOMER_DESTINATION: &str = "customer_destination_path";
    pub const DEPLOYMENT_TEMPLATE: &str = "deployment_template_path";
    pub const DEPLOYMENT_TYPES: &str = "deployment_types_path";
    pub const REMOTE_DAY_TEMPLATE: &str = "remote_day_template_path";
    pub const REMOTE_DAY_DESTINATION: &str = "remote_day_destination_path";
    pub const REMOTE_TASK_TEMPLATE: &str = "remote_task_template_path";
    pub const XML_PROGRAM: &str = "xml_program_path";
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    /// Syntax and permission errors are still reported.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::info!("No configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Detects whether an error from `load` means the config file was missing,
    /// either by the explicit message or an `io::ErrorKind::NotFound` anywhere
    /// in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str =
                toml::to_string_pretty(self).map_err(|e| PlannerError::Config(e.to_string()))?;
            LocalStorage::atomic_write(&path, toml_str)
        })?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn vocab(&self) -> &'static Vocabulary {
        self.vocabulary.vocabulary()
    }

    /// Base directory of the planning tree.
    pub fn root(&self) -> PathBuf {
        if self.vault_root.trim().is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(self.vault_root.trim())
        }
    }

    /// Resolves a configured path against the vault root.
    pub fn resolve(&self, value: &str) -> PathBuf {
        let trimmed = value.trim().trim_end_matches(['/', '\\']);
        let path = Path::new(trimmed);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root().join(path)
        }
    }

    /// Returns the raw value of a path setting by key.
    pub fn raw(&self, key: &'static str) -> &str {
        match key {
            keys::CUSTOMER_TEMPLATE => &self.customer_template_path,
            keys::CUSTOMER_DESTINATION => &self.customer_destination_path,
            keys::DEPLOYMENT_TEMPLATE => &self.deployment_template_path,
            keys::DEPLOYMENT_TYPES => &self.deployment_types_path,
            keys::REMOTE_DAY_TEMPLATE => &self.remote_day_template_path,
            keys::REMOTE_DAY_DESTINATION => &self.remote_day_destination_path,
            keys::REMOTE_TASK_TEMPLATE => &self.remote_task_template_path,
            keys::XML_PROGRAM => &self.xml_program_path,
            _ => "",
        }
    }

    /// Resolved path for `key`, or `ConfigMissing` when the setting is empty.
    pub fn require_path(&self, key: &'static str) -> PlannerResult<PathBuf> {
        let raw = self.raw(key);
        if raw.trim().is_empty() {
            return Err(PlannerError::ConfigMissing { setting: key });
        }
        Ok(self.resolve(raw))
    }
}
