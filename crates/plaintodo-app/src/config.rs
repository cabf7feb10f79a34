use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use plaintodo_store_fs::{DEFAULT_BACKUP_SUFFIX, FileStore};
use serde::Deserialize;

/// Name of the optional configuration file looked up in the list directory.
pub const CONFIG_FILE: &str = ".plaintodo.toml";

/// Top-level project configuration loaded from `.plaintodo.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// List file locations.
    #[serde(default)]
    pub lists: ListsConfig,
}

impl ProjectConfig {
    /// Load configuration from `dir`, falling back to defaults when the file is absent.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = dir.as_ref().join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that deserialization alone cannot enforce.
    ///
    /// # Errors
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.lists.ensure_distinct_files()?;
        self.lists.ensure_valid_suffix()
    }

    /// Open a file store for the configured lists, resolving relative paths against `dir`.
    pub fn open_store(&self, dir: impl AsRef<Path>) -> FileStore {
        let dir = dir.as_ref();
        FileStore::new(dir.join(&self.lists.pending), dir.join(&self.lists.completed))
            .with_backup_suffix(self.lists.backup_suffix.clone())
    }
}

/// Locations of the list files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListsConfig {
    /// File holding pending tasks.
    pub pending: PathBuf,
    /// File holding completed tasks.
    pub completed: PathBuf,
    /// Suffix of the hidden backup files.
    pub backup_suffix: String,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            pending: PathBuf::from("todo.txt"),
            completed: PathBuf::from("done.txt"),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_owned(),
        }
    }
}

impl ListsConfig {
    fn ensure_distinct_files(&self) -> Result<()> {
        if self.pending.as_os_str().is_empty() || self.completed.as_os_str().is_empty() {
            bail!("list file names must not be empty");
        }
        if self.pending == self.completed {
            bail!(
                "pending and completed lists must use different files: {}",
                self.pending.display()
            );
        }
        Ok(())
    }

    fn ensure_valid_suffix(&self) -> Result<()> {
        let suffix = self.backup_suffix.trim();
        if suffix.is_empty() {
            bail!("backup suffix must not be empty");
        }
        if suffix.contains(['/', '\\']) {
            bail!("backup suffix '{suffix}' must not contain path separators");
        }
        Ok(())
    }
}
