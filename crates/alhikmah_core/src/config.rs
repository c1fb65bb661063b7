//! Library configuration.
//!
//! # Responsibility
//! - Describe where the library keeps its database, copies and logs.
//! - Carry tunables for the reader controller.
//!
//! # Invariants
//! - `data_dir` is absolute; file and directory names are single path
//!   components.
//! - `snapshot_interval_pages` is at least 1.

use crate::db::MigrationPolicy;
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE_FILE: &str = "alhikmah.sqlite3";
pub const DEFAULT_BOOKS_DIR: &str = "books";
pub const DEFAULT_LOGS_DIR: &str = "logs";
pub const DEFAULT_SNAPSHOT_INTERVAL_PAGES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeDataDir(PathBuf),
    InvalidName { field: &'static str, value: String },
    ZeroSnapshotInterval,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDataDir(path) => {
                write!(f, "data_dir must be an absolute path, got `{}`", path.display())
            }
            Self::InvalidName { field, value } => {
                write!(f, "{field} must be a single non-empty path component, got `{value}`")
            }
            Self::ZeroSnapshotInterval => write!(f, "snapshot_interval_pages must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

/// Process-wide library settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
    pub books_dir: String,
    pub log_level: String,
    /// A progress snapshot is appended whenever the page is a multiple of this.
    pub snapshot_interval_pages: u32,
    /// Reset the database instead of failing when its schema is too new.
    pub destructive_migration_fallback: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            books_dir: DEFAULT_BOOKS_DIR.to_string(),
            log_level: default_log_level().to_string(),
            snapshot_interval_pages: DEFAULT_SNAPSHOT_INTERVAL_PAGES,
            destructive_migration_fallback: true,
        }
    }
}

impl LibraryConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(self.data_dir.clone()));
        }
        ensure_component("database_file", &self.database_file)?;
        ensure_component("books_dir", &self.books_dir)?;
        if self.snapshot_interval_pages == 0 {
            return Err(ConfigError::ZeroSnapshotInterval);
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn books_dir(&self) -> PathBuf {
        self.data_dir.join(&self.books_dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_LOGS_DIR)
    }

    pub fn migration_policy(&self) -> MigrationPolicy {
        if self.destructive_migration_fallback {
            MigrationPolicy::DestructiveFallback
        } else {
            MigrationPolicy::Strict
        }
    }
}

fn ensure_component(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    let is_single = Path::new(trimmed).components().count() == 1
        && !trimmed.contains(['/', '\\'])
        && trimmed != "."
        && trimmed != "..";
    if trimmed.is_empty() || !is_single {
        return Err(ConfigError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
