//! Application configuration for Memo.
//!
//! Stores where the notebook database and backups live, plus the auto-save
//! preferences, in a JSON file at an OS-appropriate location.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;

/// File name of the SQLite store inside [`AppConfig::data_directory`].
pub const DATABASE_FILE: &str = "memo.db";

/// Persisted application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Directory holding the notebook database.
    pub data_directory: String,
    /// Directory [`crate::Workspace::export_backup`] writes to.
    pub export_directory: String,
    pub auto_save: bool,
    pub auto_save_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory().to_string_lossy().to_string(),
            export_directory: default_export_directory().to_string_lossy().to_string(),
            auto_save: true,
            auto_save_delay_ms: 1000,
        }
    }
}

impl AppConfig {
    pub fn database_path(&self) -> PathBuf {
        Path::new(&self.data_directory).join(DATABASE_FILE)
    }

    pub fn auto_save_delay(&self) -> Duration {
        Duration::from_millis(self.auto_save_delay_ms)
    }
}

/// Where [`load_config`] and [`save_config`] keep Memo's preferences:
/// `config.json` under `~/.config/memo` on Unix and `%APPDATA%/Memo` on
/// Windows. Falls back to the working directory without a home directory.
pub fn config_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("Memo").join("config.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("memo").join("config.json")
    }
}

/// Home of `memo.db` unless the config says otherwise, e.g.
/// `~/.local/share/memo`.
pub fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("memo")
}

/// Where [`crate::Workspace::export_backup`] writes dated backup files when
/// no config names a directory: a `Memo` folder in the user's documents.
pub fn default_export_directory() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Documents")
        })
        .join("Memo")
}

/// Loads the configuration; returns defaults if the file is missing or corrupt.
pub fn load_config() -> AppConfig {
    load_config_from(&config_file_path())
}

pub fn load_config_from(path: &Path) -> AppConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring corrupt config {}: {e}", path.display());
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Saves the configuration, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`crate::MemoError::Io`] or [`crate::MemoError::Json`].
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&config_file_path(), config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}
