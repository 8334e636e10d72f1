use std::path::PathBuf;

use crate::page::STORAGE_CHAT_KEY;

const DEFAULT_DATA_DIR: &str = ".chat_state";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `CHAT_STORAGE_KEY` / `--storage-key`
    pub storage_key: String,
    /// `CHAT_DATA_DIR` / `--data-dir`, where `FileStorage` keeps its files.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_CHAT_KEY.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl Config {
    /// Defaults with the given values applied on top. Blank values count as unset.
    pub fn with_overrides(storage_key: Option<String>, data_dir: Option<PathBuf>) -> Self {
        let defaults = Self::default();
        Self {
            storage_key: storage_key
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.storage_key),
            data_dir: data_dir
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or(defaults.data_dir),
        }
    }
}
