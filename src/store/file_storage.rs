use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::error;

use crate::errors::StoreError;
use crate::store::ChatStorage;

/// Native stand-in for browser local storage: one `<key>.json` file per key
/// under `dir`. The directory is created on first write.
///
/// Writes go to a `.<key>.json.tmp` sibling that is then renamed over the
/// target, so a reader sees either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.trim().is_empty() {
            return Err(StoreError::EmptyField { field_name: "storage key".to_string() });
        }
        // Keys map straight to file names, so nothing that could escape `dir`.
        if key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StoreError::InvalidKey { key: key.to_string() });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl ChatStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read {}: {e}", path.display());
                Err(StoreError::read(key, e.to_string()))
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&tmp, value))
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| {
                error!("Failed to write {}: {e}", path.display());
                let _ = fs::remove_file(&tmp);
                StoreError::write(key, e.to_string())
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove {}: {e}", path.display());
                Err(StoreError::write(key, e.to_string()))
            }
        }
    }
}
