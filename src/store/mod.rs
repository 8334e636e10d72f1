//! Key-value storage for the persisted chat blob.
//!
//! [`ChatStorage`] follows the shape of the Web Storage API (`getItem`,
//! `setItem`, `removeItem`) so the browser's `localStorage` can sit behind it
//! as easily as the native stores defined here.

pub mod file_storage;
pub mod history_repository;
pub mod memory_storage;

use crate::errors::StoreError;

pub use file_storage::FileStorage;
pub use history_repository::HistoryRepository;
pub use memory_storage::MemoryStorage;

pub trait ChatStorage {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: ChatStorage + ?Sized> ChatStorage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}
