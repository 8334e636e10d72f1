use chat_state::{ChatStorage, PageData, STORAGE_CHAT_KEY, StoreError, load_page};
use wasm_bindgen::JsValue;

/// `window.localStorage` behind [`ChatStorage`].
#[derive(Clone, Debug)]
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    pub fn new(inner: web_sys::Storage) -> Self {
        Self { inner }
    }
}

/// Returns the local storage of the current window, or `None` when not running
/// in a browser (no `window`, or storage disabled by the user agent).
pub fn browser_storage() -> Option<BrowserStorage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .map(BrowserStorage::new)
}

/// Page load: the persisted chat history as initial page data.
pub fn load() -> Option<PageData> {
    load_page(browser_storage().as_ref(), STORAGE_CHAT_KEY)
}

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl ChatStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner
            .get_item(key)
            .map_err(|e| StoreError::read(key, describe(e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Fails on quota exhaustion or in some private browsing modes
        self.inner
            .set_item(key, value)
            .map_err(|e| StoreError::write(key, describe(e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.inner
            .remove_item(key)
            .map_err(|e| StoreError::write(key, describe(e)))
    }
}
