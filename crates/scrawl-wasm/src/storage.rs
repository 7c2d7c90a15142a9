//! `window.localStorage` behind the [`KeyValueStore`] seam.

use scrawl_core::error::StoreError;
use scrawl_core::store::KeyValueStore;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Browser local storage. When storage is disabled (private mode, blocked
/// cookies) reads return nothing and writes report
/// [`StoreError::Unavailable`].
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage is unavailable; drawings will not persist");
        }
        Self { storage }
    }
}

fn backend_error(err: JsValue) -> StoreError {
    // Quota errors surface as a DOMException; keep its message.
    StoreError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage.set_item(key, value).map_err(backend_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage.remove_item(key).map_err(backend_error)
    }
}
