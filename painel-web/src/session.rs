//! Browser session store and hash navigation

use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

use painel_core::{Navigator, SessionStore};

/// `SessionStore` over `window.localStorage`, as written by the login page
pub struct LocalStorageSession {
    storage: Option<Storage>,
}

impl LocalStorageSession {
    pub fn new(window: &Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            warn!("localStorage unavailable, every navigation will redirect to login");
        }
        Self { storage }
    }
}

impl SessionStore for LocalStorageSession {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }
}

/// `Navigator` over `window.location` and `window.history`
pub struct HashNavigator {
    window: Window,
}

impl HashNavigator {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Navigator for HashNavigator {
    fn current_hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn set_hash(&self, hash: &str) {
        if let Err(err) = self.window.location().set_hash(hash) {
            warn!(hash, error = ?err, "Cannot set location hash");
        }
    }

    fn replace_hash(&self, hash: &str) {
        let replaced = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(hash)));
        if let Err(err) = replaced {
            warn!(hash, error = ?err, "Cannot replace history entry");
        }
    }

    fn redirect(&self, url: &str) {
        if let Err(err) = self.window.location().set_href(url) {
            warn!(url, error = ?err, "Redirect failed");
        }
    }
}
