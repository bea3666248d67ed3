//! Browser-side API access
//!
//! Thin helpers around `rack_client::HttpRackApi` with the token kept in
//! `localStorage`. A client is built per call; on wasm that is just a
//! handle to `fetch`.

use rack_client::{ApiError, ClientConfig, HttpRackApi, TokenStore, TOKEN_KEY};

/// Token persisted in `window.localStorage`
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageTokenStore;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        storage()?.get_item(TOKEN_KEY).ok()?.filter(|t| !t.is_empty())
    }

    fn save(&self, token: &str) {
        if let Some(storage) = storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }

    fn clear(&self) {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

pub type Api = HttpRackApi<LocalStorageTokenStore>;

pub fn config() -> ClientConfig {
    ClientConfig::from_build_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "bad build-time client config, using defaults");
        ClientConfig::default()
    })
}

pub fn client() -> Result<Api, ApiError> {
    HttpRackApi::new(config(), LocalStorageTokenStore)
}

pub fn has_token() -> bool {
    LocalStorageTokenStore.has_token()
}

pub fn clear_token() {
    LocalStorageTokenStore.clear();
}

/// Full URL for a stored photo path
pub fn image_url(path: &str) -> String {
    config().image_url(path)
}
