//! Application state shared by cart front ends.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::notify::Notifier;
use crate::storage::FileStore;

/// Configuration plus the long-lived clients built from it.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    storage: Arc<FileStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built from the
    /// configuration.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let storage = Arc::new(FileStore::new(&config.storage_path));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                storage,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog/stock API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the file-backed cart storage.
    #[must_use]
    pub fn storage(&self) -> &FileStore {
        &self.inner.storage
    }

    /// Build a cart store over the API and file storage, restoring the
    /// persisted cart.
    #[must_use]
    pub fn cart_store(&self, notifier: Arc<dyn Notifier>) -> CartStore {
        let api = Arc::new(self.inner.api.clone());
        CartStore::new(api.clone(), api, self.inner.storage.clone(), notifier)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use crate::notify::TracingNotifier;
    use crate::storage::{CART_STORAGE_KEY, PersistentStore};

    use super::*;

    fn config_for(dir: &tempfile::TempDir) -> StorefrontConfig {
        let vars = HashMap::from([(
            "ROCKETSHOES_STORAGE_PATH".to_string(),
            dir.path().join("storage.json").display().to_string(),
        )]);
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_storage_uses_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config_for(&dir)).unwrap();
        assert_eq!(state.storage().path(), dir.path().join("storage.json"));
        assert_eq!(state.config().storage_path, dir.path().join("storage.json"));
    }

    #[test]
    fn test_cart_store_restores_persisted_cart() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config_for(&dir)).unwrap();
        state
            .storage()
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":3,"name":"Runner","price":"99.9","imageUrl":"https://cdn.example/3.jpg","amount":2}]"#,
            )
            .unwrap();

        let store = state.cart_store(Arc::new(TracingNotifier));
        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }
}
