//! Storage Selector
//!
//! TigerStyle: Probe once at startup, then never change backends.
//!
//! A reachable MongoDB wins. An unreachable one, a probe that runs past its
//! timeout, or a build without the `mongo` feature all land on the local
//! JSON file. There is no re-probe and no failover after startup.

use std::fmt;
use std::sync::Arc;

use super::{Backend, FileStore, ItemStore};
use crate::config::StoreConfig;

/// The backend chosen for the life of the process
#[derive(Clone)]
pub struct SelectedStore {
    store: Arc<dyn ItemStore>,
    backend: Backend,
}

impl SelectedStore {
    /// Wrap an already-built store
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        let backend = store.backend();
        Self { store, backend }
    }

    /// The store serving reads and writes
    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// Which backend was selected
    pub fn backend(&self) -> Backend {
        self.backend
    }
}

impl fmt::Debug for SelectedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedStore")
            .field("backend", &self.backend)
            .field("location", &self.store.describe())
            .finish()
    }
}

/// Pick the store for this process
pub async fn select_store(config: &StoreConfig) -> SelectedStore {
    #[cfg(feature = "mongo")]
    {
        match probe_mongo(config).await {
            Ok(store) => {
                tracing::info!(
                    uri = %config.mongo_uri,
                    collection = %store.describe(),
                    "Using MongoDB storage"
                );
                return SelectedStore::new(Arc::new(store));
            }
            Err(reason) => {
                tracing::warn!(
                    uri = %config.mongo_uri,
                    reason = %reason,
                    "MongoDB unavailable, falling back to local file"
                );
            }
        }
    }

    #[cfg(not(feature = "mongo"))]
    tracing::info!("Built without MongoDB support, using local file");

    let store = FileStore::new(config.items_file.clone());
    tracing::info!(path = %store.describe(), "Using local file storage");
    SelectedStore::new(Arc::new(store))
}

/// Connect to MongoDB, bounded by the probe timeout
#[cfg(feature = "mongo")]
async fn probe_mongo(config: &StoreConfig) -> Result<super::MongoStore, String> {
    match tokio::time::timeout(config.probe_timeout, super::MongoStore::connect(config)).await {
        Ok(Ok(store)) => Ok(store),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!(
            "probe timed out after {} ms",
            config.probe_timeout.as_millis()
        )),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_unreachable_mongo_falls_back_to_file() {
        let dir = tempdir().unwrap();
        let config = StoreConfig {
            mongo_uri: "mongodb://127.0.0.1:1/".to_string(),
            items_file: dir.path().join("items.json"),
            probe_timeout: Duration::from_millis(200),
            ..StoreConfig::default()
        };

        let selected = select_store(&config).await;
        assert_eq!(selected.backend(), Backend::LocalFile);
        assert_eq!(selected.store().backend(), Backend::LocalFile);
        assert_eq!(
            selected.store().describe(),
            dir.path().join("items.json").display().to_string()
        );
    }

    #[tokio::test]
    async fn test_invalid_uri_falls_back_to_file() {
        let dir = tempdir().unwrap();
        let config = StoreConfig {
            mongo_uri: "definitely not a uri".to_string(),
            items_file: dir.path().join("items.json"),
            probe_timeout: Duration::from_millis(200),
            ..StoreConfig::default()
        };

        let selected = select_store(&config).await;
        assert_eq!(selected.backend(), Backend::LocalFile);
    }

    #[tokio::test]
    async fn test_selection_is_shared_by_clones() {
        let dir = tempdir().unwrap();
        let config = StoreConfig {
            mongo_uri: "mongodb://127.0.0.1:1/".to_string(),
            items_file: dir.path().join("items.json"),
            probe_timeout: Duration::from_millis(200),
            ..StoreConfig::default()
        };

        let selected = select_store(&config).await;
        let clone = selected.clone();
        let item = crate::item::Item::new(Some("shared".to_string()), None).unwrap();
        selected.store().add_item(item).await.unwrap();

        assert_eq!(clone.store().read_items().await.len(), 1);
        assert!(Arc::ptr_eq(selected.store(), clone.store()));
    }
}
