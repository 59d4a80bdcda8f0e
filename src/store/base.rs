use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{file_store::FileStore, memory_store::MemoryStore, no_store::NoStore};
use crate::config::{StoreBackend, StoreConfig};

/// The Store trait abstracts a small durable string key-value map.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, String>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    async fn remove_item(&self, key: &str) -> Result<(), String>;
    fn is_enabled(&self) -> bool {
        // Real stores return true; NoStore returns false so we can write better debug messages
        true
    }
}

/// Creates a concrete store implementation based on the StoreConfig.
/// If `store.enabled = false`, returns NoStore. Otherwise, picks the specified backend.
pub fn create_store(config: &StoreConfig) -> Arc<dyn Store> {
    if !config.enabled {
        info!("Session store is disabled. Using NoStore.");
        return Arc::new(NoStore::new());
    }

    match &config.backend {
        Some(StoreBackend::File(file_config)) => {
            info!("Using file session store at '{}'", file_config.path);
            Arc::new(FileStore::new(file_config))
        }
        Some(StoreBackend::Memory) => {
            info!("Using in-memory session store; sessions will not survive a restart.");
            Arc::new(MemoryStore::new())
        }
        None => {
            warn!("Store is enabled, but no backend config is provided! Falling back to NoStore.");
            Arc::new(NoStore::new())
        }
    }
}
