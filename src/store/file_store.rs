use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::Store;

/// Config for the file-backed store.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FileStoreConfig {
    pub path: String,
}

/// Persists entries as a single JSON object on disk.
///
/// Every operation re-reads the file so that the on-disk state stays the
/// source of truth; writes go to a sibling temp file and are renamed into place.
pub struct FileStore {
    path: PathBuf,
    // serialises read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(config: &FileStoreConfig) -> Self {
        Self::at(&config.path)
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, String> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| format!("Corrupt store file '{}': {}", self.path.display(), e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(format!(
                "Failed to read store file '{}': {}",
                self.path.display(),
                e
            )),
        }
    }

    async fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
            }
        }

        let body = serde_json::to_vec_pretty(items)
            .map_err(|e| format!("Failed to serialize store: {}", e))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| format!("Failed to write '{}': {}", tmp.display(), e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| format!("Failed to replace '{}': {}", self.path.display(), e))
    }
}

#[async_trait]
impl Store for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items).await?;
        debug!("Stored key '{}' in '{}'", key, self.path.display());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&items).await?;
        debug!("Removed key '{}' from '{}'", key, self.path.display());
        Ok(())
    }
}
