use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;

/// Keeps entries in process memory. Handy for tests and for ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store that already holds the given entries.
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStore {
            items: RwLock::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Snapshot of every entry, mostly useful for assertions.
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.items.read().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), String> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("auth_token").await.unwrap(), None);

        store.set_item("auth_token", "abc123").await.unwrap();
        assert_eq!(
            store.get_item("auth_token").await.unwrap().as_deref(),
            Some("abc123")
        );

        store.remove_item("auth_token").await.unwrap();
        assert_eq!(store.get_item("auth_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_removing_missing_key_is_ok() {
        let store = MemoryStore::with_items([("a", "1")]);
        assert!(store.remove_item("b").await.is_ok());
        assert_eq!(store.snapshot().await.len(), 1);
    }
}
