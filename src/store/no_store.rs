use super::Store;
use async_trait::async_trait;

/// A no-op store that always returns an error if called,
/// indicating the store is disabled.
pub struct NoStore;

impl NoStore {
    pub fn new() -> Self {
        NoStore
    }
}

impl Default for NoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for NoStore {
    async fn get_item(&self, _key: &str) -> Result<Option<String>, String> {
        Err("Session store is disabled".into())
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<(), String> {
        Err("Session store is disabled".into())
    }

    async fn remove_item(&self, _key: &str) -> Result<(), String> {
        Err("Session store is disabled".into())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
