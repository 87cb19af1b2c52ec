//! Non-persistent `DurableStore` implementation, used for tests and as the
//! caller's explicit choice when no external store is configured (§9).

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::error::StoreError;
use super::traits::DurableStore;

/// `DashMap`-backed in-memory store, cheap to clone via `Arc`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<DashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner.get(key).map(|v| v.clone()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key);
        Ok(())
    }
}
