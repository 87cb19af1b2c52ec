//! `DurableStore` — the abstract key/value service used for crash-recoverable
//! buffering (§4.2). No ordering or transactional guarantees are assumed.

use async_trait::async_trait;

use super::error::StoreError;

#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
