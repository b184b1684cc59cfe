use async_trait::async_trait;

use crate::error::StoreError;

/// Asynchronous key-value persistence.
///
/// Implementations report failures through `StoreError` and must apply
/// operations on the same key in the order they were awaited.
#[async_trait]
pub trait DurableStore: Send + Sync {
    fn name(&self) -> &str;
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
