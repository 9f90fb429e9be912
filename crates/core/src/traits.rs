use crate::error::StoreError;
use async_trait::async_trait;

/// Source of raw document text, keyed by root-relative identifier.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every readable document identifier, in a stable order.
    async fn list(&self) -> Result<Vec<String>, StoreError>;

    async fn read(&self, id: &str) -> Result<String, StoreError>;
}
