use crate::error::StoreError;
use crate::traits::DocumentStore;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Documents held in memory, listed in identifier order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: BTreeMap<String, String>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(id, text);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(id.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.documents.keys().cloned().collect())
    }

    async fn read(&self, id: &str) -> Result<String, StoreError> {
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_in_id_order_and_reads_back() -> Result<(), StoreError> {
        let store = MemoryDocumentStore::new()
            .with_document("b.md", "second")
            .with_document("a.md", "first");
        assert_eq!(store.list().await?, vec!["a.md".to_string(), "b.md".to_string()]);
        assert_eq!(store.read("b.md").await?, "second");
        assert!(matches!(store.read("c.md").await, Err(StoreError::NotFound(_))));
        Ok(())
    }
}
