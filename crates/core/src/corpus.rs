use crate::error::{EngineError, Result, StoreError};
use crate::models::{Document, SkippedDocument};
use crate::traits::DocumentStore;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Cooperative cancellation shared between a caller and running scans.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Every readable document in listing order, plus the ones that failed.
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    pub documents: Vec<Document>,
    pub skipped: Vec<SkippedDocument>,
}

/// A corpus-wide result together with the documents it had to skip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanOutcome<T> {
    #[serde(flatten)]
    pub result: T,
    pub skipped_documents: Vec<SkippedDocument>,
}

impl<T> ScanOutcome<T> {
    pub fn new(result: T, skipped_documents: Vec<SkippedDocument>) -> Self {
        Self {
            result,
            skipped_documents,
        }
    }
}

enum Fetched {
    Text(std::result::Result<String, StoreError>),
    Cancelled,
}

pub async fn load_corpus<S>(
    store: Arc<S>,
    max_concurrent_reads: usize,
    cancel: &CancelFlag,
) -> Result<CorpusSnapshot>
where
    S: DocumentStore + 'static,
{
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }

    let ids = store.list().await?;
    debug!(documents = ids.len(), max_concurrent_reads, "loading corpus");

    let semaphore = Arc::new(Semaphore::new(max_concurrent_reads.max(1)));
    let mut set = JoinSet::new();
    for (position, id) in ids.into_iter().enumerate() {
        let store = Arc::clone(&store);
        let semaphore = Arc::clone(&semaphore);
        let cancel = cancel.clone();

        set.spawn(async move {
            let permit = semaphore.acquire_owned().await;
            if permit.is_err() || cancel.is_cancelled() {
                return (position, id, Fetched::Cancelled);
            }
            let text = store.read(&id).await;
            (position, id, Fetched::Text(text))
        });
    }

    let mut loaded: Vec<(usize, Document)> = Vec::new();
    let mut skipped: Vec<(usize, SkippedDocument)> = Vec::new();
    while let Some(joined) = set.join_next().await {
        let (position, id, fetched) = joined?;
        let Fetched::Text(text) = fetched else {
            set.abort_all();
            return Err(EngineError::Cancelled);
        };
        if cancel.is_cancelled() {
            set.abort_all();
            return Err(EngineError::Cancelled);
        }

        match text {
            Ok(text) => loaded.push((position, Document::new(id, text))),
            Err(error) => {
                warn!(document = %id, error = %error, "skipping unreadable document");
                skipped.push((
                    position,
                    SkippedDocument {
                        id,
                        reason: error.to_string(),
                    },
                ));
            }
        }
    }

    loaded.sort_unstable_by_key(|(position, _)| *position);
    skipped.sort_unstable_by_key(|(position, _)| *position);
    Ok(CorpusSnapshot {
        documents: loaded.into_iter().map(|(_, document)| document).collect(),
        skipped: skipped.into_iter().map(|(_, skipped)| skipped).collect(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::stores::MemoryDocumentStore;
    use async_trait::async_trait;

    /// Memory store whose reads fail for ids containing `broken`.
    pub(crate) struct FlakyStore {
        pub(crate) inner: MemoryDocumentStore,
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn list(&self) -> std::result::Result<Vec<String>, StoreError> {
            self.inner.list().await
        }

        async fn read(&self, id: &str) -> std::result::Result<String, StoreError> {
            if id.contains("broken") {
                return Err(StoreError::Io {
                    path: id.to_string(),
                    source: std::io::Error::other("disk unplugged"),
                });
            }
            self.inner.read(id).await
        }
    }

    fn numbered_store(count: usize) -> MemoryDocumentStore {
        (0..count).fold(MemoryDocumentStore::new(), |store, index| {
            store.with_document(format!("doc{index:02}.md"), format!("Document number {index}."))
        })
    }

    #[tokio::test]
    async fn snapshot_keeps_listing_order() -> Result<()> {
        let store = Arc::new(numbered_store(12));
        let snapshot = load_corpus(store, 3, &CancelFlag::new()).await?;
        let ids: Vec<&str> = snapshot.documents.iter().map(|document| document.id.as_str()).collect();
        let expected: Vec<String> = (0..12).map(|index| format!("doc{index:02}.md")).collect();
        assert_eq!(ids, expected);
        assert!(snapshot.skipped.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn failed_reads_are_skipped_not_fatal() -> Result<()> {
        let inner = numbered_store(2).with_document("broken.md", "never read");
        let store = Arc::new(FlakyStore { inner });
        let snapshot = load_corpus(store, 2, &CancelFlag::new()).await?;
        assert_eq!(snapshot.documents.len(), 2);
        assert_eq!(snapshot.skipped.len(), 1);
        assert_eq!(snapshot.skipped[0].id, "broken.md");
        assert!(snapshot.skipped[0].reason.contains("disk unplugged"));
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_scan_returns_no_partial_results() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = load_corpus(Arc::new(numbered_store(4)), 2, &cancel).await;
        assert!(matches!(result, Err(EngineError::Cancelled)));

        cancel.reset();
        assert!(load_corpus(Arc::new(numbered_store(4)), 2, &cancel).await.is_ok());
    }

    #[test]
    fn scan_outcome_flattens_result() -> std::result::Result<(), serde_json::Error> {
        #[derive(Serialize)]
        struct Count {
            total: usize,
        }
        let outcome = ScanOutcome::new(Count { total: 3 }, Vec::new());
        let value = serde_json::to_value(&outcome)?;
        assert_eq!(value["total"], 3);
        assert!(value["skipped_documents"].as_array().is_some_and(|items| items.is_empty()));
        Ok(())
    }
}
