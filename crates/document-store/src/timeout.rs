use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::{CustomerId, Document, Result, StoreError, Version, WishlistId, store::DocumentStore};

/// Default bound for a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Decorator that bounds every call on the wrapped store.
///
/// A call that does not finish within the timeout is abandoned and reported
/// as `StoreError::Timeout`. An abandoned save may still land in the backing
/// store; since it carries its expected version it can only ever apply to
/// the state it was computed from.
#[derive(Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: DocumentStore> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(StoreError::Timeout {
                    operation,
                    after: self.timeout,
                })
            }
        }
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for TimeoutStore<S> {
    async fn load(&self, id: WishlistId) -> Result<Option<Document>> {
        self.bounded("load", self.inner.load(id)).await
    }

    async fn find_by_owner(&self, owner_id: &CustomerId) -> Result<Option<Document>> {
        self.bounded("find_by_owner", self.inner.find_by_owner(owner_id))
            .await
    }

    async fn save(&self, document: Document, expected_version: Version) -> Result<Version> {
        self.bounded("save", self.inner.save(document, expected_version))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryDocumentStore;

    /// Store whose calls never finish quickly enough.
    struct SlowStore {
        delay: Duration,
    }

    #[async_trait]
    impl DocumentStore for SlowStore {
        async fn load(&self, _id: WishlistId) -> Result<Option<Document>> {
            tokio::time::sleep(self.delay).await;
            Ok(None)
        }

        async fn find_by_owner(&self, _owner_id: &CustomerId) -> Result<Option<Document>> {
            tokio::time::sleep(self.delay).await;
            Ok(None)
        }

        async fn save(&self, _document: Document, expected_version: Version) -> Result<Version> {
            tokio::time::sleep(self.delay).await;
            Ok(expected_version.next())
        }
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let store = TimeoutStore::new(InMemoryDocumentStore::new(), DEFAULT_STORE_TIMEOUT);
        assert_eq!(store.timeout(), Duration::from_secs(2));
        let doc = Document::new(
            WishlistId::new(),
            CustomerId::new("c-1"),
            serde_json::json!({}),
        );
        let id = doc.id;

        let version = store.save(doc, Version::initial()).await.unwrap();
        assert_eq!(version, Version::first());
        assert!(store.load(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn slow_calls_time_out() {
        let store = TimeoutStore::new(
            SlowStore {
                delay: Duration::from_millis(500),
            },
            Duration::from_millis(20),
        );

        let result = store.find_by_owner(&CustomerId::new("c-1")).await;
        assert!(matches!(
            result,
            Err(StoreError::Timeout {
                operation: "find_by_owner",
                ..
            })
        ));

        let doc = Document::new(
            WishlistId::new(),
            CustomerId::new("c-1"),
            serde_json::json!({}),
        );
        let result = store.save(doc, Version::initial()).await;
        assert!(matches!(
            result,
            Err(StoreError::Timeout { operation: "save", .. })
        ));
    }
}
