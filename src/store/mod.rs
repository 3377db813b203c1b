//! Content store - session-scoped cache of post bodies
//!
//! Entries are keyed by locator and write-once in practice: bodies are
//! immutable for the session, so overlapping fetches of the same
//! locator converge to the same value. The cache is unbounded for the
//! session lifetime; post counts are small.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::ViewerError;
use crate::source::PostSource;

/// Caching front over a `PostSource`
pub struct ContentStore {
    source: Arc<dyn PostSource>,
    cache: Mutex<HashMap<String, Arc<str>>>,
}

impl ContentStore {
    /// Create a store over a source
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Get a post body, from cache or by fetching.
    ///
    /// Cache hits resolve immediately and are never cancelled. A miss
    /// races the fetch against `cancel`; a cancelled fetch caches
    /// nothing. Failures are not cached either, so a later call
    /// re-attempts the fetch.
    pub async fn get(
        &self,
        locator: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<str>, ViewerError> {
        if let Some(hit) = self.cache.lock().unwrap().get(locator) {
            tracing::debug!("cache hit: {}", locator);
            return Ok(hit.clone());
        }
        if cancel.is_cancelled() {
            return Err(ViewerError::Cancelled);
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => return Err(ViewerError::Cancelled),
            result = self.source.fetch_content(locator) => result?,
        };

        let body: Arc<str> = fetched.into();
        self.cache
            .lock()
            .unwrap()
            .insert(locator.to_string(), body.clone());
        Ok(body)
    }

    /// Whether a locator is already cached
    pub fn contains(&self, locator: &str) -> bool {
        self.cache.lock().unwrap().contains_key(locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::MemorySource;

    fn store_with(source: MemorySource) -> (ContentStore, Arc<MemorySource>) {
        let source = Arc::new(source);
        (ContentStore::new(source.clone()), source)
    }

    #[tokio::test]
    async fn test_second_get_hits_cache() {
        let source = MemorySource::new();
        source.insert("a.md", "body of a");
        let (store, source) = store_with(source);
        let cancel = CancellationToken::new();

        let first = store.get("a.md", &cancel).await.unwrap();
        let second = store.get("a.md", &cancel).await.unwrap();
        assert_eq!(&*first, "body of a");
        assert_eq!(first, second);
        assert_eq!(source.fetch_count("a.md"), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_ignores_cancellation() {
        let source = MemorySource::new();
        source.insert("a.md", "body");
        let (store, _source) = store_with(source);

        store.get("a.md", &CancellationToken::new()).await.unwrap();

        let cancelled = CancellationToken::new();
        cancelled.cancel();
        let hit = store.get("a.md", &cancelled).await.unwrap();
        assert_eq!(&*hit, "body");
    }

    #[tokio::test]
    async fn test_cancelled_miss_caches_nothing() {
        let source = MemorySource::new();
        source.insert("a.md", "body");
        source.hold("a.md");
        let (store, source) = store_with(source);
        let store = Arc::new(store);

        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let store = store.clone();
            let cancel = cancel.clone();
            async move { store.get("a.md", &cancel).await }
        });

        // let the fetch park on the gate, then cancel
        tokio::task::yield_now().await;
        cancel.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(ViewerError::Cancelled)));
        assert!(!store.contains("a.md"));

        // a fresh call re-attempts the fetch
        source.release("a.md");
        let body = store.get("a.md", &CancellationToken::new()).await.unwrap();
        assert_eq!(&*body, "body");
    }

    #[tokio::test]
    async fn test_failure_not_cached() {
        let source = MemorySource::new();
        source.fail("gone.md");
        let (store, source) = store_with(source);
        let cancel = CancellationToken::new();

        let err = store.get("gone.md", &cancel).await.unwrap_err();
        assert!(matches!(err, ViewerError::ContentUnavailable { .. }));
        assert!(!store.contains("gone.md"));

        // each attempt goes back to the source
        let _ = store.get("gone.md", &cancel).await;
        assert_eq!(source.fetch_count("gone.md"), 2);
    }
}
