//! Search - lazily built normalized index over post text

mod debounce;

pub use debounce::Debouncer;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::ViewerError;
use crate::manifest::{Post, PostId};
use crate::store::ContentStore;

/// Normalize text for substring matching: case-folded, every
/// non-alphanumeric character (markdown punctuation included)
/// collapsed to a single space, trimmed.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_space = true;
        }
    }
    out
}

struct IndexEntry {
    title: String,
    content: Option<String>,
}

/// Lazily built search index.
///
/// Titles are indexed the first time a post is seen; content is
/// fetched through the `ContentStore` on demand. A failed content
/// fetch degrades that post to title-only matching; the entry stays
/// content-less so a later build re-attempts the fetch.
pub struct SearchIndexer {
    store: Arc<ContentStore>,
    index: Mutex<HashMap<PostId, IndexEntry>>,
}

impl SearchIndexer {
    /// Create an indexer over a content store
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self {
            store,
            index: Mutex::new(HashMap::new()),
        }
    }

    /// Make sure every given post is indexed, fetching missing content
    /// bodies. Cancellable; a cancelled build leaves already-indexed
    /// entries in place (the index only ever grows).
    pub async fn ensure_indexed(
        &self,
        posts: &[Post],
        cancel: &CancellationToken,
    ) -> Result<(), ViewerError> {
        for post in posts {
            self.index
                .lock()
                .unwrap()
                .entry(post.id)
                .or_insert_with(|| IndexEntry {
                    title: normalize(&post.title),
                    content: None,
                });

            let needs_content = self
                .index
                .lock()
                .unwrap()
                .get(&post.id)
                .map(|e| e.content.is_none())
                .unwrap_or(false);
            if !needs_content {
                continue;
            }

            match self.store.get(&post.file, cancel).await {
                Ok(body) => {
                    let normalized = normalize(&body);
                    if let Some(entry) = self.index.lock().unwrap().get_mut(&post.id) {
                        entry.content = Some(normalized);
                    }
                }
                Err(err) if err.is_cancelled() => return Err(err),
                Err(err) => {
                    // title stays searchable, content matching degrades
                    tracing::warn!("indexing content of post {} failed: {}", post.id, err);
                }
            }
        }
        Ok(())
    }

    /// Filter posts whose normalized title or content contains the
    /// normalized query as a substring. Pure and synchronous over the
    /// already-built index; input order is preserved. Empty-query
    /// policy belongs to the caller.
    pub fn search<'a>(&self, query: &str, posts: &'a [Post]) -> Vec<&'a Post> {
        let needle = normalize(query);
        if needle.is_empty() {
            return Vec::new();
        }
        let index = self.index.lock().unwrap();
        posts
            .iter()
            .filter(|post| match index.get(&post.id) {
                Some(entry) => {
                    entry.title.contains(&needle)
                        || entry
                            .content
                            .as_ref()
                            .map(|c| c.contains(&needle))
                            .unwrap_or(false)
                }
                None => false,
            })
            .collect()
    }

    /// Whether a post's content made it into the index
    pub fn has_content(&self, id: PostId) -> bool {
        self.index
            .lock()
            .unwrap()
            .get(&id)
            .map(|e| e.content.is_some())
            .unwrap_or(false)
    }
}
