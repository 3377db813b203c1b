//! Per-post heart (like) state

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use super::KeyValueStore;
use crate::manifest::PostId;

/// Storage key for the heart state blob
const HEART_STATE_KEY: &str = "post-heart-state";

/// Listener invoked after a post's liked flag changes
pub type HeartListener = Box<dyn Fn(PostId, bool) + Send + Sync>;

/// Liked-post tracking with change notifications.
///
/// State is persisted best-effort as a JSON array of ids; a broken
/// stored blob resets to empty.
pub struct HeartStore {
    store: Arc<dyn KeyValueStore>,
    liked: Mutex<BTreeSet<PostId>>,
    listeners: Mutex<Vec<HeartListener>>,
}

impl HeartStore {
    /// Load heart state from the key-value store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let liked = match store.get(HEART_STATE_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(ids) => ids,
                Err(err) => {
                    tracing::warn!("resetting unreadable heart state: {}", err);
                    BTreeSet::new()
                }
            },
            None => BTreeSet::new(),
        };
        Self {
            store,
            liked: Mutex::new(liked),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Whether a post is liked
    pub fn is_liked(&self, id: PostId) -> bool {
        self.liked.lock().unwrap().contains(&id)
    }

    /// Set a post's liked flag, persist, and notify listeners
    pub fn set_liked(&self, id: PostId, liked: bool) {
        {
            let mut set = self.liked.lock().unwrap();
            let changed = if liked { set.insert(id) } else { set.remove(&id) };
            if !changed {
                return;
            }
            self.persist(&set);
        }
        for listener in self.listeners.lock().unwrap().iter() {
            listener(id, liked);
        }
    }

    /// Flip a post's liked flag; returns the new state
    pub fn toggle(&self, id: PostId) -> bool {
        let liked = !self.is_liked(id);
        self.set_liked(id, liked);
        liked
    }

    /// All liked post ids, ascending
    pub fn liked_ids(&self) -> Vec<PostId> {
        self.liked.lock().unwrap().iter().copied().collect()
    }

    /// Register a change listener
    pub fn subscribe(&self, listener: HeartListener) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn persist(&self, set: &BTreeSet<PostId>) {
        match serde_json::to_string(set) {
            Ok(raw) => self.store.set(HEART_STATE_KEY, &raw),
            Err(err) => tracing::warn!("cannot serialize heart state: {}", err),
        }
    }
}
