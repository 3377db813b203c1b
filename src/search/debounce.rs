//! Debounced task scheduling for search input
//!
//! A new trigger supersedes the pending one using the same generation
//! technique the fetch coordinator uses: the delayed task re-checks
//! the generation after sleeping and runs only if it is still the
//! newest trigger.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default quiescence window for search input
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Single-flight debounce timer
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    /// Create a debouncer with the given quiescence window
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule `action` to run after the quiescence window, unless a
    /// newer trigger arrives first. Returns the task handle so callers
    /// can await settlement.
    pub fn trigger<F, Fut>(&self, action: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = self.generation.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) == generation {
                action().await;
            }
        })
    }

    /// Drop the pending trigger without scheduling a new one
    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
