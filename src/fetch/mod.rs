//! Fetch coordination - at most one live content load
//!
//! The coordinator owns the single "current" cancellable load. A new
//! `load` supersedes the previous one: its token is cancelled and its
//! eventual result is discarded unconditionally, even if it resolves
//! successfully afterwards. Only the still-current load may touch the
//! renderer.

use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::ViewerError;
use crate::manifest::Post;
use crate::render::Renderer;
use crate::store::ContentStore;

/// Lifecycle of the current load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No load requested yet
    Idle,
    /// A fetch is outstanding
    Loading,
    /// The last load reached the renderer
    Rendered,
    /// The last load failed and the error display was shown
    Failed,
    /// The last load was cancelled; nothing was shown
    Cancelled,
}

struct CurrentLoad {
    generation: u64,
    token: CancellationToken,
    state: LoadState,
}

/// Coordinates content loads so only the newest result ever renders
pub struct FetchCoordinator {
    store: Arc<ContentStore>,
    renderer: Arc<dyn Renderer>,
    current: Mutex<CurrentLoad>,
}

impl FetchCoordinator {
    /// Create a coordinator over a store and a renderer
    pub fn new(store: Arc<ContentStore>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            store,
            renderer,
            current: Mutex::new(CurrentLoad {
                generation: 0,
                token: CancellationToken::new(),
                state: LoadState::Idle,
            }),
        }
    }

    /// Load a post's content and hand it to the renderer.
    ///
    /// Supersedes any outstanding load first. Exactly one of
    /// rendered / error-displayed / silently-cancelled happens per
    /// call.
    pub async fn load(&self, post: &Post) {
        let (generation, token) = self.begin();
        tracing::debug!("load post {} ({})", post.id, post.file);
        let result = self.store.get(&post.file, &token).await;
        self.complete(generation, post, result);
    }

    /// Cancel the outstanding load, if any. The in-flight completion
    /// clears the loading indicator itself.
    pub fn cancel_active(&self) {
        let current = self.current.lock().unwrap();
        if current.state == LoadState::Loading {
            current.token.cancel();
        }
    }

    /// Current state of the load machine
    pub fn state(&self) -> LoadState {
        self.current.lock().unwrap().state
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let mut current = self.current.lock().unwrap();
        // supersede: the previous load's result must never render
        current.token.cancel();
        current.generation += 1;
        current.token = CancellationToken::new();
        current.state = LoadState::Loading;
        self.renderer.set_loading(true);
        (current.generation, current.token.clone())
    }

    /// Completion checks liveness under the same lock that guards
    /// supersession, so a stale result can never interleave with a
    /// newer `begin`. Renderer calls happen under the lock; renderers
    /// must not call back into the coordinator.
    fn complete(&self, generation: u64, post: &Post, result: Result<Arc<str>, ViewerError>) {
        let mut current = self.current.lock().unwrap();
        if current.generation != generation {
            tracing::debug!("discarding superseded load of post {}", post.id);
            return;
        }

        self.renderer.set_loading(false);
        match result {
            Ok(text) => {
                current.state = LoadState::Rendered;
                self.renderer.render(post, &text);
            }
            Err(err) if err.is_cancelled() => {
                current.state = LoadState::Cancelled;
            }
            Err(err) => {
                tracing::warn!("load of post {} failed: {}", post.id, err);
                current.state = LoadState::Failed;
                self.renderer.render_error(&err.to_string());
            }
        }
    }
}
