//! Selection controller - orchestrates selection, loading, search and
//! navigation
//!
//! One explicitly constructed object owns all selection state; the
//! binding layer holds it behind an `Arc` and forwards user input and
//! external navigation events.

use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::fetch::FetchCoordinator;
use crate::manifest::{Manifest, PostId};
use crate::nav::NavigationSync;
use crate::render::Renderer;
use crate::search::{Debouncer, SearchIndexer};

/// Where a selection transition came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// Direct user action (list click, search result, CLI argument)
    User,
    /// Externally-driven location change (back/forward)
    ExternalNav,
}

/// The selection state machine over a loaded manifest
pub struct SelectionController {
    manifest: Manifest,
    fetcher: Arc<FetchCoordinator>,
    indexer: Arc<SearchIndexer>,
    nav: NavigationSync,
    renderer: Arc<dyn Renderer>,
    filtered: Mutex<Vec<PostId>>,
    active: Mutex<Option<PostId>>,
    index_build: Mutex<CancellationToken>,
}

impl SelectionController {
    /// Create a controller over a manifest and its collaborators. The
    /// filtered set starts as the full manifest.
    pub fn new(
        manifest: Manifest,
        fetcher: Arc<FetchCoordinator>,
        indexer: Arc<SearchIndexer>,
        nav: NavigationSync,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let all: Vec<PostId> = manifest.posts().iter().map(|p| p.id).collect();
        Self {
            manifest,
            fetcher,
            indexer,
            nav,
            renderer,
            filtered: Mutex::new(all),
            active: Mutex::new(None),
            index_build: Mutex::new(CancellationToken::new()),
        }
    }

    /// Pick and load the initial post: the location-encoded id if it
    /// resolves, the manifest's first post otherwise. An empty
    /// manifest shows the empty-results display.
    pub async fn init(&self) {
        let from_location = self
            .nav
            .read_active_id()
            .filter(|id| self.manifest.get(*id).is_some());

        match from_location {
            Some(id) => self.select_post(id, SelectionOrigin::ExternalNav).await,
            None => match self.manifest.posts().first() {
                Some(first) => {
                    let id = first.id;
                    self.select_post(id, SelectionOrigin::User).await;
                }
                None => self.renderer.render_empty(),
            },
        }
    }

    /// Select a post and load its content.
    ///
    /// No-op when `id` is already active (idempotent) or absent from
    /// the current filtered set (guards against stale ids after the
    /// filter changed). External-nav transitions skip the location
    /// write.
    pub async fn select_post(&self, id: PostId, origin: SelectionOrigin) {
        if *self.active.lock().unwrap() == Some(id) {
            tracing::debug!("post {} already selected", id);
            return;
        }
        if !self.filtered.lock().unwrap().contains(&id) {
            tracing::debug!("ignoring stale selection of post {}", id);
            return;
        }
        let post = match self.manifest.get(id) {
            Some(post) => post.clone(),
            None => return,
        };

        *self.active.lock().unwrap() = Some(id);
        if origin != SelectionOrigin::ExternalNav {
            self.nav.write_active_id(id);
        }
        self.fetcher.load(&post).await;
    }

    /// Apply a search query: rebuild the filtered set and re-resolve
    /// the selection. Empty or whitespace-only queries mean no
    /// filtering. A newer query supersedes an in-flight index build.
    pub async fn apply_query(&self, query: &str) {
        let trimmed = query.trim();
        let posts = self.manifest.posts();

        let new_ids: Vec<PostId> = if trimmed.is_empty() {
            posts.iter().map(|p| p.id).collect()
        } else {
            let token = {
                let mut build = self.index_build.lock().unwrap();
                build.cancel();
                *build = CancellationToken::new();
                build.clone()
            };
            if let Err(err) = self.indexer.ensure_indexed(posts, &token).await {
                if err.is_cancelled() {
                    // a newer query took over
                    return;
                }
            }
            self.indexer
                .search(trimmed, posts)
                .iter()
                .map(|p| p.id)
                .collect()
        };

        *self.filtered.lock().unwrap() = new_ids.clone();

        let active = *self.active.lock().unwrap();
        match active {
            // the active post survived the filter: nothing to refresh
            Some(id) if new_ids.contains(&id) => {}
            _ => match new_ids.first() {
                Some(&first) => self.select_post(first, SelectionOrigin::User).await,
                None => {
                    *self.active.lock().unwrap() = None;
                    self.fetcher.cancel_active();
                    self.renderer.render_empty();
                }
            },
        }
    }

    /// React to an externally-driven location change (back/forward).
    /// Never writes the location back.
    pub async fn handle_external_nav(&self) {
        if let Some(id) = self.nav.read_active_id() {
            self.select_post(id, SelectionOrigin::ExternalNav).await;
        }
    }

    /// Debounce a query: schedules `apply_query` after the quiescence
    /// window; a newer keystroke supersedes the pending one.
    pub fn queue_query(
        self: &Arc<Self>,
        debouncer: &Debouncer,
        query: &str,
    ) -> tokio::task::JoinHandle<()> {
        let controller = self.clone();
        let query = query.to_string();
        debouncer.trigger(move || async move {
            controller.apply_query(&query).await;
        })
    }

    /// The currently active post id, if any
    pub fn active(&self) -> Option<PostId> {
        *self.active.lock().unwrap()
    }

    /// The current filtered set, in manifest order
    pub fn filtered_ids(&self) -> Vec<PostId> {
        self.filtered.lock().unwrap().clone()
    }

    /// The manifest this controller was built over
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}
