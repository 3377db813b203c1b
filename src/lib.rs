//! devlog-rs: A fast client for markdown blog sites
//!
//! This crate implements the viewer side of a static markdown blog:
//! it fetches a post manifest, loads and renders per-post markdown,
//! keeps a navigation location in sync with the displayed post, and
//! filters posts through a lazily built search index.

pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod nav;
pub mod render;
pub mod search;
pub mod source;
pub mod storage;
pub mod store;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::controller::SelectionController;
use crate::fetch::FetchCoordinator;
use crate::manifest::Manifest;
use crate::nav::{MemoryLocation, NavigationSync};
use crate::render::HtmlRenderer;
use crate::search::{Debouncer, SearchIndexer};
use crate::source::{DirSource, HttpSource, PostSource};
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::store::ContentStore;

/// The main viewer application
#[derive(Clone)]
pub struct Viewer {
    /// Viewer configuration
    pub config: config::ViewerConfig,
    /// Base directory (local site root and storage anchor)
    pub base_dir: std::path::PathBuf,
}

impl Viewer {
    /// Create a new Viewer instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("viewer.yml");

        let config = if config_path.exists() {
            config::ViewerConfig::load(&config_path)?
        } else {
            config::ViewerConfig::default()
        };

        Ok(Self { config, base_dir })
    }

    /// The post source: HTTP when a site URL is configured, the local
    /// base directory otherwise
    pub fn source(&self) -> Arc<dyn PostSource> {
        if self.config.url.is_empty() {
            Arc::new(DirSource::new(&self.base_dir))
        } else {
            Arc::new(HttpSource::new(&self.config.url))
        }
    }

    /// The preferences/hearts store under the base directory
    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(JsonFileStore::open(
            self.base_dir.join(&self.config.storage_file),
        ))
    }

    /// Fetch the manifest and assemble a viewing session
    pub async fn session(&self) -> Result<Session> {
        let source = self.source();
        let payload = source.fetch_manifest().await?;
        let manifest = Manifest::from_json(&payload)?;
        tracing::debug!("manifest loaded: {} posts", manifest.len());

        let store = Arc::new(ContentStore::new(source));
        let renderer = Arc::new(HtmlRenderer::new(&self.config.highlight.theme));
        let fetcher = Arc::new(FetchCoordinator::new(store.clone(), renderer.clone()));
        let indexer = Arc::new(SearchIndexer::new(store));
        let location = Arc::new(MemoryLocation::new());
        let nav = NavigationSync::new(location.clone());

        let controller = Arc::new(SelectionController::new(
            manifest,
            fetcher,
            indexer,
            nav,
            renderer.clone(),
        ));

        Ok(Session {
            controller,
            renderer,
            location,
            debouncer: Debouncer::new(Duration::from_millis(self.config.debounce_ms)),
        })
    }
}

/// An assembled viewing session over a fetched manifest
pub struct Session {
    /// The selection state machine
    pub controller: Arc<SelectionController>,
    /// The HTML display sink
    pub renderer: Arc<HtmlRenderer>,
    /// The in-process location backend
    pub location: Arc<MemoryLocation>,
    /// Debouncer for search input
    pub debouncer: Debouncer,
}
