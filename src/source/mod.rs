//! Post sources - where manifest and content bodies come from
//!
//! The core only speaks the `PostSource` contract; concrete sources
//! fetch over HTTP or read a local site directory.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::ViewerError;

/// Manifest file name inside a site root
pub const MANIFEST_FILE: &str = "manifest.json";

/// Supplies the raw manifest payload and raw post bodies.
///
/// Both calls surface failures through the viewer error taxonomy;
/// transport details never leak past this trait.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch the manifest JSON payload
    async fn fetch_manifest(&self) -> Result<String, ViewerError>;

    /// Fetch the raw markdown body behind a locator
    async fn fetch_content(&self, locator: &str) -> Result<String, ViewerError>;
}

/// HTTP-backed source for a hosted blog site
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source rooted at a site base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_text(&self, path: &str) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(self.url_for(path))
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
}

#[async_trait]
impl PostSource for HttpSource {
    async fn fetch_manifest(&self) -> Result<String, ViewerError> {
        self.get_text(MANIFEST_FILE)
            .await
            .map_err(ViewerError::manifest)
    }

    async fn fetch_content(&self, locator: &str) -> Result<String, ViewerError> {
        self.get_text(locator).await.map_err(ViewerError::content)
    }
}

/// Filesystem source for a local site checkout.
///
/// Reads exactly the files the manifest names; no directory scanning.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a source rooted at a local site directory
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    async fn read_file(&self, relative: &str) -> std::io::Result<String> {
        tokio::fs::read_to_string(self.root.join(relative)).await
    }
}

#[async_trait]
impl PostSource for DirSource {
    async fn fetch_manifest(&self) -> Result<String, ViewerError> {
        self.read_file(MANIFEST_FILE)
            .await
            .map_err(ViewerError::manifest)
    }

    async fn fetch_content(&self, locator: &str) -> Result<String, ViewerError> {
        self.read_file(locator).await.map_err(ViewerError::content)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory source with failure injection and fetch gating, used
    //! across the core's tests to script interleavings deterministically.

    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Semaphore;

    #[derive(Default)]
    pub struct MemorySource {
        manifest: Mutex<Option<String>>,
        contents: Mutex<HashMap<String, String>>,
        failing: Mutex<HashSet<String>>,
        gates: Mutex<HashMap<String, Arc<Semaphore>>>,
        fetches: Mutex<HashMap<String, usize>>,
    }

    impl MemorySource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_manifest(&self, json: &str) {
            *self.manifest.lock().unwrap() = Some(json.to_string());
        }

        pub fn insert(&self, locator: &str, body: &str) {
            self.contents
                .lock()
                .unwrap()
                .insert(locator.to_string(), body.to_string());
        }

        /// Make fetches of `locator` fail with `ContentUnavailable`
        pub fn fail(&self, locator: &str) {
            self.failing.lock().unwrap().insert(locator.to_string());
        }

        /// Park fetches of `locator` until `release` is called
        pub fn hold(&self, locator: &str) {
            self.gates
                .lock()
                .unwrap()
                .insert(locator.to_string(), Arc::new(Semaphore::new(0)));
        }

        /// Let one parked fetch of `locator` proceed
        pub fn release(&self, locator: &str) {
            if let Some(gate) = self.gates.lock().unwrap().get(locator) {
                gate.add_permits(1);
            }
        }

        /// How many times `locator` was actually fetched
        pub fn fetch_count(&self, locator: &str) -> usize {
            *self.fetches.lock().unwrap().get(locator).unwrap_or(&0)
        }
    }

    #[async_trait]
    impl PostSource for MemorySource {
        async fn fetch_manifest(&self) -> Result<String, ViewerError> {
            let manifest = self.manifest.lock().unwrap().clone();
            manifest.ok_or_else(|| ViewerError::manifest("no manifest"))
        }

        async fn fetch_content(&self, locator: &str) -> Result<String, ViewerError> {
            *self
                .fetches
                .lock()
                .unwrap()
                .entry(locator.to_string())
                .or_insert(0) += 1;

            let gate = self.gates.lock().unwrap().get(locator).cloned();
            if let Some(gate) = gate {
                let permit = gate.acquire().await.map_err(ViewerError::content)?;
                permit.forget();
            }

            if self.failing.lock().unwrap().contains(locator) {
                return Err(ViewerError::content(format!("no such post: {}", locator)));
            }
            let body = self.contents.lock().unwrap().get(locator).cloned();
            body.ok_or_else(|| ViewerError::content(format!("no such post: {}", locator)))
        }
    }
}
