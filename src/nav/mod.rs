//! Navigation sync - mapping the active post id to the location
//!
//! The location is an abstract query string + fragment pair behind the
//! `LocationBackend` trait. Writes use replace semantics (no history
//! entry) and are no-ops when the id is already encoded, which breaks
//! feedback loops with externally-driven location changes.

use percent_encoding::percent_decode_str;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::manifest::PostId;

/// Query parameter carrying the active post id
const QUERY_KEY: &str = "post";

/// Fragment prefix carrying the active post id
const FRAGMENT_PREFIX: &str = "post-";

/// An abstract location: query string and fragment, no path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Raw query string without the leading `?`
    pub query: Option<String>,
    /// Raw fragment without the leading `#`
    pub fragment: Option<String>,
}

impl Location {
    /// Value of a query parameter, percent-decoded
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        for pair in query.split('&') {
            let mut parts = pair.splitn(2, '=');
            if parts.next() == Some(key) {
                let raw = parts.next().unwrap_or("");
                return Some(percent_decode_str(raw).decode_utf8_lossy().into_owned());
            }
        }
        None
    }

    /// Set a query parameter, replacing an existing one
    pub fn set_query_param(&mut self, key: &str, value: &str) {
        let mut pairs: Vec<String> = self
            .query
            .as_deref()
            .unwrap_or("")
            .split('&')
            .filter(|p| !p.is_empty() && p.splitn(2, '=').next() != Some(key))
            .map(|p| p.to_string())
            .collect();
        pairs.push(format!("{}={}", key, value));
        self.query = Some(pairs.join("&"));
    }
}

/// Location read/replace backend.
///
/// `replace` must not create a history entry. Externally-driven
/// changes (back/forward) are the backend's own business; bindings
/// forward them to the controller.
pub trait LocationBackend: Send + Sync {
    /// The current location
    fn current(&self) -> Location;

    /// Replace the current location without a new history entry
    fn replace(&self, location: Location);
}

/// Listener invoked on externally-driven location changes
pub type LocationListener = Box<dyn Fn(&Location) + Send + Sync>;

/// In-memory location backend with a write counter and an
/// external-change listener registry. Also the test double.
#[derive(Default)]
pub struct MemoryLocation {
    current: Mutex<Location>,
    writes: AtomicU64,
    listeners: Mutex<Vec<LocationListener>>,
}

impl MemoryLocation {
    /// Create an empty location
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `replace` recorded a change
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Simulate an externally-driven change (back/forward): updates
    /// the location without counting a write and notifies listeners.
    pub fn navigate(&self, location: Location) {
        *self.current.lock().unwrap() = location.clone();
        for listener in self.listeners.lock().unwrap().iter() {
            listener(&location);
        }
    }

    /// Register an external-change listener
    pub fn subscribe(&self, listener: LocationListener) {
        self.listeners.lock().unwrap().push(listener);
    }
}

impl LocationBackend for MemoryLocation {
    fn current(&self) -> Location {
        self.current.lock().unwrap().clone()
    }

    fn replace(&self, location: Location) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().unwrap() = location;
    }
}

/// Bidirectional id <-> location mapping
pub struct NavigationSync {
    backend: Arc<dyn LocationBackend>,
}

impl NavigationSync {
    /// Create a sync over a location backend
    pub fn new(backend: Arc<dyn LocationBackend>) -> Self {
        Self { backend }
    }

    /// Parse the active post id out of the location. The query
    /// parameter takes precedence over the fragment.
    pub fn read_active_id(&self) -> Option<PostId> {
        let location = self.backend.current();

        if let Some(value) = location.query_param(QUERY_KEY) {
            if let Ok(id) = value.parse() {
                return Some(id);
            }
        }

        let fragment = location.fragment.as_deref()?;
        let raw = fragment.strip_prefix(FRAGMENT_PREFIX)?;
        percent_decode_str(raw)
            .decode_utf8_lossy()
            .parse()
            .ok()
    }

    /// Encode the id into the location with replace semantics. A
    /// no-op when the id is already the one encoded, preventing
    /// history churn.
    pub fn write_active_id(&self, id: PostId) {
        if self.read_active_id() == Some(id) {
            return;
        }
        let mut location = self.backend.current();
        location.set_query_param(QUERY_KEY, &id.to_string());
        self.backend.replace(location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync_with_backend() -> (NavigationSync, Arc<MemoryLocation>) {
        let backend = Arc::new(MemoryLocation::new());
        (NavigationSync::new(backend.clone()), backend)
    }

    #[test]
    fn test_round_trip() {
        let (sync, backend) = sync_with_backend();

        sync.write_active_id(42);
        assert_eq!(sync.read_active_id(), Some(42));
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn test_redundant_write_is_noop() {
        let (sync, backend) = sync_with_backend();

        sync.write_active_id(42);
        sync.write_active_id(42);
        assert_eq!(backend.write_count(), 1);
        assert_eq!(sync.read_active_id(), Some(42));
    }

    #[test]
    fn test_query_wins_over_fragment() {
        let (sync, backend) = sync_with_backend();
        backend.navigate(Location {
            query: Some("post=7".to_string()),
            fragment: Some("post-9".to_string()),
        });
        assert_eq!(sync.read_active_id(), Some(7));
    }

    #[test]
    fn test_fragment_fallback() {
        let (sync, backend) = sync_with_backend();
        backend.navigate(Location {
            query: None,
            fragment: Some("post-9".to_string()),
        });
        assert_eq!(sync.read_active_id(), Some(9));
    }

    #[test]
    fn test_write_preserves_other_params() {
        let (sync, backend) = sync_with_backend();
        backend.navigate(Location {
            query: Some("lang=en&post=1".to_string()),
            fragment: None,
        });

        sync.write_active_id(2);
        let query = backend.current().query.unwrap();
        assert!(query.contains("lang=en"));
        assert!(query.contains("post=2"));
        assert!(!query.contains("post=1"));
    }

    #[test]
    fn test_unparseable_id_reads_none() {
        let (sync, backend) = sync_with_backend();
        backend.navigate(Location {
            query: Some("post=abc".to_string()),
            fragment: None,
        });
        assert_eq!(sync.read_active_id(), None);
    }

    #[test]
    fn test_external_navigate_counts_no_write() {
        let (sync, backend) = sync_with_backend();
        backend.navigate(Location {
            query: Some("post=3".to_string()),
            fragment: None,
        });
        assert_eq!(backend.write_count(), 0);
        assert_eq!(sync.read_active_id(), Some(3));
    }

    #[test]
    fn test_listeners_notified_on_navigate() {
        let backend = Arc::new(MemoryLocation::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        backend.subscribe(Box::new({
            let seen = seen.clone();
            move |location: &Location| {
                seen.lock().unwrap().push(location.clone());
            }
        }));

        backend.navigate(Location {
            query: Some("post=5".to_string()),
            fragment: None,
        });
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
