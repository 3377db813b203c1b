//! Theme preference persistence

use std::sync::{Arc, Mutex};

use super::KeyValueStore;

/// Storage key for the selected theme
const THEME_STORAGE_KEY: &str = "viewer-theme";

/// The theme applied when nothing (or something unknown) is stored
pub const DEFAULT_THEME: &str = "default";

/// Themes a user may select
pub const AVAILABLE_THEMES: [&str; 2] = ["default", "gray"];

/// Selected theme, persisted best-effort
pub struct ThemePreference {
    store: Arc<dyn KeyValueStore>,
    current: Mutex<String>,
}

impl ThemePreference {
    /// Load the stored preference, falling back to the default for
    /// unknown or missing values
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let current = store
            .get(THEME_STORAGE_KEY)
            .filter(|name| AVAILABLE_THEMES.contains(&name.as_str()))
            .unwrap_or_else(|| DEFAULT_THEME.to_string());
        Self {
            store,
            current: Mutex::new(current),
        }
    }

    /// Apply a theme by name; unknown names fall back to the default.
    /// Returns the theme actually applied.
    pub fn apply(&self, name: &str) -> String {
        let safe = if AVAILABLE_THEMES.contains(&name) {
            name
        } else {
            tracing::warn!("unknown theme {:?}, using {:?}", name, DEFAULT_THEME);
            DEFAULT_THEME
        };
        *self.current.lock().unwrap() = safe.to_string();
        self.store.set(THEME_STORAGE_KEY, safe);
        safe.to_string()
    }

    /// The currently applied theme
    pub fn current(&self) -> String {
        self.current.lock().unwrap().clone()
    }
}
