//! Viewer configuration (viewer.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    // Site
    /// Base URL of the hosted site; empty means local directory mode
    pub url: String,
    /// Display title shown by the CLI
    pub title: String,

    // Behavior
    /// Search debounce window in milliseconds
    pub debounce_ms: u64,
    /// Selected display theme
    pub theme: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Storage
    /// Path of the preferences/hearts db, relative to the base dir
    pub storage_file: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            title: "Dev Log".to_string(),

            debounce_ms: 150,
            theme: "default".to_string(),
            highlight: HighlightConfig::default(),

            storage_file: ".devlog/state.json".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ViewerConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Syntect theme used for code blocks
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.title, "Dev Log");
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
url: https://blog.example.com
title: My Blog
debounce_ms: 300
theme: gray
"#;
        let config: ViewerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.url, "https://blog.example.com");
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.theme, "gray");
        // untouched fields keep defaults
        assert_eq!(config.storage_file, ".devlog/state.json");
    }
}
