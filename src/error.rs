//! Error taxonomy for the viewer core

use thiserror::Error;

/// Errors surfaced by the viewer core.
///
/// Every asynchronous boundary classifies failures into one of these
/// variants before anything UI-facing sees them. `Cancelled` is never
/// shown to a user; it marks a superseded operation whose result must
/// be discarded.
#[derive(Debug, Clone, Error)]
pub enum ViewerError {
    /// The post manifest could not be fetched or parsed. Fatal for the
    /// initial load; there is no retry.
    #[error("post list unavailable: {reason}")]
    ManifestUnavailable { reason: String },

    /// A single post body could not be fetched. Local to that load
    /// attempt; other cached posts are unaffected.
    #[error("content unavailable: {reason}")]
    ContentUnavailable { reason: String },

    /// The operation was superseded by a newer one.
    #[error("cancelled")]
    Cancelled,
}

impl ViewerError {
    /// Build a `ManifestUnavailable` from any displayable reason
    pub fn manifest(reason: impl std::fmt::Display) -> Self {
        Self::ManifestUnavailable {
            reason: reason.to_string(),
        }
    }

    /// Build a `ContentUnavailable` from any displayable reason
    pub fn content(reason: impl std::fmt::Display) -> Self {
        Self::ContentUnavailable {
            reason: reason.to_string(),
        }
    }

    /// Whether this error is a silent cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ViewerError::content("HTTP 404");
        assert_eq!(err.to_string(), "content unavailable: HTTP 404");
        assert!(!err.is_cancelled());
        assert!(ViewerError::Cancelled.is_cancelled());
    }
}
