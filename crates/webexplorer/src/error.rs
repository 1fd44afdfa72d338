//! Error types for WebExplorer

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during search or extraction
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Caller supplied a bad parameter (surfaced verbatim)
    #[error("{0}")]
    InvalidArgument(String),

    /// Browser gateway could not load the page
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Upstream call exceeded its time bound
    #[error("{what} timed out after {}s", after.as_secs())]
    Timeout {
        /// Which upstream timed out ("render" or "search")
        what: &'static str,
        /// The bound that was exceeded
        after: Duration,
    },

    /// Search aggregator unreachable or returned garbage
    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Invalid settings value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ExplorerError {
    /// Build an `InvalidArgument` error
    pub fn invalid(msg: impl Into<String>) -> Self {
        ExplorerError::InvalidArgument(msg.into())
    }

    /// True for upstream failures the caller may retry.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExplorerError::Navigation(_)
                | ExplorerError::Timeout { .. }
                | ExplorerError::SearchUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ExplorerError::invalid("Page number must be 1 or greater").to_string(),
            "Page number must be 1 or greater"
        );
        assert_eq!(
            ExplorerError::Navigation("HTTP 502".to_string()).to_string(),
            "Navigation failed: HTTP 502"
        );
        assert_eq!(
            ExplorerError::Timeout {
                what: "render",
                after: Duration::from_secs(30),
            }
            .to_string(),
            "render timed out after 30s"
        );
        assert_eq!(
            ExplorerError::SearchUnavailable("connection refused".to_string()).to_string(),
            "Search unavailable: connection refused"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ExplorerError::Navigation("x".into()).is_retryable());
        assert!(ExplorerError::SearchUnavailable("x".into()).is_retryable());
        assert!(ExplorerError::Timeout {
            what: "search",
            after: Duration::from_secs(15),
        }
        .is_retryable());
        assert!(!ExplorerError::invalid("bad").is_retryable());
        assert!(!ExplorerError::Config("bad".into()).is_retryable());
    }
}
