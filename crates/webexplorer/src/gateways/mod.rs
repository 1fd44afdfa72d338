//! Gateways to the external services the pipeline depends on
//!
//! Design: the core never talks to the network itself. A [`BrowserGateway`]
//! turns a URL into rendered HTML, a [`SearchGateway`] turns a query into
//! ranked hits. Both are traits so tests and embedders can swap them.

mod browser;
mod searxng;

pub use browser::RemoteBrowser;
pub use searxng::SearxngSearch;

use crate::error::ExplorerError;
use crate::types::{RenderedPage, SearchHit};
use async_trait::async_trait;
use std::time::Duration;

/// Source of rendered HTML
///
/// Implementations must fail with [`ExplorerError::Navigation`] when the URL
/// cannot be loaded and [`ExplorerError::Timeout`] when `timeout` elapses.
/// They must not retry.
#[async_trait]
pub trait BrowserGateway: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Navigate to `url` and return the HTML after scripts ran
    async fn render(&self, url: &str, timeout: Duration) -> Result<RenderedPage, ExplorerError>;
}

/// Source of web search results
///
/// Implementations fail with [`ExplorerError::SearchUnavailable`] when the
/// backing aggregator cannot be reached.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Return at most `page_size` hits for result page `page` (1-indexed)
    async fn search(
        &self,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<SearchHit>, ExplorerError>;
}

/// Build the shared reqwest client used by the HTTP gateways
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ExplorerError> {
    reqwest::Client::builder()
        .user_agent(crate::DEFAULT_USER_AGENT)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ExplorerError::ClientBuildError)
}

/// Join a path onto a configured base URL, tolerating a trailing slash
pub(crate) fn endpoint(base: &str, path: &str) -> Result<url::Url, ExplorerError> {
    let base = base.trim().trim_end_matches('/');
    let joined = if base.ends_with(path) {
        base.to_string()
    } else {
        format!("{base}{path}")
    };
    url::Url::parse(&joined)
        .map_err(|e| ExplorerError::Config(format!("invalid endpoint {joined:?}: {e}")))
}
