//! Request handling for the two tools
//!
//! Validates arguments, calls the gateway, and runs the extraction pipeline.
//! The network work happens in the gateways in [`gateways`](crate::gateways).

use crate::assemble::extract;
use crate::config::Settings;
use crate::error::ExplorerError;
use crate::gateways::{BrowserGateway, SearchGateway};
use crate::types::{
    ExtractionResult, SearchResponse, WebSearchRequest, WebpageContentRequest,
};
use std::time::Duration;

/// Defaults and bounds applied to tool requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerOptions {
    /// Results per search page when the caller gives none
    pub default_page_size: usize,
    /// Characters per page when the caller gives none
    pub default_max_chars: usize,
    /// Bound on a single browser render
    pub browser_timeout: Duration,
    /// Bound on a single search call
    pub search_timeout: Duration,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for ExplorerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            default_page_size: settings.web_search.default_page_size,
            default_max_chars: settings.webpage.default_max_chars,
            browser_timeout: settings.webpage.timeout,
            search_timeout: settings.web_search.timeout,
        }
    }
}

/// Run a web search through `gateway`
pub async fn web_search(
    gateway: &dyn SearchGateway,
    req: WebSearchRequest,
    options: &ExplorerOptions,
) -> Result<SearchResponse, ExplorerError> {
    if req.query.trim().is_empty() {
        return Err(ExplorerError::invalid(
            "Search query must be a non-empty string",
        ));
    }
    let page = positive(req.page, 1, "Page number must be greater than 0")?;
    let page_size = positive(
        req.page_size,
        options.default_page_size,
        "Page size must be greater than 0",
    )?;

    tracing::debug!(gateway = gateway.name(), query = %req.query, page, page_size, "web_search");

    let results = match tokio::time::timeout(
        options.search_timeout,
        gateway.search(&req.query, page, page_size),
    )
    .await
    {
        Ok(results) => results?,
        Err(_) => {
            return Err(ExplorerError::Timeout {
                what: "search",
                after: options.search_timeout,
            })
        }
    };

    Ok(SearchResponse {
        query: req.query,
        page,
        page_size,
        total_results: results.len(),
        results,
    })
}

/// Render `req.url` through `gateway` and extract one page of content
pub async fn webpage_content(
    gateway: &dyn BrowserGateway,
    req: WebpageContentRequest,
    options: &ExplorerOptions,
) -> Result<ExtractionResult, ExplorerError> {
    validate_url(&req.url)?;
    let page = positive(req.page, 1, "Page number must be 1 or greater")?;
    let max_chars = positive(
        req.max_chars,
        options.default_max_chars,
        "max_chars must be positive",
    )?;

    tracing::debug!(gateway = gateway.name(), url = %req.url, page, max_chars, "webpage_content");

    // A timed-out render never reaches the pipeline
    let rendered = gateway.render(&req.url, options.browser_timeout).await?;
    let mut result = extract(&rendered, page, max_chars)?;
    result.url = req.url;

    if result.parse_degraded {
        tracing::info!(url = %result.url, "Extracted from malformed HTML");
    }

    Ok(result)
}

fn validate_url(url: &str) -> Result<(), ExplorerError> {
    if url.trim().is_empty() {
        return Err(ExplorerError::invalid(
            "A valid url (non-empty string) is required",
        ));
    }
    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ExplorerError::invalid(
            "URL must start with http:// or https://",
        )),
    }
}

fn positive(value: Option<i64>, default: usize, msg: &str) -> Result<usize, ExplorerError> {
    match value {
        None => Ok(default),
        Some(v) if v >= 1 => usize::try_from(v).map_err(|_| ExplorerError::invalid(msg)),
        Some(_) => Err(ExplorerError::invalid(msg)),
    }
}
