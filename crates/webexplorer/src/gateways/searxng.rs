//! SearXNG search gateway

use super::{endpoint, http_client, SearchGateway};
use crate::error::ExplorerError;
use crate::types::SearchHit;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
}

#[derive(Debug, Deserialize)]
struct SearxngResult {
    url: Option<String>,
    title: Option<String>,
    // SearXNG puts the snippet in `content`
    content: Option<String>,
}

/// Search gateway backed by a SearXNG instance's JSON API
#[derive(Debug, Clone)]
pub struct SearxngSearch {
    client: reqwest::Client,
    endpoint: url::Url,
    timeout: Duration,
}

impl SearxngSearch {
    /// Create a gateway for the instance at `base_url` (with or without `/search`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ExplorerError> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: endpoint(base_url, "/search")?,
            timeout,
        })
    }

    fn request_url(&self, query: &str, page: usize) -> url::Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("pageno", &page.to_string());
        url
    }

    fn search_error(&self, err: reqwest::Error) -> ExplorerError {
        if err.is_timeout() {
            ExplorerError::Timeout {
                what: "search",
                after: self.timeout,
            }
        } else {
            warn!(error = %err, "SearXNG request failed");
            ExplorerError::SearchUnavailable(err.to_string())
        }
    }
}

#[async_trait]
impl SearchGateway for SearxngSearch {
    fn name(&self) -> &'static str {
        "searxng"
    }

    async fn search(
        &self,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<SearchHit>, ExplorerError> {
        debug!(query, page, page_size, "Searching");

        let response = self
            .client
            .get(self.request_url(query, page))
            .send()
            .await
            .map_err(|e| self.search_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::SearchUnavailable(format!(
                "searxng returned HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: SearxngResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                ExplorerError::SearchUnavailable(format!("invalid searxng response: {e}"))
            } else {
                self.search_error(e)
            }
        })?;

        let hits: Vec<SearchHit> = parsed
            .results
            .into_iter()
            .filter_map(|r| {
                let url = r.url.filter(|u| !u.trim().is_empty())?;
                Some(SearchHit {
                    title: r.title.unwrap_or_default().trim().to_string(),
                    url,
                    snippet: r.content.unwrap_or_default().trim().to_string(),
                })
            })
            .take(page_size)
            .collect();

        debug!(query, hits = hits.len(), "Search complete");
        Ok(hits)
    }
}
