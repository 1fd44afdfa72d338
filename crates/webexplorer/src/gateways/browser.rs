//! Remote headless-browser gateway
//!
//! Talks to a rendering service exposing `POST /content` (the browserless
//! API shape): the request names a URL, the response body is the page HTML
//! serialized after navigation settled.

use super::{endpoint, http_client, BrowserGateway};
use crate::error::ExplorerError;
use crate::types::RenderedPage;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    goto_options: GotoOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
    timeout: u64,
}

fn content_request(url: &str, timeout: Duration) -> ContentRequest<'_> {
    ContentRequest {
        url,
        goto_options: GotoOptions {
            wait_until: "networkidle2",
            timeout: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        },
    }
}

/// Browser gateway backed by a remote rendering endpoint
#[derive(Debug, Clone)]
pub struct RemoteBrowser {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl RemoteBrowser {
    /// Create a gateway for the service at `base_url`
    ///
    /// `timeout` bounds the underlying HTTP client; each render call also
    /// enforces its own bound.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ExplorerError> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: endpoint(base_url, "/content")?,
        })
    }

    async fn fetch_html(&self, url: &str, timeout: Duration) -> Result<String, ExplorerError> {
        let body = content_request(url, timeout);

        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| render_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::Navigation(format!(
                "renderer returned HTTP {} for {url}",
                status.as_u16()
            )));
        }

        response.text().await.map_err(|e| render_error(e, timeout))
    }
}

#[async_trait]
impl BrowserGateway for RemoteBrowser {
    fn name(&self) -> &'static str {
        "remote_browser"
    }

    async fn render(&self, url: &str, timeout: Duration) -> Result<RenderedPage, ExplorerError> {
        debug!(url, endpoint = %self.endpoint, "Rendering page");

        let html = match tokio::time::timeout(timeout, self.fetch_html(url, timeout)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(url, timeout_s = timeout.as_secs(), "Render timed out");
                return Err(ExplorerError::Timeout {
                    what: "render",
                    after: timeout,
                });
            }
        };

        debug!(url, bytes = html.len(), "Rendered page");
        Ok(RenderedPage::new(html, url))
    }
}

fn render_error(err: reqwest::Error, timeout: Duration) -> ExplorerError {
    if err.is_timeout() {
        ExplorerError::Timeout {
            what: "render",
            after: timeout,
        }
    } else {
        warn!(error = %err, "Renderer request failed");
        ExplorerError::Navigation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_request_shape() {
        let body = content_request("https://example.com", Duration::from_secs(30));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["gotoOptions"]["waitUntil"], "networkidle2");
        assert_eq!(json["gotoOptions"]["timeout"], 30_000);
    }

    #[test]
    fn test_content_request_timeout_saturates() {
        let body = content_request("https://example.com", Duration::MAX);
        assert_eq!(body.goto_options.timeout, u64::MAX);

        let body = content_request("https://example.com", Duration::from_millis(1500));
        assert_eq!(body.goto_options.timeout, 1500);
    }

    #[test]
    fn test_endpoint_from_base() {
        let browser = RemoteBrowser::new("http://127.0.0.1:9012/", Duration::from_secs(1)).unwrap();
        assert_eq!(browser.endpoint.as_str(), "http://127.0.0.1:9012/content");
        assert_eq!(browser.name(), "remote_browser");
    }
}
