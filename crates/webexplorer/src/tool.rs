//! Tool builder and contract for WebExplorer

use crate::client::{web_search, webpage_content, ExplorerOptions};
use crate::config::Settings;
use crate::error::ExplorerError;
use crate::gateways::{BrowserGateway, RemoteBrowser, SearchGateway, SearxngSearch};
use crate::types::{
    ExtractionResult, SearchResponse, WebSearchRequest, WebpageContentRequest,
};
use crate::{WEBPAGE_CONTENT_DESCRIPTION, WEB_SEARCH_DESCRIPTION};
use schemars::schema_for;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Name of the search tool
pub const WEB_SEARCH_TOOL: &str = "web_search_tool";

/// Name of the page extraction tool
pub const WEBPAGE_CONTENT_TOOL: &str = "webpage_content_tool";

/// Tool metadata as advertised to an MCP host
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(rename = "outputSchema")]
    pub output_schema: Value,
}

/// Builder for configuring the WebExplorer tools
#[derive(Default)]
pub struct ToolBuilder {
    settings: Settings,
    browser: Option<Arc<dyn BrowserGateway>>,
    search: Option<Arc<dyn SearchGateway>>,
}

impl ToolBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these settings for defaults, timeouts and gateway endpoints
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Use a custom browser gateway instead of [`RemoteBrowser`]
    pub fn browser(mut self, gateway: Arc<dyn BrowserGateway>) -> Self {
        self.browser = Some(gateway);
        self
    }

    /// Use a custom search gateway instead of [`SearxngSearch`]
    pub fn search(mut self, gateway: Arc<dyn SearchGateway>) -> Self {
        self.search = Some(gateway);
        self
    }

    /// Build the tool, creating HTTP gateways for anything not supplied
    pub fn build(self) -> Result<Tool, ExplorerError> {
        let browser = match self.browser {
            Some(gw) => gw,
            None => Arc::new(RemoteBrowser::new(
                &self.settings.webpage.browser_url,
                self.settings.webpage.timeout,
            )?),
        };
        let search = match self.search {
            Some(gw) => gw,
            None => Arc::new(SearxngSearch::new(
                &self.settings.web_search.searxng_url,
                self.settings.web_search.timeout,
            )?),
        };

        Ok(Tool {
            browser,
            search,
            options: ExplorerOptions::from(&self.settings),
        })
    }
}

/// Configured WebExplorer tools
///
/// Stateless apart from its gateways; safe to share across concurrent calls.
#[derive(Clone)]
pub struct Tool {
    browser: Arc<dyn BrowserGateway>,
    search: Arc<dyn SearchGateway>,
    options: ExplorerOptions,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("browser", &self.browser.name())
            .field("search", &self.search.name())
            .field("options", &self.options)
            .finish()
    }
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Build with HTTP gateways configured from `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self, ExplorerError> {
        ToolBuilder::new().settings(settings.clone()).build()
    }

    /// Effective defaults and timeouts
    pub fn options(&self) -> &ExplorerOptions {
        &self.options
    }

    /// Input schema for `web_search_tool`, with configured defaults filled in
    pub fn web_search_schema(&self) -> Value {
        let mut value = serde_json::to_value(schema_for!(WebSearchRequest)).unwrap_or_default();
        set_default(&mut value, "page", json!(1));
        set_default(&mut value, "page_size", json!(self.options.default_page_size));
        value
    }

    /// Input schema for `webpage_content_tool`, with configured defaults filled in
    pub fn webpage_content_schema(&self) -> Value {
        let mut value =
            serde_json::to_value(schema_for!(WebpageContentRequest)).unwrap_or_default();
        set_default(&mut value, "page", json!(1));
        set_default(&mut value, "max_chars", json!(self.options.default_max_chars));
        value
    }

    /// Output schema for `webpage_content_tool`
    pub fn webpage_content_output_schema(&self) -> Value {
        serde_json::to_value(schema_for!(ExtractionResult)).unwrap_or_default()
    }

    /// Output schema for `web_search_tool`
    pub fn web_search_output_schema(&self) -> Value {
        serde_json::to_value(schema_for!(SearchResponse)).unwrap_or_default()
    }

    /// Definitions of both tools
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: WEB_SEARCH_TOOL,
                description: WEB_SEARCH_DESCRIPTION,
                input_schema: self.web_search_schema(),
                output_schema: self.web_search_output_schema(),
            },
            ToolDefinition {
                name: WEBPAGE_CONTENT_TOOL,
                description: WEBPAGE_CONTENT_DESCRIPTION,
                input_schema: self.webpage_content_schema(),
                output_schema: self.webpage_content_output_schema(),
            },
        ]
    }

    /// Execute `web_search_tool`
    pub async fn web_search(&self, req: WebSearchRequest) -> Result<SearchResponse, ExplorerError> {
        web_search(self.search.as_ref(), req, &self.options).await
    }

    /// Execute `webpage_content_tool`
    pub async fn webpage_content(
        &self,
        req: WebpageContentRequest,
    ) -> Result<ExtractionResult, ExplorerError> {
        webpage_content(self.browser.as_ref(), req, &self.options).await
    }
}

fn set_default(schema: &mut Value, property: &str, default: Value) {
    if let Some(prop) = schema
        .get_mut("properties")
        .and_then(|p| p.get_mut(property))
        .and_then(|p| p.as_object_mut())
    {
        prop.insert("default".to_string(), default);
    }
}
