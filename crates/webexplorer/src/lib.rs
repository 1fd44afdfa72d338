//! WebExplorer - web search and LLM-ready webpage extraction
//!
//! This crate provides the library behind two MCP tools: searching the web
//! through a SearXNG instance, and turning a rendered webpage into
//! size-bounded, paginated text.
//!
//! ## Extraction pipeline
//!
//! rendered HTML → [`clean`] (tolerant parse, noise removal) → [`segment`]
//! (article / main text / meta description) → [`assemble`] (pagination of
//! the primary stream via [`paginate`], character budget). [`page_metadata`]
//! adds author, dates, links and images from the same cleaned document.
//!
//! The pipeline is pure and synchronous. Network access lives behind the
//! [`BrowserGateway`] and [`SearchGateway`] traits.

pub mod assemble;
pub mod classify;
pub mod client;
pub mod config;
mod error;
pub mod gateways;
pub mod metadata;
pub mod paginate;
pub mod segment;
mod tool;
mod types;

pub use assemble::{assemble, extract};
pub use classify::{clean, CleanedDocument, Element, Node};
pub use client::{web_search, webpage_content, ExplorerOptions};
pub use config::{LogFormat, LoggingSettings, Settings, WebSearchSettings, WebpageSettings};
pub use error::ExplorerError;
pub use gateways::{BrowserGateway, RemoteBrowser, SearchGateway, SearxngSearch};
pub use metadata::page_metadata;
pub use paginate::paginate;
pub use segment::segment;
pub use tool::{Tool, ToolBuilder, ToolDefinition, WEBPAGE_CONTENT_TOOL, WEB_SEARCH_TOOL};
pub use types::{
    ContentType, ExtractionResult, Heading, Image, Link, PageMetadata, PaginationResult,
    PrimarySource, RenderedPage, SearchHit, SearchResponse, SegmentedContent, WebSearchRequest,
    WebpageContentRequest,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "WebExplorer/0.1";

/// `web_search_tool` description for LLM consumption
pub const WEB_SEARCH_DESCRIPTION: &str = r#"Searches the web and returns ranked results.

- Results have title, url and snippet
- Paginated with `page` and `page_size`"#;

/// `webpage_content_tool` description for LLM consumption
pub const WEBPAGE_CONTENT_DESCRIPTION: &str = r#"Renders a webpage in a headless browser and extracts its readable text.

- Article content is returned separately from the rest of the page
- Long text is split into pages of `max_chars` characters
- Request further pages with `page` while `has_next_page` is true"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# WebExplorer Tools

Two tools for exploring the web: search, then read.

## web_search_tool

Searches the web through a SearXNG metasearch instance.

### Input Parameters
- `query` (required): Search query
- `page` (optional): Result page, starting at 1 (default: 1)
- `page_size` (optional): Results per page (default: 5)

### Output Fields
- `query`, `page`, `page_size`: Echo of the request
- `total_results`: Number of results returned
- `results`: List of `{title, url, snippet}`

## webpage_content_tool

Renders a URL in a headless browser and extracts clean text.

### Input Parameters
- `url` (required): The URL to read (must be http:// or https://)
- `page` (optional): Page of the text to return, starting at 1 (default: 1)
- `max_chars` (optional): Characters per page (default: 5000)

### Output Fields
- `url`: The requested URL
- `title`: Document title
- `description`: Meta description
- `primary_source`: "article" or "main_text", the field being paginated
- `article_body`: Requested page of the main article (empty if none found)
- `main_text`: Requested page of the page text, or its first `max_chars`
  characters when the article is paginated
- `headings`: h1-h3 headings as `{level, text}`
- `author`, `published_date`: When the page declares them
- `content_type`: "article", "discussion" or "webpage"
- `links`: Body links as `{text, url}` (absolute URLs)
- `images`: Body images as `{url, alt}` (absolute URLs)
- `metadata`: All `<meta>` name/property values
- `page`, `total_pages`, `has_next_page`, `total_chars`, `length`: Pagination
- `parse_degraded`: Present when the HTML was malformed

## Examples

### Search
```json
{"query": "rust async runtime", "page_size": 3}
```

### Read the second page of an article
```json
{"url": "https://example.com/post", "page": 2}
```

## Error Handling
- Invalid arguments (empty query, page < 1, bad URL) return an error
- Unreachable or slow upstreams return a retryable error; nothing is retried automatically
- Pages past the end return empty content with `has_next_page: false`
"#;
