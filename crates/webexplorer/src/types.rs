//! Core types for WebExplorer

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rendered HTML as produced by a browser gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub source_url: String,
}

impl RenderedPage {
    pub fn new(html: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            source_url: source_url.into(),
        }
    }
}

/// Heading found in the page body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Heading {
    /// 1 for h1, 2 for h2, 3 for h3
    pub level: u8,
    pub text: String,
}

/// Text buckets produced by segmentation
///
/// `article_body` and `main_text` never share a sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedContent {
    /// Text of all `<article>`/`<main>` containers, in document order
    pub article_body: String,
    /// Remaining visible text
    pub main_text: String,
    /// Declared page summary from `<meta>` tags
    pub meta_description: String,
    /// Document `<title>`
    pub title: String,
    /// h1-h3 headings
    pub headings: Vec<Heading>,
}

/// Hyperlink found in the page body, resolved to an absolute URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    /// Visible link text (may be empty)
    pub text: String,
    pub url: String,
}

/// Image found in the page body, resolved to an absolute URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Image {
    pub url: String,
    /// `alt` text (may be empty)
    pub alt: String,
}

/// Coarse kind of page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Single authored piece (news story, blog post, documentation page)
    Article,
    /// Forum thread or Q&A page
    Discussion,
    #[default]
    Webpage,
}

impl ContentType {
    /// Name as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Discussion => "discussion",
            ContentType::Webpage => "webpage",
        }
    }
}

/// Document metadata gathered alongside the text buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub content_type: ContentType,
    /// `<meta>` name or property (lowercased) to content, first occurrence wins
    pub meta: BTreeMap<String, String>,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
}

/// One page of a paginated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaginationResult {
    pub content: String,
    pub page: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub total_chars: usize,
}

/// Which text bucket was paginated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrimarySource {
    Article,
    #[default]
    MainText,
}

/// Final result of `webpage_content_tool`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionResult {
    /// The requested URL
    pub url: String,

    /// Document title (empty if none)
    pub title: String,

    /// Meta description, capped to `max_chars`
    pub description: String,

    /// Bucket that `page`/`total_pages` refer to
    pub primary_source: PrimarySource,

    /// Requested page of the article (empty when no article was found)
    pub article_body: String,

    /// Requested page of the page text, or its first `max_chars` characters
    /// when the article is the paginated stream
    pub main_text: String,

    /// True if `main_text` was cut to fit `max_chars` without pagination
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub main_text_truncated: bool,

    /// h1-h3 headings
    pub headings: Vec<Heading>,

    /// Requested page number
    pub page: usize,

    /// Pages in the primary stream (at least 1)
    pub total_pages: usize,

    /// True if a later page exists
    pub has_next_page: bool,

    /// Characters in the whole primary stream
    pub total_chars: usize,

    /// Characters in the returned page
    pub length: usize,

    /// Author from `<meta name="author">` or author markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Publication date as written in the page (usually ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    /// Detected kind of page
    #[serde(default)]
    pub content_type: ContentType,

    /// Links in the page body (absolute http(s) URLs, deduplicated)
    #[serde(default)]
    pub links: Vec<Link>,

    /// Images in the page body (absolute http(s) URLs, deduplicated)
    #[serde(default)]
    pub images: Vec<Image>,

    /// All `<meta>` name/property values
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// True if the HTML was malformed and recovered best-effort
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub parse_degraded: bool,
}

/// One search hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Result of `web_search_tool`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
    pub query: String,
    pub page: usize,
    pub page_size: usize,
    pub total_results: usize,
    pub results: Vec<SearchHit>,
}

/// Arguments of `web_search_tool`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchRequest {
    /// Search query (required)
    pub query: String,

    /// Result page, starting at 1 (default 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Results per page (default 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl WebSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Arguments of `webpage_content_tool`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebpageContentRequest {
    /// URL to render and extract (required, http:// or https://)
    pub url: String,

    /// Page of the primary text to return, starting at 1 (default 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Characters per page (default 5000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<i64>,
}

impl WebpageContentRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn max_chars(mut self, max_chars: i64) -> Self {
        self.max_chars = Some(max_chars);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = WebpageContentRequest::new("https://example.com")
            .page(3)
            .max_chars(100);
        assert_eq!(req.url, "https://example.com");
        assert_eq!(req.page, Some(3));
        assert_eq!(req.max_chars, Some(100));
    }

    #[test]
    fn test_request_deserialization_defaults() {
        let req: WebSearchRequest = serde_json::from_str(r#"{"query":"rust"}"#).unwrap();
        assert_eq!(req.query, "rust");
        assert!(req.page.is_none());
        assert!(req.page_size.is_none());

        // Negative values reach validation instead of failing to parse
        let req: WebpageContentRequest =
            serde_json::from_str(r#"{"url":"https://a.b","page":-1}"#).unwrap();
        assert_eq!(req.page, Some(-1));
    }

    #[test]
    fn test_extraction_result_serialization() {
        let result = ExtractionResult {
            url: "https://example.com".to_string(),
            primary_source: PrimarySource::Article,
            total_pages: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["primary_source"], "article");
        assert_eq!(json["has_next_page"], false);
        // False flags are omitted
        assert!(json.get("parse_degraded").is_none());
        assert!(json.get("main_text_truncated").is_none());
        assert!(json.get("author").is_none());
        assert_eq!(json["content_type"], ContentType::Webpage.as_str());
        assert_eq!(
            serde_json::to_value(ContentType::Discussion).unwrap(),
            ContentType::Discussion.as_str()
        );
        assert!(json["links"].as_array().unwrap().is_empty());
        assert!(json["metadata"].is_object());
    }
}
