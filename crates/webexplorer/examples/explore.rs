//! Example: search, then read the top results page by page
//!
//! Run with: cargo run -p webexplorer --example explore -- "rust async"
//!
//! Needs a SearXNG instance and a browser rendering service; endpoints come
//! from the usual `WEB_EXPLORER_MCP_` environment variables.

use webexplorer::{Settings, Tool, WebSearchRequest, WebpageContentRequest};

/// Pages to read per result before moving on
const MAX_PAGES: i64 = 2;

#[tokio::main]
async fn main() {
    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "rust programming language".to_string());

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let tool = match Tool::from_settings(&settings) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("WebExplorer: {}", query);
    println!("=====================\n");

    let response = match tool.web_search(WebSearchRequest::new(&query).page_size(3)).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        }
    };

    let mut failed = 0;
    for (i, hit) in response.results.iter().enumerate() {
        println!("{}. {}", i + 1, hit.title);
        println!("   URL: {}", hit.url);

        for page in 1..=MAX_PAGES {
            let request = WebpageContentRequest::new(&hit.url).page(page).max_chars(400);
            match tool.webpage_content(request).await {
                Ok(result) => {
                    let preview = match result.primary_source {
                        webexplorer::PrimarySource::Article => &result.article_body,
                        webexplorer::PrimarySource::MainText => &result.main_text,
                    };
                    println!(
                        "   Page {}/{} ({:?}): {}",
                        result.page,
                        result.total_pages,
                        result.primary_source,
                        preview.replace('\n', " ")
                    );
                    if !result.has_next_page {
                        break;
                    }
                }
                Err(e) => {
                    println!("   Error: {} (retryable: {})", e, e.is_retryable());
                    failed += 1;
                    break;
                }
            }
        }
        println!();
    }

    println!("=====================");
    println!("{} results, {} failed", response.total_results, failed);
}
