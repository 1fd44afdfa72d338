//! WebExplorer CLI - web search and webpage extraction from the command line

mod logging;
mod mcp;

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use webexplorer::{
    ExtractionResult, SearchResponse, Settings, Tool, WebSearchRequest, WebpageContentRequest,
    TOOL_LLMTXT,
};

/// Output format for search and extract subcommands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Markdown with YAML frontmatter
    #[default]
    Md,
    /// JSON format
    Json,
}

/// WebExplorer - search the web and read pages as LLM-ready text
#[derive(Parser, Debug)]
#[command(name = "webexplorer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Search the web through SearXNG
    Search {
        /// Search query
        query: String,

        /// Result page, starting at 1
        #[arg(long)]
        page: Option<i64>,

        /// Results per page
        #[arg(long)]
        page_size: Option<i64>,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,
    },
    /// Render a URL and print its extracted text
    Extract {
        /// URL to read
        url: String,

        /// Page of the extracted text, starting at 1
        #[arg(long)]
        page: Option<i64>,

        /// Characters per page
        #[arg(long)]
        max_chars: Option<i64>,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    let Some(command) = cli.command else {
        eprintln!("Usage: webexplorer search <QUERY>");
        eprintln!("   or: webexplorer extract <URL>");
        eprintln!("   or: webexplorer mcp");
        eprintln!("   or: webexplorer --help");
        std::process::exit(1);
    };

    let settings = Settings::from_env().unwrap_or_else(|e| fail(&e.to_string()));
    if let Err(e) = logging::init(&settings) {
        fail(&e);
    }
    let tool = Tool::from_settings(&settings).unwrap_or_else(|e| fail(&e.to_string()));
    tracing::debug!(?tool, "Tool configured");

    match command {
        Commands::Mcp => mcp::run_server(tool).await,
        Commands::Search {
            query,
            page,
            page_size,
            output,
        } => {
            let request = WebSearchRequest {
                query,
                page,
                page_size,
            };
            match tool.web_search(request).await {
                Ok(response) => match output {
                    OutputFormat::Md => writeln_safe(&format_search_md(&response)),
                    OutputFormat::Json => print_json(&response),
                },
                Err(e) => fail(&e.to_string()),
            }
        }
        Commands::Extract {
            url,
            page,
            max_chars,
            output,
        } => {
            let request = WebpageContentRequest {
                url,
                page,
                max_chars,
            };
            match tool.webpage_content(request).await {
                Ok(result) => match output {
                    OutputFormat::Md => writeln_safe(&format_extraction_md(&result)),
                    OutputFormat::Json => print_json(&result),
                },
                Err(e) => fail(&e.to_string()),
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| fail(&format!("Error serializing response: {}", e)));
    writeln_safe(&json);
}

/// Format search results as markdown with YAML frontmatter
fn format_search_md(response: &SearchResponse) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!("query: {}\n", response.query));
    output.push_str(&format!("page: {}\n", response.page));
    output.push_str(&format!("page_size: {}\n", response.page_size));
    output.push_str(&format!("total_results: {}\n", response.total_results));
    output.push_str("---\n");

    for (i, hit) in response.results.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{}. [{}]({})\n", i + 1, hit.title, hit.url));
        if !hit.snippet.is_empty() {
            output.push_str(&format!("   {}\n", hit.snippet));
        }
    }

    output
}

/// Format an extraction as markdown with YAML frontmatter
///
/// The body is the paginated primary stream.
fn format_extraction_md(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!("url: {}\n", result.url));
    if !result.title.is_empty() {
        output.push_str(&format!("title: {}\n", result.title));
    }
    if !result.description.is_empty() {
        output.push_str(&format!("description: {}\n", result.description));
    }
    if let Some(ref author) = result.author {
        output.push_str(&format!("author: {}\n", author));
    }
    if let Some(ref date) = result.published_date {
        output.push_str(&format!("published_date: {}\n", date));
    }
    output.push_str(&format!("content_type: {}\n", result.content_type.as_str()));
    output.push_str(&format!("page: {}\n", result.page));
    output.push_str(&format!("total_pages: {}\n", result.total_pages));
    output.push_str(&format!("has_next_page: {}\n", result.has_next_page));
    output.push_str(&format!("total_chars: {}\n", result.total_chars));
    if result.parse_degraded {
        output.push_str("parse_degraded: true\n");
    }
    output.push_str("---\n");

    match result.primary_source {
        webexplorer::PrimarySource::Article => output.push_str(&result.article_body),
        webexplorer::PrimarySource::MainText => output.push_str(&result.main_text),
    }

    output
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
