//! MCP (Model Context Protocol) server implementation

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use webexplorer::{
    ExplorerError, Tool, WebSearchRequest, WebpageContentRequest, WEBPAGE_CONTENT_TOOL,
    WEB_SEARCH_TOOL,
};

/// Name reported in `initialize`
const SERVER_NAME: &str = "Web Explorer MCP";

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// MCP Server implementation
struct McpServer {
    tool: Tool,
}

impl McpServer {
    fn new(tool: Tool) -> Self {
        Self { tool }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.tool.definitions() }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let outcome = match tool_name {
            WEB_SEARCH_TOOL => match serde_json::from_value::<WebSearchRequest>(arguments) {
                Ok(req) => to_value(self.tool.web_search(req).await),
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, format!("Invalid arguments: {}", e))
                }
            },
            WEBPAGE_CONTENT_TOOL => {
                match serde_json::from_value::<WebpageContentRequest>(arguments) {
                    Ok(req) => to_value(self.tool.webpage_content(req).await),
                    Err(e) => {
                        return JsonRpcResponse::error(
                            id,
                            -32602,
                            format!("Invalid arguments: {}", e),
                        )
                    }
                }
            }
            _ => {
                return JsonRpcResponse::error(id, -32602, format!("Unknown tool: {}", tool_name))
            }
        };

        match outcome {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": serde_json::to_string_pretty(&content).unwrap_or_default()
                    }],
                    "structuredContent": content
                }),
            ),
            Err(e) => {
                tracing::warn!(tool = tool_name, error = %e, "Tool call failed");
                let mut text = format!("Error: {}", e);
                if e.is_retryable() {
                    text.push_str(" (upstream unavailable, retry later)");
                }
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": text
                        }],
                        "isError": true,
                        "_meta": { "retryable": e.is_retryable() }
                    }),
                )
            }
        }
    }
}

fn to_value<T: Serialize>(result: Result<T, ExplorerError>) -> Result<Value, ExplorerError> {
    result.map(|r| serde_json::to_value(&r).unwrap_or(json!({})))
}

/// Run the MCP server over stdio
pub async fn run_server(tool: Tool) {
    let server = McpServer::new(tool);
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    tracing::info!("MCP server listening on stdio");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(request) => {
                // Notifications get no response
                if request.id.is_none() && request.method.starts_with("notifications/") {
                    continue;
                }
                server.handle_request(request).await
            }
            Err(e) => JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e)),
        };

        let mut json = serde_json::to_string(&response).unwrap_or_default();
        json.push('\n');
        if let Err(e) = stdout.write_all(json.as_bytes()).await {
            tracing::error!("Error writing stdout: {}", e);
            break;
        }
        let _ = stdout.flush().await;
    }

    tracing::info!("stdin closed, MCP server exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use webexplorer::{BrowserGateway, RenderedPage, SearchGateway, SearchHit};

    struct FixedBrowser;

    #[async_trait]
    impl BrowserGateway for FixedBrowser {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn render(&self, url: &str, _timeout: Duration) -> Result<RenderedPage, ExplorerError> {
            if url.contains("down") {
                return Err(ExplorerError::Navigation("connection refused".to_string()));
            }
            Ok(RenderedPage::new(
                "<html><head><title>T</title></head><body><article><p>Hello world.</p></article></body></html>",
                url,
            ))
        }
    }

    struct FixedSearch;

    #[async_trait]
    impl SearchGateway for FixedSearch {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn search(
            &self,
            query: &str,
            _page: usize,
            _page_size: usize,
        ) -> Result<Vec<SearchHit>, ExplorerError> {
            Ok(vec![SearchHit {
                title: format!("About {query}"),
                url: "https://example.com".to_string(),
                snippet: "snippet".to_string(),
            }])
        }
    }

    fn server() -> McpServer {
        let tool = Tool::builder()
            .browser(Arc::new(FixedBrowser))
            .search(Arc::new(FixedSearch))
            .build()
            .unwrap();
        McpServer::new(tool)
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    fn call(name: &str, arguments: Value) -> JsonRpcRequest {
        request("tools/call", json!({ "name": name, "arguments": arguments }))
    }

    #[tokio::test]
    async fn test_initialize() {
        let resp = server().handle_request(request("initialize", json!({}))).await;
        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let resp = server().handle_request(request("tools/list", json!({}))).await;
        let tools = resp.result.unwrap()["tools"].clone();
        let names: Vec<&str> = tools
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec![WEB_SEARCH_TOOL, WEBPAGE_CONTENT_TOOL]);
        assert!(tools[1]["inputSchema"]["properties"]["url"].is_object());
    }

    #[tokio::test]
    async fn test_web_search_call() {
        let resp = server()
            .handle_request(call(WEB_SEARCH_TOOL, json!({ "query": "rust" })))
            .await;
        let result = resp.result.unwrap();
        assert!(result.get("isError").is_none());
        assert_eq!(result["structuredContent"]["results"][0]["title"], "About rust");
        assert_eq!(result["structuredContent"]["page_size"], 5);
    }

    #[tokio::test]
    async fn test_webpage_content_call() {
        let resp = server()
            .handle_request(call(
                WEBPAGE_CONTENT_TOOL,
                json!({ "url": "https://example.com", "max_chars": 5 }),
            ))
            .await;
        let content = resp.result.unwrap()["structuredContent"].clone();
        assert_eq!(content["article_body"], "Hello");
        assert_eq!(content["total_pages"], 3);
        assert_eq!(content["has_next_page"], true);
        assert_eq!(content["primary_source"], "article");
    }

    #[tokio::test]
    async fn test_invalid_argument_is_tool_error() {
        let resp = server()
            .handle_request(call(
                WEBPAGE_CONTENT_TOOL,
                json!({ "url": "https://example.com", "page": 0 }),
            ))
            .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["_meta"]["retryable"], false);
        assert_eq!(
            result["content"][0]["text"],
            "Error: Page number must be 1 or greater"
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_retryable() {
        let resp = server()
            .handle_request(call(WEBPAGE_CONTENT_TOOL, json!({ "url": "https://down.example" })))
            .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["_meta"]["retryable"], true);
    }

    #[tokio::test]
    async fn test_unknown_tool_and_method() {
        let resp = server().handle_request(call("nope", json!({}))).await;
        assert_eq!(resp.error.unwrap().code, -32602);

        let resp = server().handle_request(request("resources/list", json!({}))).await;
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_malformed_arguments() {
        let resp = server()
            .handle_request(call(WEB_SEARCH_TOOL, json!({ "page": 2 })))
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32602);
        assert!(err.message.starts_with("Invalid arguments"));
    }
}
