//! MCP JSON-RPC 2.0 server over HTTP.
//!
//! Every path accepts a POST whose body is one JSON-RPC envelope. Both
//! successful and failed calls answer HTTP 200 with a JSON-RPC body; only
//! non-POST requests (405) and unparseable bodies (400) fail at the HTTP
//! level.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use super::executor::ToolExecutor;
use super::tools::ToolRegistry;
use super::types::*;
use crate::error::Result;
use crate::health::BackendStatus;

/// Request dispatcher. Shared read-only across all in-flight requests.
#[derive(Debug, Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    executor: ToolExecutor,
    status: BackendStatus,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, executor: ToolExecutor, status: BackendStatus) -> Self {
        Self {
            registry: Arc::new(registry),
            executor,
            status,
        }
    }

    /// Handle a single JSON-RPC request.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => {
                info!("client initializing");
                result_response(id, &InitializeResult::default())
            }

            "tools/list" => {
                debug!("listing tools");
                let result = ToolsListResult {
                    tools: self.registry.list(),
                };
                result_response(id, &result)
            }

            "tools/call" => {
                let params: ToolsCallParams = match serde_json::from_value(request.params.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return JsonRpcResponse::error(
                            id,
                            INVALID_PARAMS,
                            format!("Invalid params: {}", e),
                        );
                    }
                };

                debug!(tool = %params.name, "calling tool");

                match self.executor.execute(&params.name, &params.arguments).await {
                    Ok(text) => result_response(id, &ToolsCallResult::text(text)),
                    Err(e) => {
                        warn!(
                            tool = %params.name,
                            error = %e,
                            backend_reachable = self.status.is_reachable(),
                            "tool call failed"
                        );
                        JsonRpcResponse::error(id, e.rpc_code(), e.to_string())
                    }
                }
            }

            _ => {
                warn!(method = %request.method, "unknown method");
                JsonRpcResponse::error(id, METHOD_NOT_FOUND, "Method not found")
            }
        }
    }

    /// Axum router serving the JSON-RPC endpoint on every path.
    pub fn router(self) -> Router {
        Router::new()
            .fallback(handle_http)
            .layer(TraceLayer::new_for_http())
            .with_state(self)
    }
}

/// Bind the listening socket. Failure here is fatal to the process.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    Ok(TcpListener::bind(addr).await?)
}

/// Serve requests on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, server: McpServer) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "MCP server listening");
    }
    axum::serve(listener, server.router()).await?;
    Ok(())
}

async fn handle_http(State(server): State<McpServer>, method: Method, body: Bytes) -> Response {
    if method != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "invalid JSON-RPC request");
            return (StatusCode::BAD_REQUEST, "Invalid JSON").into_response();
        }
    };

    let response = server.handle_request(&request).await;
    Json(response).into_response()
}

fn result_response<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendClient;
    use crate::config::BridgeConfig;
    use crate::test_support::{spawn_fake_backend, unused_port_config, FOLDERS_BODY};
    use serde_json::json;

    fn server_for(config: &BridgeConfig) -> McpServer {
        let client = BackendClient::new(config).unwrap();
        McpServer::new(
            ToolRegistry::new(),
            ToolExecutor::new(client),
            BackendStatus::default(),
        )
    }

    fn rpc(id: Value, method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.to_string(),
            params,
        }
    }

    fn call(id: Value, tool: &str, arguments: Value) -> JsonRpcRequest {
        rpc(id, "tools/call", json!({"name": tool, "arguments": arguments}))
    }

    fn result_text(resp: &JsonRpcResponse) -> &str {
        resp.result.as_ref().unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server_for(&unused_port_config().await);
        let resp = server.handle_request(&rpc(json!(1), "initialize", json!({}))).await;

        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "joplin-mcp-server");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_is_stable() {
        let server = server_for(&unused_port_config().await);
        let first = server.handle_request(&rpc(json!(1), "tools/list", Value::Null)).await;
        let second = server.handle_request(&rpc(json!(1), "tools/list", Value::Null)).await;

        let tools = first.result.as_ref().unwrap()["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 8);
        assert_eq!(tools[0]["name"], "list_notes");
        assert_eq!(tools[7]["name"], "list_tags");
        assert!(tools[1]["inputSchema"].is_object());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = server_for(&unused_port_config().await);
        let resp = server.handle_request(&rpc(json!("abc"), "resources/list", json!({}))).await;

        assert_eq!(resp.id, json!("abc"));
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_null_id_is_echoed() {
        let server = server_for(&unused_port_config().await);
        let resp = server.handle_request(&rpc(Value::Null, "nope", Value::Null)).await;
        let out = serde_json::to_value(&resp).unwrap();
        assert_eq!(out["id"], Value::Null);
        assert!(out.as_object().unwrap().contains_key("id"));
    }

    #[tokio::test]
    async fn test_malformed_call_params() {
        let server = server_for(&unused_port_config().await);

        let resp = server.handle_request(&rpc(json!(3), "tools/call", json!({"arguments": {}}))).await;
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);

        let resp = server.handle_request(&rpc(json!(4), "tools/call", Value::Null)).await;
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_bad_tool_arguments_are_invalid_params() {
        let server = server_for(&unused_port_config().await);
        let resp = server.handle_request(&call(json!(5), "get_note", json!({"note_id": 17}))).await;
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_internal_error() {
        let server = server_for(&unused_port_config().await);
        let resp = server.handle_request(&call(json!(6), "rm_rf", json!({}))).await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, INTERNAL_ERROR);
        assert!(err.message.contains("rm_rf"));
    }

    #[tokio::test]
    async fn test_backend_error_is_internal_error() {
        let config = spawn_fake_backend("").await;
        let server = server_for(&config);
        let resp = server
            .handle_request(&call(json!(7), "get_note", json!({"note_id": "missing"})))
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, INTERNAL_ERROR);
        assert!(err.message.contains("404"));
        assert!(err.message.contains("not found"));
    }

    #[tokio::test]
    async fn test_backend_down_is_internal_error() {
        let server = server_for(&unused_port_config().await);
        let resp = server.handle_request(&call(json!(8), "list_tags", json!({}))).await;
        assert_eq!(resp.error.unwrap().code, INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_backend_down_error_hides_token() {
        let mut config = unused_port_config().await;
        config.backend_token = "SUPERSECRET".to_string();
        let server = server_for(&config);

        let resp = server.handle_request(&call(json!(10), "list_tags", json!({}))).await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, INTERNAL_ERROR);
        assert!(err.message.starts_with("backend request failed"));
        assert!(!err.message.contains("SUPERSECRET"));
    }

    #[tokio::test]
    async fn test_array_arguments_are_invalid_params() {
        let config = spawn_fake_backend("").await;
        let server = server_for(&config);

        let resp = server.handle_request(&call(json!(11), "delete_note", json!(["n9"]))).await;
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_list_folders_round_trip() {
        let config = spawn_fake_backend("tok").await;
        let server = server_for(&config);

        let wire = serde_json::to_string(&call(json!(42), "list_folders", json!({}))).unwrap();
        let request: JsonRpcRequest = serde_json::from_str(&wire).unwrap();
        let response = server.handle_request(&request).await;
        let parsed: JsonRpcResponse =
            serde_json::from_str(&serde_json::to_string(&response).unwrap()).unwrap();

        assert_eq!(parsed.id, json!(42));
        assert!(parsed.error.is_none());
        assert_eq!(parsed.result.as_ref().unwrap()["content"][0]["type"], "text");
        assert_eq!(result_text(&parsed), FOLDERS_BODY);
    }

    #[tokio::test]
    async fn test_concurrent_calls_do_not_mix() {
        let config = spawn_fake_backend("").await;
        let server = server_for(&config);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let server = server.clone();
                tokio::spawn(async move {
                    let note_id = format!("note-{}", i);
                    let resp = server
                        .handle_request(&call(json!(i), "get_note", json!({"note_id": note_id})))
                        .await;
                    (i, resp)
                })
            })
            .collect();

        for handle in handles {
            let (i, resp) = handle.await.unwrap();
            assert_eq!(resp.id, json!(i));
            let echoed: Value = serde_json::from_str(result_text(&resp)).unwrap();
            assert_eq!(echoed["path"], format!("/notes/note-{}", i));
        }
    }

    async fn spawn_adapter(config: &BridgeConfig) -> String {
        let listener = bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = server_for(config);
        tokio::spawn(async move {
            serve(listener, server).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_http_rejects_non_post() {
        let url = spawn_adapter(&unused_port_config().await).await;
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status().as_u16(), 405);
    }

    #[tokio::test]
    async fn test_http_rejects_bad_json() {
        let url = spawn_adapter(&unused_port_config().await).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_http_rpc_errors_are_200() {
        let url = spawn_adapter(&unused_port_config().await).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&json!({"jsonrpc": "2.0", "id": 9, "method": "bogus"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["id"], 9);
        assert_eq!(body["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_http_tool_call_end_to_end() {
        let backend = spawn_fake_backend("tok").await;
        let url = spawn_adapter(&backend).await;
        let resp = reqwest::Client::new()
            .post(format!("{}mcp", url))
            .json(&json!({
                "jsonrpc": "2.0",
                "id": "req-1",
                "method": "tools/call",
                "params": {"name": "list_folders"}
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["id"], "req-1");
        assert_eq!(body["result"]["content"][0]["text"], FOLDERS_BODY);
    }
}
