//! In-process stand-in for the notes backend, used by unit tests.
//!
//! Known paths answer like the real app; `/slow` stalls for two seconds;
//! everything else echoes the request back as JSON so tests can assert on
//! what was sent.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;

use crate::backend::PING_SENTINEL;
use crate::config::BridgeConfig;

pub(crate) const FOLDERS_BODY: &str = r#"[{"id":"f1","title":"Inbox"},{"id":"f2","title":"Work"}]"#;
pub(crate) const TAGS_BODY: &str = r#"{"items":[{"id":"t1","title":"todo"}],"has_more":false}"#;

pub(crate) async fn spawn_fake_backend(token: &str) -> BridgeConfig {
    let mut config = spawn_fake_backend_with_ping(PING_SENTINEL).await;
    config.backend_token = token.to_string();
    config
}

pub(crate) async fn spawn_fake_backend_with_ping(ping_body: &'static str) -> BridgeConfig {
    let app = Router::new().fallback(handle).with_state(ping_body);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    backend_config(port)
}

/// Config pointing at a port nothing listens on.
pub(crate) async fn unused_port_config() -> BridgeConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    backend_config(port)
}

fn backend_config(port: u16) -> BridgeConfig {
    BridgeConfig {
        backend_host: "127.0.0.1".to_string(),
        backend_port: port,
        backend_token: String::new(),
        adapter_port: 0,
    }
}

async fn handle(
    State(ping_body): State<&'static str>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path();

    if path == "/ping" {
        return ping_body.into_response();
    }
    if path == "/slow" {
        tokio::time::sleep(Duration::from_secs(2)).await;
        return StatusCode::OK.into_response();
    }
    if path.contains("missing") {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }
    if method == Method::DELETE {
        return StatusCode::OK.into_response();
    }
    match path {
        "/folders" => return FOLDERS_BODY.into_response(),
        "/tags" => return TAGS_BODY.into_response(),
        _ => {}
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    Json(json!({
        "method": method.as_str(),
        "path": path,
        "query": uri.query().unwrap_or(""),
        "content_type": content_type,
        "body": body,
    }))
    .into_response()
}
