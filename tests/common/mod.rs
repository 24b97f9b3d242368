//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use logview_client::http::{HttpClient, ReqwestTransport};

/// Fixed log rows served by the mock backend.
fn rows() -> Vec<Value> {
    vec![
        row("2024-05-01T10:00:00+08:00", "10.0.0.1", "GET", "/index.html", 200),
        row("2024-05-01T10:00:01+08:00", "10.0.0.2", "GET", "/missing", 404),
        row("2024-05-01T10:00:02+08:00", "10.0.0.1", "POST", "/api/login", 502),
    ]
}

fn row(time: &str, ip: &str, method: &str, path: &str, status: u16) -> Value {
    json!({
        "Time": time,
        "ClientIP": ip, "ClientPort": "40000", "XFF": "-",
        "Host": "example.com", "ServerPort": "443",
        "Method": method, "Path": path, "HTTPVer": "HTTP/1.1",
        "Status": status, "BodyBytes": 128, "ReqBytes": 256, "ReqTime": 0.012,
        "UpConnTime": {"Float64": 0.001, "Valid": true},
        "UpRespTime": {"Float64": 0.01, "Valid": true},
        "UpStatus": {"Int64": status, "Valid": true},
        "UpAddr": {"String": "127.0.0.1:9000", "Valid": true},
        "Referer": "-", "UA": "curl/8.0", "TLSProto": "TLSv1.3",
        "TLSCipher": "TLS_AES_128_GCM_SHA256", "ReqID": "r-1"
    })
}

/// Mimics the log backend: substring filters on ip/path, exact status,
/// limit/offset paging, `null` logs for an empty page. The received
/// `x-request-id` is echoed back.
async fn list_logs(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    let ip = query.get("ip").cloned().unwrap_or_default();
    let path = query.get("path").cloned().unwrap_or_default();
    let status = query.get("status").and_then(|s| s.parse::<u64>().ok());
    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(200);
    let offset = query.get("offset").and_then(|o| o.parse::<usize>().ok()).unwrap_or(0);

    let logs: Vec<Value> = rows()
        .into_iter()
        .filter(|r| r["ClientIP"].as_str().unwrap_or_default().contains(&ip))
        .filter(|r| r["Path"].as_str().unwrap_or_default().contains(&path))
        .filter(|r| status.map_or(true, |s| r["Status"].as_u64() == Some(s)))
        .skip(offset)
        .take(limit)
        .collect();

    let body = if logs.is_empty() {
        json!({ "total": 0, "logs": null })
    } else {
        json!({ "total": logs.len(), "logs": logs })
    };

    let mut reply = HeaderMap::new();
    if let Some(id) = headers.get("x-request-id") {
        reply.insert("x-request-id", id.clone());
    }
    (reply, Json(body))
}

/// Start a mock log backend on an ephemeral local port.
///
/// Routes: `GET /api/logs`, `GET /api/broken` (500), `GET /api/slow`
/// (answers after two seconds).
pub async fn start_log_backend() -> SocketAddr {
    let app = Router::new()
        .route("/api/logs", get(list_logs))
        .route(
            "/api/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "failed to read logs") }),
        )
        .route(
            "/api/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({ "total": 0, "logs": [] }))
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Client pointed at `addr` that bypasses any system proxy.
#[allow(dead_code)]
pub fn client_for(addr: SocketAddr) -> HttpClient {
    let mut client = HttpClient::new(transport());
    client.configure(format!("http://{}", addr));
    client
}

pub fn transport() -> ReqwestTransport {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    ReqwestTransport::with_client(client)
}
