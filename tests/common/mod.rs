//! In-process stand-in for the Up API, served by axum on an ephemeral port.

#![allow(dead_code)]

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const TOKEN: &str = "up:yeah:test-token";

pub struct FakeUp {
    pub base_url: String,
    pub state: Arc<FakeState>,
}

pub struct FakeState {
    origin: String,
    /// (path, raw query, authorization header) per request, in arrival order
    pub requests: Mutex<Vec<(String, String, Option<String>)>>,
}

impl FakeState {
    pub fn requests(&self) -> Vec<(String, String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Start the fake API. Accounts come in two pages (A, B then C), webhooks in one,
/// and only transaction `t1` exists.
pub async fn spawn_fake_up() -> FakeUp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let origin = format!("http://{addr}");
    let state = Arc::new(FakeState {
        origin: origin.clone(),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/api/v1/accounts", get(accounts))
        .route("/api/v1/webhooks", get(webhooks))
        .route("/api/v1/transactions/:id", get(transaction))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeUp {
        base_url: format!("{origin}/api/v1"),
        state,
    }
}

/// An address nothing is listening on.
pub async fn closed_port_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1")
}

/// A server that answers once with `200 OK` and a `Content-Length` of 1000, then
/// hangs up after 8 bytes of body.
pub async fn spawn_truncated_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 1000\r\n\r\n{\"data\":",
            )
            .await
            .unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/api/v1")
}

/// A server that accepts connections and never answers.
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}/api/v1")
}

fn record(state: &FakeState, path: &str, query: &HashMap<String, String>, headers: &HeaderMap) -> bool {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let mut pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    let expected = format!("Bearer {TOKEN}");
    let authorized = auth.as_deref() == Some(expected.as_str());
    state
        .requests
        .lock()
        .unwrap()
        .push((path.to_string(), pairs.join("&"), auth));
    authorized
}

fn account(id: &str, name: &str, account_type: &str, balance: i64) -> Value {
    json!({
        "type": "accounts",
        "id": id,
        "attributes": {
            "displayName": name,
            "accountType": account_type,
            "ownershipType": "INDIVIDUAL",
            "balance": {
                "currencyCode": "AUD",
                "value": format!("{:.2}", balance as f64 / 100.0),
                "valueInBaseUnits": balance
            },
            "createdAt": "2024-01-01T00:00:00+10:00"
        }
    })
}

async fn accounts(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !record(&state, "/api/v1/accounts", &query, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if query.get("page[after]").map(String::as_str) == Some("2") {
        Json(json!({
            "data": [account("C", "Holiday", "SAVER", 99)],
            "links": {"prev": null, "next": null}
        }))
        .into_response()
    } else {
        Json(json!({
            "data": [
                account("A", "Spending", "TRANSACTIONAL", 1056),
                account("B", "Savings", "SAVER", 250000)
            ],
            "links": {
                "prev": null,
                "next": format!("{}/api/v1/accounts?page%5Bafter%5D=2&page%5Bsize%5D=2", state.origin)
            }
        }))
        .into_response()
    }
}

async fn webhooks(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !record(&state, "/api/v1/webhooks", &query, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "data": [{"type": "webhooks", "id": "w1", "attributes": {"url": "https://example.com/webhook"}}],
        "links": {"prev": null, "next": null}
    }))
    .into_response()
}

async fn transaction(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/api/v1/transactions/{id}");
    if !record(&state, &path, &HashMap::new(), &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != "t1" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"errors": [{"status": "404", "title": "Not Found"}]})),
        )
            .into_response();
    }
    Json(json!({
        "data": {
            "type": "transactions",
            "id": "t1",
            "attributes": {
                "status": "SETTLED",
                "description": "Coffee",
                "amount": {"currencyCode": "AUD", "value": "-4.50", "valueInBaseUnits": -450}
            },
            "relationships": {
                "account": {"data": {"type": "accounts", "id": "A"}}
            }
        }
    }))
    .into_response()
}
