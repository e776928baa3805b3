//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A request received by the mock settings API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub server_id: String,
    pub body: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Default)]
struct MockState {
    get_response: Mutex<(u16, Value)>,
    patch_response: Mutex<(u16, Value)>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Programmable settings API listening on an ephemeral port.
#[derive(Clone)]
pub struct MockSettingsApi {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockSettingsApi {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn respond_to_get(&self, status: u16, body: Value) {
        *self.state.get_response.lock().unwrap() = (status, body);
    }

    pub fn respond_to_patch(&self, status: u16, body: Value) {
        *self.state.patch_response.lock().unwrap() = (status, body);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn reply((status, body): (u16, Value)) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(body),
    )
}

async fn get_settings(
    State(state): State<Arc<MockState>>,
    Path(server_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(RecordedRequest {
        method: "GET",
        server_id,
        body: None,
        content_type: header(&headers, "content-type"),
        request_id: header(&headers, "x-request-id"),
    });
    reply(state.get_response.lock().unwrap().clone())
}

async fn patch_settings(
    State(state): State<Arc<MockState>>,
    Path(server_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(RecordedRequest {
        method: "PATCH",
        server_id,
        body: Some(String::from_utf8_lossy(&body).into_owned()),
        content_type: header(&headers, "content-type"),
        request_id: header(&headers, "x-request-id"),
    });
    reply(state.patch_response.lock().unwrap().clone())
}

/// Start a mock settings API that answers 404 until programmed.
pub async fn start_settings_api() -> MockSettingsApi {
    let state = Arc::new(MockState::default());
    *state.get_response.lock().unwrap() = (404, json!({}));
    *state.patch_response.lock().unwrap() = (404, json!({}));

    let app = Router::new()
        .route(
            "/api/servers/{id}/settings",
            get(get_settings).patch(patch_settings),
        )
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockSettingsApi { addr, state }
}

/// The worker settings of a stock appliance.
#[allow(dead_code)]
pub fn settings_data() -> Value {
    json!({
        "workers": {
            "ems_metrics_collector_worker": { "count": 8, "memory_threshold": 419430400 },
            "ems_metrics_processor_worker": { "count": 2, "memory_threshold": 629145600 },
            "ems_refresh_worker": { "memory_threshold": 2147483648u64 },
            "event_catcher": { "memory_threshold": "2.gigabytes" },
            "generic_worker": { "count": 2, "memory_threshold": 524288000 },
            "priority_worker": { "count": 2, "memory_threshold": 419430400 },
            "queue_worker_base": { "memory_threshold": "500.megabytes" },
            "remote_console_worker": { "memory_threshold": "1.gigabytes" },
            "reporting_worker": { "count": 2, "memory_threshold": 524288000 },
            "smart_proxy_worker": { "count": 2, "memory_threshold": 576716800 },
            "ui_worker": { "count": 1, "memory_threshold": "1.gigabytes" },
            "web_service_worker": { "connection_pool_size": 8, "memory_threshold": 1073741824 },
            "worker_base": { "count": 1, "memory_threshold": "400.megabytes" },
        }
    })
}
