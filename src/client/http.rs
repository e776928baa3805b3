//! HTTP settings backend.
//!
//! # Responsibilities
//! - Build the per-server settings address
//! - `GET` the settings document, `PATCH` partial documents as JSON
//! - Map reqwest failures onto `TransportError`
//!
//! Retries are left to the caller.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, Response};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::client::backend::SettingsBackend;
use crate::client::types::{TransportError, TransportResult};
use crate::config::ApiConfig;
use crate::observability::metrics;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// reqwest-backed settings API client.
#[derive(Clone)]
pub struct HttpSettingsBackend {
    client: Client,
    base_url: Url,
    settings_path: String,
    timeout_secs: u64,
}

impl HttpSettingsBackend {
    /// Create a client for the configured API.
    pub fn new(config: &ApiConfig) -> TransportResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TransportError::Address(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            settings_path: config.settings_path.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Settings address for a server.
    ///
    /// The path template replaces the base URL's path. Each template segment
    /// is percent-encoded on its own, so the id always stays one segment.
    pub fn settings_url(&self, server_id: &str) -> TransportResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TransportError::Address(format!("{}: cannot be a base URL", self.base_url)))?;
            segments.clear();
            for segment in self.settings_path.split('/').filter(|s| !s.is_empty()) {
                segments.push(&segment.replace("{id}", server_id));
            }
        }
        Ok(url)
    }

    async fn send(&self, method: Method, server_id: &str, body: Option<&Value>) -> TransportResult<Value> {
        let url = self.settings_url(server_id)?;
        let request_id = Uuid::new_v4();
        let method_label = if method == Method::PATCH { "PATCH" } else { "GET" };

        tracing::debug!(%url, %request_id, method = method_label, "Sending settings request");

        let mut request = self
            .client
            .request(method, url.clone())
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(body) = body {
            request = request.json(body);
        }

        let start = Instant::now();
        let result = request.send().await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_request(method_label, 0, start);
                return Err(self.map_error(e));
            }
        };

        let status = response.status();
        metrics::record_request(method_label, status.as_u16(), start);

        if !status.is_success() {
            tracing::warn!(%url, %request_id, status = %status, "Settings API returned an error status");
            return Err(TransportError::Status(status.as_u16()));
        }

        self.decode(response).await
    }

    async fn decode(&self, response: Response) -> TransportResult<Value> {
        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout_secs)
            } else {
                TransportError::Decode(e.to_string())
            }
        })
    }

    fn map_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(self.timeout_secs)
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

impl SettingsBackend for HttpSettingsBackend {
    async fn load(&self, server_id: &str) -> TransportResult<Value> {
        self.send(Method::GET, server_id, None).await
    }

    async fn patch(&self, server_id: &str, body: &Value) -> TransportResult<Value> {
        self.send(Method::PATCH, server_id, Some(body)).await
    }
}
