//! HTTP client for the n8n public REST API.

pub mod error;

pub use error::ApiError;

use crate::core::config::ApiConfig;
use n8n_workflow_types::{WorkflowPage, WorkflowSummary};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use std::collections::HashSet;

/// ASCII set for encoding path segments (slashes included).
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'%')
    .add(b'"');

const API_KEY_HEADER: &str = "x-n8n-api-key";

/// Largest page size the listing endpoint accepts.
const PAGE_LIMIT: &str = "250";

/// Talks to one n8n instance. Cheap to clone.
#[derive(Clone)]
pub struct WorkflowClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl WorkflowClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ApiError::InvalidHeader("X-N8N-API-KEY"))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        Ok(WorkflowClient { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch every workflow, following `nextCursor` until the last page.
    ///
    /// A cursor the server already handed out is a decode error, so a server
    /// that keeps repeating itself cannot trap the listing in a loop.
    pub async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ApiError> {
        let url = self.api_url(&["workflows"]);
        let mut workflows = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();

        loop {
            let mut request = self.http.get(&url).query(&[("limit", PAGE_LIMIT)]);
            if let Some(cursor) = &cursor {
                request = request.query(&[("cursor", cursor.as_str())]);
            }

            let body = self.send(request).await?;

            // Older servers answer with a bare array
            if body.is_array() {
                let page: Vec<WorkflowSummary> = decode(body)?;
                workflows.extend(page);
                break;
            }

            let page: WorkflowPage = decode(body)?;
            workflows.extend(page.data);
            match page.next_cursor.filter(|c| !c.is_empty()) {
                Some(next) if !seen_cursors.insert(next.clone()) => {
                    tracing::warn!(
                        cursor = %next,
                        pages = seen_cursors.len(),
                        "pagination cursor repeated"
                    );
                    return Err(ApiError::Decode(format!(
                        "server repeated pagination cursor '{}'",
                        next
                    )));
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = workflows.len(), "listed workflows");
        Ok(workflows)
    }

    pub async fn get_workflow(&self, id: &str) -> Result<Value, ApiError> {
        let url = self.api_url(&["workflows", &encode_segment(id)]);
        self.send(self.http.get(url)).await
    }

    pub async fn create_workflow(&self, payload: &Value) -> Result<Value, ApiError> {
        let url = self.api_url(&["workflows"]);
        self.send(self.http.post(url).json(payload)).await
    }

    pub async fn update_workflow(&self, id: &str, payload: &Value) -> Result<Value, ApiError> {
        let url = self.api_url(&["workflows", &encode_segment(id)]);
        self.send(self.http.put(url).json(payload)).await
    }

    pub async fn delete_workflow(&self, id: &str) -> Result<Value, ApiError> {
        let url = self.api_url(&["workflows", &encode_segment(id)]);
        self.send(self.http.delete(url)).await
    }

    pub async fn activate_workflow(&self, id: &str) -> Result<Value, ApiError> {
        self.workflow_action(id, "activate").await
    }

    pub async fn deactivate_workflow(&self, id: &str) -> Result<Value, ApiError> {
        self.workflow_action(id, "deactivate").await
    }

    /// Start a manual test execution of a stored workflow.
    pub async fn test_workflow(&self, id: &str) -> Result<Value, ApiError> {
        let url = self.api_url(&["workflows", &encode_segment(id), "test"]);
        self.send(self.http.post(url).json(&json!({}))).await
    }

    /// POST `payload` to a production webhook. Non-JSON answers come back as
    /// a JSON string.
    pub async fn trigger_webhook(&self, path: &str, payload: &Value) -> Result<Value, ApiError> {
        let url = self.webhook_url(path);
        let request = self.http.post(url).json(payload);
        let bytes = self.send_raw(request).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())))
    }

    async fn workflow_action(&self, id: &str, action: &str) -> Result<Value, ApiError> {
        let url = self.api_url(&["workflows", &encode_segment(id), action]);
        self.send(self.http.request(Method::POST, url)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let bytes = self.send_raw(request).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let url = response.url().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        tracing::debug!(%url, status = status.as_u16(), bytes = bytes.len(), "n8n response");

        if !status.is_success() {
            return Err(ApiError::from_response(status, &bytes));
        }
        Ok(bytes.to_vec())
    }

    fn api_url(&self, segments: &[&str]) -> String {
        let base = format!(
            "{}{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            self.config.api_path
        );
        join_path(&base, segments)
    }

    fn webhook_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path.split('/').map(encode_segment).collect();
        let mut segments: Vec<&str> = vec![self.config.webhook_prefix.as_str()];
        segments.extend(encoded.iter().map(String::as_str));
        join_path(self.config.base_url.as_str(), &segments)
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT_ENCODE_SET).to_string()
}

fn join_path(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        if !segment.is_empty() {
            url.push('/');
            url.push_str(segment);
        }
    }
    url
}
