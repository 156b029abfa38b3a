use reqwest::StatusCode;

/// Failures talking to the n8n REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    /// The request never produced a response (DNS, refused, timeout).
    #[error("No response received from server: {0}")]
    Network(String),
    #[error("Unexpected response body: {0}")]
    Decode(String),
    #[error("Invalid value for header {0}")]
    InvalidHeader(&'static str),
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Build a status error, preferring the `message` field of a JSON body.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty()).then_some(text)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}
