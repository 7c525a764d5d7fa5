//! Error types for API responses, classified by how callers should react.

use reqwest::{Response, StatusCode};

/// A non-2xx answer from the Ecovia API, carrying the status and response
/// body so callers can inspect what the server actually said.
#[derive(Debug)]
pub enum ApiError {
    /// Authentication rejected (HTTP 401).
    Unauthorized { body: String },
    /// The token refresh endpoint itself answered non-2xx.
    RefreshFailed { status: StatusCode, body: String },
    /// Any other non-2xx status.
    Status { status: StatusCode, body: String },
}

impl ApiError {
    /// Builds an error from a failed response, consuming its body.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized { body },
            _ => ApiError::Status { status, body },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::RefreshFailed { status, .. } => *status,
            ApiError::Status { status, .. } => *status,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            ApiError::Unauthorized { body } => body,
            ApiError::RefreshFailed { body, .. } => body,
            ApiError::Status { body, .. } => body,
        }
    }
}

/// Extracts the server's human-readable `message` field when the body is
/// the conventional `{"message": "..."}` error envelope.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(String::from)
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized { body } => match server_message(body) {
                Some(msg) => write!(f, "Authentication failed: {}", msg),
                None => write!(f, "Authentication failed. Sign in again with `ecovia login`."),
            },
            ApiError::RefreshFailed { status, body } => match server_message(body) {
                Some(msg) => write!(f, "Session refresh rejected (HTTP {}): {}", status.as_u16(), msg),
                None => write!(
                    f,
                    "Session refresh rejected (HTTP {}). Sign in again with `ecovia login`.",
                    status.as_u16()
                ),
            },
            ApiError::Status { status, body } => match server_message(body) {
                Some(msg) => write!(f, "HTTP {}: {}", status.as_u16(), msg),
                None => write!(f, "HTTP {} error", status.as_u16()),
            },
        }
    }
}

impl std::error::Error for ApiError {}
