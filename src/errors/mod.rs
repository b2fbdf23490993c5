//! Error handling module for the Tabspire backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const UPSTREAM_STATUS: &str = "UPSTREAM_STATUS";
    pub const MALFORMED_RESPONSE: &str = "MALFORMED_RESPONSE";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const SOURCES_EXHAUSTED: &str = "SOURCES_EXHAUSTED";
    pub const DEVOTIONAL_UNAVAILABLE: &str = "DEVOTIONAL_UNAVAILABLE";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const SEARCH_ERROR: &str = "SEARCH_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
///
/// The upstream variants (`Network`, `UpstreamStatus`, `Malformed`, `Timeout`)
/// are caught by the fallback chains and only reach a client when a chain
/// with no terminal source runs dry.
#[derive(Debug)]
pub enum AppError {
    /// Authentication required
    Unauthorized(String),
    /// Validation error
    Validation(String),
    /// Missing or malformed configuration (e.g. an API key for a source)
    Config(String),
    /// Transport failure talking to an upstream service
    Network(String),
    /// Upstream answered with a non-2xx status
    UpstreamStatus { url: String, status: u16 },
    /// Upstream answered 2xx but the body was not what we expected
    Malformed(String),
    /// A bounded lookup ran out of time
    Timeout(String),
    /// Every source in a chain failed
    Exhausted { chain: String, last: Box<AppError> },
    /// The devotional feed could not be resolved
    DevotionalUnavailable(String),
    /// Storage error
    Storage(String),
    /// Search index error
    Search(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Network(_)
            | AppError::UpstreamStatus { .. }
            | AppError::Malformed(_)
            | AppError::Exhausted { .. }
            | AppError::DevotionalUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Network(_) => codes::NETWORK_ERROR,
            AppError::UpstreamStatus { .. } => codes::UPSTREAM_STATUS,
            AppError::Malformed(_) => codes::MALFORMED_RESPONSE,
            AppError::Timeout(_) => codes::TIMEOUT,
            AppError::Exhausted { .. } => codes::SOURCES_EXHAUSTED,
            AppError::DevotionalUnavailable(_) => codes::DEVOTIONAL_UNAVAILABLE,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Search(_) => codes::SEARCH_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::Network(msg) => msg.clone(),
            AppError::UpstreamStatus { url, status } => {
                format!("{} responded with HTTP {}", url, status)
            }
            AppError::Malformed(msg) => msg.clone(),
            AppError::Timeout(msg) => msg.clone(),
            AppError::Exhausted { chain, last } => {
                format!("All {} sources failed (last: {})", chain, last.message())
            }
            AppError::DevotionalUnavailable(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Search(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        AppError::Storage(format!("Storage error: {}", err))
    }
}

impl From<tantivy::TantivyError> for AppError {
    fn from(err: tantivy::TantivyError) -> Self {
        tracing::error!("Search error: {:?}", err);
        AppError::Search(format!("Search error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Malformed(format!("JSON error: {}", err))
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(err: quick_xml::Error) -> Self {
        AppError::Malformed(format!("XML error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "upstream".to_string());

        if err.is_timeout() {
            AppError::Timeout(format!("Request to {} timed out", url))
        } else if err.is_decode() {
            AppError::Malformed(format!("Unexpected response format from {}: {}", url, err))
        } else if let Some(status) = err.status() {
            AppError::UpstreamStatus {
                url,
                status: status.as_u16(),
            }
        } else {
            AppError::Network(format!("Request to {} failed: {}", url, err))
        }
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub app_version: String,
}

impl ErrorResponse {
    pub fn new(error: &AppError, app_version: &str) -> Self {
        let details = match error {
            AppError::UpstreamStatus { status, .. } => {
                Some(serde_json::json!({ "upstreamStatus": status }))
            }
            AppError::Exhausted { chain, last } => Some(serde_json::json!({
                "chain": chain,
                "lastError": last.error_code(),
            })),
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
            app_version: app_version.to_string(),
        }
    }
}

/// Wrapper type for errors that carry the app version into the envelope.
pub struct ApiError {
    pub error: AppError,
    pub app_version: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, &self.app_version);
        (status, Json(body)).into_response()
    }
}
