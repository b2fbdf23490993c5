//! PSK-based authentication for `/api`.
//!
//! Keys are compared in constant time.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::{ApiError, AppError};

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// What the auth layer needs from the configuration.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub expected_psk: Option<String>,
    pub app_version: String,
}

/// PSK authentication layer. With no PSK configured every request passes.
pub async fn psk_auth_layer(settings: Arc<AuthSettings>, request: Request, next: Next) -> Response {
    let Some(expected) = settings.expected_psk.as_deref() else {
        return next.run(request).await;
    };

    let rejection = match provided_key(request.headers()) {
        Some(provided) if constant_time_compare(provided, expected) => None,
        Some(_) => Some("Invalid API key"),
        None => Some("Missing API key"),
    };

    match rejection {
        None => next.run(request).await,
        Some(message) => unauthorized_response(message, &settings.app_version),
    }
}

/// `x-api-key`, or a bearer token when that header is absent.
fn provided_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers.get(API_KEY_HEADER) {
        return key.to_str().ok();
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized_response(message: &str, app_version: &str) -> Response {
    ApiError {
        error: AppError::Unauthorized(message.to_string()),
        app_version: app_version.to_string(),
    }
    .into_response()
}
