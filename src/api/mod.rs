//! REST API module.
//!
//! Contains all API routes and handlers the new-tab page and popup call.

mod devotional;
mod meta;
mod photo;
mod preferences;
mod scripture;

pub use devotional::*;
pub use meta::*;
pub use photo::*;
pub use preferences::*;
pub use scripture::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::data::{find_language, translation_for};
use crate::errors::{ApiError, AppError};
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub app_version: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, app_version: &str) -> Self {
        Self {
            success: true,
            data,
            app_version: app_version.to_string(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, app_version: &str) -> ApiResult<T> {
    Ok(ApiResponse::new(data, app_version))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, app_version: &str) -> ApiResult<T> {
    Err(ApiError {
        error: err,
        app_version: app_version.to_string(),
    })
}

/// Translation ids become a path segment of upstream URLs, so only
/// `[A-Za-z0-9-]` is accepted.
fn validate_translation_id(id: &str) -> Result<&str, AppError> {
    if id.len() <= 64 && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        Ok(id)
    } else {
        Err(AppError::Validation(format!("Invalid translation id: {}", id)))
    }
}

/// Translation to read from: an explicit `translation` wins, then an
/// explicit `language`, then the stored language preference.
pub(crate) async fn resolve_translation(
    state: &AppState,
    language: Option<&str>,
    translation: Option<&str>,
) -> Result<String, AppError> {
    if let Some(id) = translation.map(str::trim).filter(|t| !t.is_empty()) {
        return validate_translation_id(id).map(String::from);
    }

    if let Some(code) = language.map(str::trim).filter(|l| !l.is_empty()) {
        return match find_language(code) {
            Some(language) => Ok(language.translation_id.to_string()),
            None => Err(AppError::Validation(format!("Unsupported language: {}", code))),
        };
    }

    let language = match state.repo.list_preferences().await {
        Ok(stored) => crate::models::Preferences::from_stored(&stored).language,
        Err(e) => {
            tracing::warn!("could not read language preference: {}", e);
            crate::data::DEFAULT_LANGUAGE.to_string()
        }
    };
    Ok(translation_for(&language).to_string())
}
