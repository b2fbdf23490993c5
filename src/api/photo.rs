//! Background photo endpoints.

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult};
use crate::content::ContentEnvelope;
use crate::models::BackgroundPhoto;
use crate::AppState;

/// GET /api/photo - Cached photo while valid, otherwise a fresh one.
pub async fn get_photo(State(state): State<AppState>) -> ApiResult<ContentEnvelope<BackgroundPhoto>> {
    success(state.content.photo(false).await, &state.config.app_version)
}

/// POST /api/photo/refresh - Skip the cache and fetch a new photo.
pub async fn refresh_photo(
    State(state): State<AppState>,
) -> ApiResult<ContentEnvelope<BackgroundPhoto>> {
    success(state.content.photo(true).await, &state.config.app_version)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub cleared: bool,
}

/// DELETE /api/photo - Background reset: forget the cached photo.
pub async fn reset_photo(State(state): State<AppState>) -> ApiResult<ResetResponse> {
    let cleared = state.content.reset_photo().await;
    tracing::info!(cleared, "background reset");
    success(ResetResponse { cleared }, &state.config.app_version)
}
