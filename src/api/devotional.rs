//! Devotional endpoints. Unlike the other content types these can fail.

use axum::extract::State;

use super::{error, success, ApiResult};
use crate::content::ContentEnvelope;
use crate::models::DevotionalView;
use crate::AppState;

/// GET /api/devotional - Cached devotional while valid, otherwise the feed.
pub async fn get_devotional(
    State(state): State<AppState>,
) -> ApiResult<ContentEnvelope<DevotionalView>> {
    match state.content.devotional(false).await {
        Ok(envelope) => success(envelope, &state.config.app_version),
        Err(e) => error(e, &state.config.app_version),
    }
}

/// POST /api/devotional/refresh - Re-read the feed regardless of the cache.
pub async fn refresh_devotional(
    State(state): State<AppState>,
) -> ApiResult<ContentEnvelope<DevotionalView>> {
    match state.content.devotional(true).await {
        Ok(envelope) => success(envelope, &state.config.app_version),
        Err(e) => error(e, &state.config.app_version),
    }
}
