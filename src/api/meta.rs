//! Study links, language table and service status.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult};
use crate::content::text::{
    create_bible_gateway_url, create_youversion_url, reading_plan_passages, READING_PLAN_MARKER,
};
use crate::content::CacheStatus;
use crate::data::{Language, LANGUAGES};
use crate::errors::AppError;
use crate::models::ReadingPassage;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LinksQuery {
    pub reference: String,
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyLinks {
    pub reference: String,
    pub bible_gateway_url: String,
    /// Absent when the reference has no plain `Book N` prefix.
    pub youversion_url: Option<String>,
    /// Filled when `reference` is a reading-plan line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub passages: Vec<ReadingPassage>,
}

fn study_links(reference: &str, version: Option<&str>) -> StudyLinks {
    let passages = if reference.starts_with(READING_PLAN_MARKER) {
        reading_plan_passages(reference)
            .into_iter()
            .map(|passage| ReadingPassage {
                bible_gateway_url: create_bible_gateway_url(&passage, version),
                passage,
            })
            .collect()
    } else {
        Vec::new()
    };

    StudyLinks {
        reference: reference.to_string(),
        bible_gateway_url: create_bible_gateway_url(reference, version),
        youversion_url: create_youversion_url(reference),
        passages,
    }
}

/// GET /api/links - Bible Gateway and YouVersion links for a reference.
pub async fn get_links(
    State(state): State<AppState>,
    Query(params): Query<LinksQuery>,
) -> ApiResult<StudyLinks> {
    let version = &state.config.app_version;

    let reference = params.reference.trim();
    if reference.is_empty() {
        return error(AppError::Validation("reference must not be empty".to_string()), version);
    }
    let bible_version = params
        .version
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());

    success(study_links(reference, bible_version), version)
}

/// GET /api/languages - Supported languages and their translations.
pub async fn list_languages(State(state): State<AppState>) -> ApiResult<&'static [Language]> {
    success(LANGUAGES, &state.config.app_version)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub app_version: String,
    pub cache_ttl_seconds: u64,
    pub caches: Vec<CacheStatus>,
    /// True if any cache was written by a different app version.
    pub update_available: bool,
}

/// GET /api/status - Version and cache state per content type.
pub async fn get_status(State(state): State<AppState>) -> ApiResult<StatusResponse> {
    let caches = state.content.cache_status().await;
    let update_available = caches
        .iter()
        .any(|c| c.state == crate::models::CacheState::VersionMismatch);

    success(
        StatusResponse {
            app_version: state.config.app_version.clone(),
            cache_ttl_seconds: state.config.cache_ttl.as_secs(),
            caches,
            update_available,
        },
        &state.config.app_version,
    )
}
