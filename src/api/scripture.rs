//! Scripture, verse search and chapter audio endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{error, resolve_translation, success, ApiResult};
use crate::content::{AudioRequest, ContentEnvelope, DEFAULT_SEARCH_LIMIT};
use crate::data::book_id;
use crate::errors::AppError;
use crate::models::{ChapterAudio, Preferences, Scripture, SearchOrigin, VerseReference, VerseSearchHit};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ScriptureQuery {
    pub language: Option<String>,
    pub translation: Option<String>,
    pub book: Option<String>,
    pub chapter: Option<u32>,
    pub verse: Option<u32>,
}

/// Scripture payload: the verse plus the reference that actually resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptureResponse {
    pub content: Scripture,
    pub source: String,
    pub cached: bool,
    pub update_available: bool,
    /// `null` whenever a fallback verse was served.
    pub resolved_reference: Option<VerseReference>,
    pub translation_id: String,
}

/// Book as a USFM id: accepts ids (`JHN`) and names (`John`, `1 Cor`).
fn resolve_book(raw: &str) -> Result<String, AppError> {
    book_id(raw)
        .map(String::from)
        .ok_or_else(|| AppError::Validation(format!("Unknown book: {}", raw.trim())))
}

/// An explicit reference needs all of book, chapter and verse.
fn explicit_reference(params: &ScriptureQuery) -> Result<Option<VerseReference>, AppError> {
    match (&params.book, params.chapter, params.verse) {
        (None, None, None) => Ok(None),
        (Some(book), Some(chapter), Some(verse)) if chapter > 0 && verse > 0 => {
            Ok(Some(VerseReference::new(resolve_book(book)?, chapter, verse)))
        }
        _ => Err(AppError::Validation(
            "book, chapter and verse must be given together (chapter and verse from 1)".to_string(),
        )),
    }
}

/// GET /api/scripture - A verse, random unless a reference is given.
pub async fn get_scripture(
    State(state): State<AppState>,
    Query(params): Query<ScriptureQuery>,
) -> ApiResult<ScriptureResponse> {
    let version = &state.config.app_version;

    let reference = match explicit_reference(&params) {
        Ok(reference) => reference,
        Err(e) => return error(e, version),
    };
    let translation_id =
        match resolve_translation(&state, params.language.as_deref(), params.translation.as_deref()).await {
            Ok(id) => id,
            Err(e) => return error(e, version),
        };

    let ContentEnvelope {
        content,
        source,
        cached,
        update_available,
    } = state.content.scripture(reference, &translation_id).await;

    success(
        ScriptureResponse {
            content: content.scripture,
            source,
            cached,
            update_available,
            resolved_reference: content.reference,
            translation_id,
        },
        version,
    )
}

#[derive(Debug, Deserialize)]
pub struct VerseSearchQuery {
    pub q: String,
    pub language: Option<String>,
    pub translation: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseSearchResponse {
    pub results: Vec<VerseSearchHit>,
    pub total: usize,
    pub origin: SearchOrigin,
    pub source: String,
}

/// GET /api/scripture/search - Reference jump or keyword search.
pub async fn search_scripture(
    State(state): State<AppState>,
    Query(params): Query<VerseSearchQuery>,
) -> ApiResult<VerseSearchResponse> {
    let version = &state.config.app_version;

    if params.q.trim().is_empty() {
        return error(AppError::Validation("q must not be empty".to_string()), version);
    }
    let translation_id =
        match resolve_translation(&state, params.language.as_deref(), params.translation.as_deref()).await {
            Ok(id) => id,
            Err(e) => return error(e, version),
        };

    let outcome = state
        .content
        .search_verses(&params.q, &translation_id, params.limit)
        .await;

    success(
        VerseSearchResponse {
            total: outcome.hits.len(),
            results: outcome.hits,
            origin: outcome.origin,
            source: outcome.source,
        },
        version,
    )
}

#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    pub book: String,
    pub chapter: u32,
    pub language: Option<String>,
    pub translation: Option<String>,
}

/// GET /api/scripture/audio - Recorded chapter audio or a speech plan.
pub async fn get_chapter_audio(
    State(state): State<AppState>,
    Query(params): Query<AudioQuery>,
) -> ApiResult<ContentEnvelope<ChapterAudio>> {
    let version = &state.config.app_version;

    if params.chapter == 0 {
        return error(AppError::Validation("chapter starts at 1".to_string()), version);
    }
    let book = match resolve_book(&params.book) {
        Ok(book) => book,
        Err(e) => return error(e, version),
    };
    let translation_id =
        match resolve_translation(&state, params.language.as_deref(), params.translation.as_deref()).await {
            Ok(id) => id,
            Err(e) => return error(e, version),
        };

    let voice = match state.repo.list_preferences().await {
        Ok(stored) => Some(Preferences::from_stored(&stored).voice),
        Err(e) => {
            tracing::warn!("could not read voice preference: {}", e);
            None
        }
    };

    let request = AudioRequest {
        translation_id,
        book,
        chapter: params.chapter,
        voice,
    };
    success(state.content.chapter_audio(&request).await, version)
}
