//! Preference endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use super::{error, success, ApiResult};
use crate::data::{find_language, BUILTIN_BACKGROUNDS};
use crate::errors::AppError;
use crate::models::{keys, BackgroundKind, FontStyle, Preferences, Theme, UpdatePreferencesRequest};
use crate::AppState;

const MAX_BACKGROUND_VALUE_LEN: usize = 2048;
const MAX_VOICE_LEN: usize = 200;

/// GET /api/preferences - Stored preferences merged over defaults.
pub async fn get_preferences(State(state): State<AppState>) -> ApiResult<Preferences> {
    match state.repo.list_preferences().await {
        Ok(stored) => success(Preferences::from_stored(&stored), &state.config.app_version),
        Err(e) => error(e, &state.config.app_version),
    }
}

/// Changes to write and keys to drop, once a request has been validated.
#[derive(Debug, Default, PartialEq)]
struct PreferenceChanges {
    set: Vec<(&'static str, String)>,
    clear: Vec<&'static str>,
    resets_background: bool,
}

fn validate(request: &UpdatePreferencesRequest) -> Result<PreferenceChanges, AppError> {
    let mut changes = PreferenceChanges::default();

    if let Some(language) = &request.language {
        let language = language.trim();
        if find_language(language).is_none() {
            return Err(AppError::Validation(format!("Unsupported language: {}", language)));
        }
        changes.set.push((keys::LANGUAGE, language.to_string()));
    }

    if let Some(font) = &request.font_style {
        let font = FontStyle::parse(font.trim())
            .ok_or_else(|| AppError::Validation(format!("Invalid fontStyle: {}", font)))?;
        changes.set.push((keys::FONT_STYLE, font.as_str().to_string()));
    }

    if let Some(theme) = &request.theme {
        let theme = Theme::parse(theme.trim())
            .ok_or_else(|| AppError::Validation(format!("Invalid theme: {}", theme)))?;
        changes.set.push((keys::THEME, theme.as_str().to_string()));
    }

    if let Some(background) = &request.background {
        let kind = BackgroundKind::parse(background.kind.trim()).ok_or_else(|| {
            AppError::Validation(format!("Invalid background type: {}", background.kind))
        })?;
        let value = background.value.trim();

        match kind {
            BackgroundKind::None => {
                changes.clear.extend([keys::BACKGROUND_TYPE, keys::BACKGROUND_VALUE]);
                changes.resets_background = true;
            }
            _ if value.is_empty() => {
                return Err(AppError::Validation(
                    "background value is required for this type".to_string(),
                ));
            }
            _ if value.len() > MAX_BACKGROUND_VALUE_LEN => {
                return Err(AppError::Validation("background value is too long".to_string()));
            }
            _ => {
                changes.set.push((keys::BACKGROUND_TYPE, kind.as_str().to_string()));
                changes.set.push((keys::BACKGROUND_VALUE, value.to_string()));
            }
        }
    }

    if let Some(voice) = &request.voice {
        if voice.len() > MAX_VOICE_LEN {
            return Err(AppError::Validation("voice is too long".to_string()));
        }
        changes.set.push((keys::VOICE, voice.trim().to_string()));
    }

    if let Some(voice_id) = &request.eleven_labs_voice_id {
        if voice_id.len() > MAX_VOICE_LEN {
            return Err(AppError::Validation("elevenLabsVoiceId is too long".to_string()));
        }
        changes.set.push((keys::ELEVEN_LABS_VOICE_ID, voice_id.trim().to_string()));
    }

    if let Some(show) = request.show_date_time {
        changes.set.push((keys::SHOW_DATE_TIME, show.to_string()));
    }

    Ok(changes)
}

/// PUT /api/preferences - Partial update; absent fields are kept.
///
/// Setting the background type to `""` is the background reset: it also
/// drops the cached photo so the next request fetches a new one.
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> ApiResult<Preferences> {
    let version = &state.config.app_version;

    let changes = match validate(&request) {
        Ok(changes) => changes,
        Err(e) => return error(e, version),
    };

    if !changes.set.is_empty() {
        if let Err(e) = state.repo.set_preferences(&changes.set).await {
            return error(e, version);
        }
    }
    if !changes.clear.is_empty() {
        if let Err(e) = state.repo.delete_preferences(&changes.clear).await {
            return error(e, version);
        }
    }
    if changes.resets_background {
        state.content.reset_photo().await;
    }

    match state.repo.list_preferences().await {
        Ok(stored) => success(Preferences::from_stored(&stored), version),
        Err(e) => error(e, version),
    }
}

#[derive(Debug, Serialize)]
pub struct BuiltinBackground {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: &'static str,
}

/// GET /api/preferences/backgrounds - Backgrounds offered in settings.
pub async fn list_backgrounds(State(state): State<AppState>) -> ApiResult<Vec<BuiltinBackground>> {
    let backgrounds = BUILTIN_BACKGROUNDS
        .iter()
        .map(|&(kind, value)| BuiltinBackground { kind, value })
        .collect();
    success(backgrounds, &state.config.app_version)
}
