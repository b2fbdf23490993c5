//! Content resolution: fallback chains per content type, fronted by the cache.

mod audio;
mod chain;
mod devotional;
mod http;
mod photo;
mod scripture;
mod search;
pub mod text;

pub use audio::*;
pub use chain::*;
pub use devotional::*;
pub use http::*;
pub use photo::*;
pub use scripture::*;
pub use search::*;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::cache::{Cache, CacheLookup};
use crate::config::Config;
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{
    BackgroundPhoto, CacheState, ChapterAudio, ContentType, Devotional, DevotionalView,
    ScriptureResolution, VerseReference,
};
use crate::search::VerseIndex;

/// What every content endpoint returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEnvelope<T> {
    pub content: T,
    pub source: String,
    pub cached: bool,
    pub update_available: bool,
}

impl<T> ContentEnvelope<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ContentEnvelope<U> {
        ContentEnvelope {
            content: f(self.content),
            source: self.source,
            cached: self.cached,
            update_available: self.update_available,
        }
    }
}

/// Cache state of one content type, for `/api/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub content_type: ContentType,
    pub state: CacheState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_version: Option<String>,
}

/// Owns every fetcher and the two content caches.
pub struct ContentService {
    scripture: ScriptureFetcher,
    search: VerseSearch,
    photos: PhotoFetcher,
    devotionals: DevotionalFetcher,
    audio: AudioFetcher,
    photo_cache: Cache<Resolved<BackgroundPhoto>>,
    devotional_cache: Cache<Resolved<Devotional>>,
}

impl ContentService {
    pub fn new(
        config: &Config,
        repo: Arc<Repository>,
        index: Arc<VerseIndex>,
    ) -> Result<Self, AppError> {
        let client = UpstreamClient::new(config.upstream_timeout)?;

        let service = Self {
            scripture: ScriptureFetcher::new(client.clone(), config),
            search: VerseSearch::new(client.clone(), config, index),
            photos: PhotoFetcher::new(client.clone(), config),
            devotionals: DevotionalFetcher::new(client.clone(), config),
            audio: AudioFetcher::new(client, config),
            photo_cache: Cache::new(
                repo.clone(),
                ContentType::Photo,
                config.cache_ttl,
                config.app_version.clone(),
            ),
            devotional_cache: Cache::new(
                repo,
                ContentType::Devotional,
                config.cache_ttl,
                config.app_version.clone(),
            ),
        };

        tracing::info!(sources = ?service.photos.source_ids(), "photo chain");
        tracing::info!(relays = ?service.devotionals.relay_ids(), "devotional relays");
        Ok(service)
    }

    /// Scripture is never cached: every refresh picks anew.
    pub async fn scripture(
        &self,
        reference: Option<VerseReference>,
        translation_id: &str,
    ) -> ContentEnvelope<ScriptureResolution> {
        let resolved = self.scripture.fetch(reference, translation_id).await;
        ContentEnvelope {
            content: resolved.content,
            source: resolved.source,
            cached: false,
            update_available: false,
        }
    }

    pub async fn search_verses(&self, query: &str, translation_id: &str, limit: usize) -> SearchOutcome {
        self.search.search(query, translation_id, limit).await
    }

    /// Cached photo if valid, otherwise the photo chain. `force` skips the cache read.
    pub async fn photo(&self, force: bool) -> ContentEnvelope<BackgroundPhoto> {
        let update_available = match self.check_cache(&self.photo_cache, force).await {
            Ok(hit) => return hit,
            Err(update_available) => update_available,
        };

        let resolved = self.photos.fetch().await;
        self.photo_cache.write(&resolved).await;
        fresh(resolved, update_available)
    }

    /// Background reset: drops the cached photo.
    pub async fn reset_photo(&self) -> bool {
        self.photo_cache.clear().await
    }

    pub async fn devotional(&self, force: bool) -> Result<ContentEnvelope<DevotionalView>, AppError> {
        let update_available = match self.check_cache(&self.devotional_cache, force).await {
            Ok(hit) => return Ok(hit.map(devotional_view)),
            Err(update_available) => update_available,
        };

        let resolved = self.devotionals.fetch().await?;
        self.devotional_cache.write(&resolved).await;
        Ok(fresh(resolved, update_available).map(devotional_view))
    }

    pub async fn chapter_audio(&self, request: &AudioRequest) -> ContentEnvelope<ChapterAudio> {
        let resolved = self.audio.fetch(request).await;
        fresh(resolved, false)
    }

    pub async fn cache_status(&self) -> Vec<CacheStatus> {
        let now = Utc::now().timestamp_millis();
        vec![
            describe(&self.photo_cache, now).await,
            describe(&self.devotional_cache, now).await,
        ]
    }

    /// `Ok` with the cached envelope on a hit; on a miss, `Err` carrying the
    /// update-available signal for the fresh response.
    async fn check_cache<T>(
        &self,
        cache: &Cache<Resolved<T>>,
        force: bool,
    ) -> Result<ContentEnvelope<T>, bool>
    where
        T: Serialize + serde::de::DeserializeOwned,
    {
        let lookup = cache.lookup().await;
        let update_available = lookup.update_available();

        match lookup {
            CacheLookup::Hit(record) if !force => {
                tracing::debug!(namespace = cache.content_type().namespace(), "cache hit");
                Ok(ContentEnvelope {
                    content: record.payload.content,
                    source: record.payload.source,
                    cached: true,
                    update_available: false,
                })
            }
            CacheLookup::Hit(_) => Err(false),
            CacheLookup::Miss { state } => {
                tracing::debug!(namespace = cache.content_type().namespace(), ?state, "cache miss");
                Err(update_available)
            }
        }
    }
}

fn fresh<T>(resolved: Resolved<T>, update_available: bool) -> ContentEnvelope<T> {
    ContentEnvelope {
        content: resolved.content,
        source: resolved.source,
        cached: false,
        update_available,
    }
}

async fn describe<T>(cache: &Cache<T>, now_ms: i64) -> CacheStatus
where
    T: Serialize + serde::de::DeserializeOwned,
{
    let record = cache.read().await;
    let state = cache.state_of(record.as_ref(), now_ms);
    CacheStatus {
        content_type: cache.content_type(),
        state,
        stored_at: record
            .as_ref()
            .and_then(|r| chrono::DateTime::from_timestamp_millis(r.timestamp))
            .map(|t| t.to_rfc3339()),
        stored_version: record.map(|r| r.version),
    }
}
