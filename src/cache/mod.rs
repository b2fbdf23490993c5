//! Per-content-type cache with TTL and version gating.
//!
//! Storage problems never reach callers: a failed or corrupt read is a miss,
//! a failed write is logged and dropped.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::{Repository, StoredRecord};
use crate::models::{CacheRecord, CacheState, ContentType};

/// Result of consulting the cache before a fetch.
#[derive(Debug, Clone)]
pub enum CacheLookup<T> {
    /// A valid record that can be served as is.
    Hit(CacheRecord<T>),
    /// Nothing servable; `state` says why.
    Miss { state: CacheState },
}

impl<T> CacheLookup<T> {
    /// True when the stored record was written by another app version.
    pub fn update_available(&self) -> bool {
        matches!(
            self,
            CacheLookup::Miss {
                state: CacheState::VersionMismatch
            }
        )
    }
}

/// Cache bound to one content type's namespace.
pub struct Cache<T> {
    repo: Arc<Repository>,
    content_type: ContentType,
    ttl: Duration,
    version: String,
    _payload: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Cache<T> {
    pub fn new(
        repo: Arc<Repository>,
        content_type: ContentType,
        ttl: Duration,
        version: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            content_type,
            ttl,
            version: version.into(),
            _payload: PhantomData,
        }
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Stored record, or `None` if absent, unreadable or not decodable.
    pub async fn read(&self) -> Option<CacheRecord<T>> {
        let namespace = self.content_type.namespace();
        let stored = match self.repo.get_cache_record(namespace).await {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!(namespace, "cache read failed, treating as miss: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&stored.payload) {
            Ok(payload) => Some(CacheRecord {
                payload,
                timestamp: stored.timestamp,
                version: stored.version,
            }),
            Err(e) => {
                tracing::warn!(namespace, "corrupt cache payload, treating as miss: {}", e);
                None
            }
        }
    }

    /// Overwrite the record with `payload` stamped now. Best effort.
    pub async fn write(&self, payload: &T) {
        self.write_at(payload, Utc::now().timestamp_millis()).await
    }

    pub(crate) async fn write_at(&self, payload: &T, timestamp: i64) {
        let namespace = self.content_type.namespace();
        let serialized = match serde_json::to_string(payload) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(namespace, "could not serialize cache payload: {}", e);
                return;
            }
        };

        let record = StoredRecord {
            payload: serialized,
            timestamp,
            version: self.version.clone(),
        };
        if let Err(e) = self.repo.put_cache_record(namespace, &record).await {
            tracing::warn!(namespace, "cache write dropped: {}", e);
        }
    }

    /// Remove the record (background reset). Returns whether one existed.
    pub async fn clear(&self) -> bool {
        let namespace = self.content_type.namespace();
        match self.repo.delete_cache_record(namespace).await {
            Ok(existed) => existed,
            Err(e) => {
                tracing::warn!(namespace, "cache clear failed: {}", e);
                false
            }
        }
    }

    pub fn is_valid(&self, record: Option<&CacheRecord<T>>, now_ms: i64) -> bool {
        record.is_some_and(|r| r.is_valid(now_ms, self.ttl, &self.version))
    }

    pub async fn lookup(&self) -> CacheLookup<T> {
        self.lookup_at(Utc::now().timestamp_millis()).await
    }

    pub(crate) async fn lookup_at(&self, now_ms: i64) -> CacheLookup<T> {
        match self.read().await {
            Some(record) if self.is_valid(Some(&record), now_ms) => CacheLookup::Hit(record),
            record => CacheLookup::Miss {
                state: self.state_of(record.as_ref(), now_ms),
            },
        }
    }

    pub fn state_of(&self, record: Option<&CacheRecord<T>>, now_ms: i64) -> CacheState {
        match record {
            None => CacheState::Missing,
            Some(r) => r.state(now_ms, self.ttl, &self.version),
        }
    }
}
