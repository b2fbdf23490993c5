//! Cache record model and validity rules.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Content types that own a cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    Photo,
    Devotional,
}

impl ContentType {
    pub fn namespace(&self) -> &'static str {
        match self {
            ContentType::Photo => "photo_cache",
            ContentType::Devotional => "devotional_cache",
        }
    }
}

/// Persisted payload with the time it was written and the app version that wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord<T> {
    pub payload: T,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub version: String,
}

/// Why a record can or cannot be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheState {
    Missing,
    Fresh,
    Expired,
    VersionMismatch,
}

impl<T> CacheRecord<T> {
    pub fn state(&self, now_ms: i64, ttl: Duration, version: &str) -> CacheState {
        let age = now_ms.saturating_sub(self.timestamp);
        if self.version != version {
            CacheState::VersionMismatch
        } else if age < 0 || age as u128 >= ttl.as_millis() {
            CacheState::Expired
        } else {
            CacheState::Fresh
        }
    }

    /// A record is servable only if younger than `ttl` and written by `version`.
    pub fn is_valid(&self, now_ms: i64, ttl: Duration, version: &str) -> bool {
        self.state(now_ms, ttl, version) == CacheState::Fresh
    }
}
