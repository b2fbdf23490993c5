//! Configuration module for the Tabspire backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! API keys never live in module-level state; they travel inside [`Config`].

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_BIBLE_API_URL: &str = "https://api.scripture.api.bible/v1/bibles";
pub const DEFAULT_AUDIO_API_URL: &str = "https://api.scripture.api.bible/v1/audio-bibles";
pub const DEFAULT_UNSPLASH_URL: &str = "https://api.unsplash.com/photos/random";
pub const DEFAULT_PEXELS_URL: &str = "https://api.pexels.com/v1/search";
pub const DEFAULT_FEED_URL: &str = "https://t30.org/feed/";

/// Relays tried in order for the devotional feed and article pages.
pub const DEFAULT_CORS_PROXIES: [&str; 3] = [
    "https://api.allorigins.win/raw?url=",
    "https://cors-anywhere.herokuapp.com/",
    "https://thingproxy.freeboard.io/fetch/",
];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Version stamped into every cache record
    pub app_version: String,
    /// Single TTL applied to every cached content type
    pub cache_ttl: Duration,
    pub bible_api_key: Option<String>,
    pub bible_api_url: String,
    pub audio_api_url: String,
    /// Budget for chapter-audio lookups
    pub audio_timeout: Duration,
    /// Per-request bound on every other upstream call
    pub upstream_timeout: Duration,
    pub unsplash_access_key: Option<String>,
    pub unsplash_url: String,
    pub pexels_api_key: Option<String>,
    pub pexels_url: String,
    pub feed_url: String,
    pub cors_proxies: Vec<String>,
    /// Attribution shown for bundled background images
    pub product_name: String,
    pub product_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("TABSPIRE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid TABSPIRE_BIND_ADDR: {}", e)))?;

        let ttl_hours: u64 = parse_var("TABSPIRE_CACHE_TTL_HOURS", 12)?;
        let audio_timeout_ms: u64 = parse_var("TABSPIRE_AUDIO_TIMEOUT_MS", 3000)?;
        let upstream_timeout_ms: u64 = parse_var("TABSPIRE_UPSTREAM_TIMEOUT_MS", 10_000)?;

        let cors_proxies = match env::var("TABSPIRE_CORS_PROXIES") {
            Ok(list) => list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => DEFAULT_CORS_PROXIES.iter().map(|p| p.to_string()).collect(),
        };

        Ok(Self {
            api_psk: optional_var("TABSPIRE_API_PSK"),
            db_path: env::var("TABSPIRE_DB_PATH")
                .unwrap_or_else(|_| "./data/tabspire.sqlite".to_string())
                .into(),
            bind_addr,
            log_level: env::var("TABSPIRE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            app_version: env::var("TABSPIRE_APP_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            cache_ttl: Duration::from_secs(ttl_hours * 60 * 60),
            bible_api_key: optional_var("TABSPIRE_BIBLE_API_KEY"),
            bible_api_url: env::var("TABSPIRE_BIBLE_API_URL")
                .unwrap_or_else(|_| DEFAULT_BIBLE_API_URL.to_string()),
            audio_api_url: env::var("TABSPIRE_AUDIO_API_URL")
                .unwrap_or_else(|_| DEFAULT_AUDIO_API_URL.to_string()),
            audio_timeout: Duration::from_millis(audio_timeout_ms),
            upstream_timeout: Duration::from_millis(upstream_timeout_ms),
            unsplash_access_key: optional_var("TABSPIRE_UNSPLASH_ACCESS_KEY"),
            unsplash_url: env::var("TABSPIRE_UNSPLASH_URL")
                .unwrap_or_else(|_| DEFAULT_UNSPLASH_URL.to_string()),
            pexels_api_key: optional_var("TABSPIRE_PEXELS_API_KEY"),
            pexels_url: env::var("TABSPIRE_PEXELS_URL")
                .unwrap_or_else(|_| DEFAULT_PEXELS_URL.to_string()),
            feed_url: env::var("TABSPIRE_FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string()),
            cors_proxies,
            product_name: env::var("TABSPIRE_PRODUCT_NAME")
                .unwrap_or_else(|_| "Tabspire".to_string()),
            product_url: env::var("TABSPIRE_PRODUCT_URL")
                .unwrap_or_else(|_| "https://tabspire.app".to_string()),
        })
    }
}

/// Treats empty values the same as unset ones.
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var(name: &str, default: u64) -> Result<u64, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
