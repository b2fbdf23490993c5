//! Tabspire Backend
//!
//! Local content backend for the new-tab extension: scripture, devotionals
//! and background photos resolved through fallback chains, cached in SQLite.

mod api;
mod auth;
mod cache;
mod config;
mod content;
mod data;
mod db;
mod errors;
mod models;
mod search;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::AuthSettings;
use config::Config;
use content::ContentService;
use data::FALLBACK_VERSES;
use db::Repository;
use search::VerseIndex;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub content: Arc<ContentService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire repository, verse index and content service for `config`.
    pub async fn build(config: Config) -> Result<Self, errors::AppError> {
        let pool = db::init_database(&config.db_path).await?;
        let repo = Arc::new(Repository::new(pool));

        let index = Arc::new(VerseIndex::with_verses(FALLBACK_VERSES)?);
        let content = Arc::new(ContentService::new(&config, repo.clone(), index)?);

        Ok(Self {
            repo,
            content,
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tabspire Backend {}", config.app_version);
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Cache TTL: {}h", config.cache_ttl.as_secs() / 3600);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (TABSPIRE_API_PSK). Authentication is disabled!");
    }
    if config.bible_api_key.is_none() {
        tracing::warn!("No scripture API key configured; serving bundled verses only");
    }
    if config.unsplash_access_key.is_none() && config.pexels_api_key.is_none() {
        tracing::warn!("No photo API keys configured; serving bundled images only");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::build(config).await?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // The extension calls from a chrome-extension:// origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_settings = Arc::new(AuthSettings {
        expected_psk: state.config.api_psk.clone(),
        app_version: state.config.app_version.clone(),
    });

    let api_routes = Router::new()
        // Scripture
        .route("/scripture", get(api::get_scripture))
        .route("/scripture/search", get(api::search_scripture))
        .route("/scripture/audio", get(api::get_chapter_audio))
        // Background photo
        .route(
            "/photo",
            get(api::get_photo).delete(api::reset_photo),
        )
        .route("/photo/refresh", post(api::refresh_photo))
        // Devotional
        .route("/devotional", get(api::get_devotional))
        .route("/devotional/refresh", post(api::refresh_devotional))
        // Preferences
        .route(
            "/preferences",
            get(api::get_preferences).put(api::update_preferences),
        )
        .route("/preferences/backgrounds", get(api::list_backgrounds))
        // Reference data and status
        .route("/links", get(api::get_links))
        .route("/languages", get(api::list_languages))
        .route("/status", get(api::get_status))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(auth_settings.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
