//! Integration tests for the Tabspire backend.
//!
//! Every test runs the real router against a fake upstream server that
//! stands in for the scripture, photo, audio and relay services.

use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::content::{FallbackChain, Resolved, UnsplashSource, UpstreamClient};
use crate::data::{FALLBACK_IMAGES, FALLBACK_VERSES};
use crate::db::{Repository, StoredRecord};
use crate::models::{BackgroundPhoto, ContentType};
use crate::{create_router, AppState};

const TEST_PSK: &str = "test-api-key";
const TEST_BIBLE_KEY: &str = "bible-key";
const TEST_UNSPLASH_KEY: &str = "unsplash-key";
const TEST_PEXELS_KEY: &str = "pexels-key";
const APP_VERSION: &str = "2.0.0";
const FEED_URL: &str = "https://feed.test/feed/";
const ARTICLE_URL: &str = "https://feed.test/morning-strength/";

/// Knobs and counters of the fake upstream.
#[derive(Default)]
struct Upstream {
    scripture_fails: AtomicBool,
    unsplash_fails: AtomicBool,
    pexels_fails: AtomicBool,
    /// Photo providers accept the request and never answer in time.
    photos_stall: AtomicBool,
    /// Relays fail in order: 1 = first relay down, 2 = both down.
    failing_relays: AtomicUsize,
    audio_delay_ms: AtomicU64,
    unsplash_hits: AtomicUsize,
    feed_hits: AtomicUsize,
    article_hits: AtomicUsize,
}

fn has_header(headers: &HeaderMap, name: &str, value: &str) -> bool {
    headers.get(name).and_then(|v| v.to_str().ok()) == Some(value)
}

async fn fake_verse(
    State(up): State<Arc<Upstream>>,
    Path((translation, verse_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if up.scripture_fails.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if !has_header(&headers, "api-key", TEST_BIBLE_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "data": {
            "id": verse_id,
            "content": format!("<p class=\"p\"><span class=\"v\">16</span>Verse {} from {}</p>", verse_id, translation),
            "reference": "John 3:16"
        }
    }))
    .into_response()
}

async fn fake_search(
    State(up): State<Arc<Upstream>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if up.scripture_fails.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    let query = params.get("query").cloned().unwrap_or_default();
    Json(json!({
        "data": {
            "query": query,
            "verses": [
                { "id": "JHN.3.16", "text": "For God so loved the world", "reference": "John 3:16" },
                { "id": "1JN.4.8", "text": "God is love", "reference": "1 John 4:8" }
            ]
        }
    }))
    .into_response()
}

async fn fake_audio(
    State(up): State<Arc<Upstream>>,
    Path((_translation, chapter)): Path<(String, String)>,
) -> Response {
    let delay = up.audio_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    Json(json!({
        "data": { "audioFiles": [{ "url": format!("https://cdn.test/{}.mp3", chapter) }] }
    }))
    .into_response()
}

async fn stall(up: &Upstream) {
    if up.photos_stall.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
}

async fn fake_unsplash(
    State(up): State<Arc<Upstream>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    up.unsplash_hits.fetch_add(1, Ordering::SeqCst);
    stall(&up).await;
    if up.unsplash_fails.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let expected_auth = format!("Client-ID {}", TEST_UNSPLASH_KEY);
    if !has_header(&headers, "authorization", &expected_auth)
        || params.contains_key("client_id")
        || params.get("orientation").map(String::as_str) != Some("landscape")
    {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "urls": { "regular": "https://images.test/unsplash.jpg" },
        "user": { "name": "Ana Lens", "links": { "html": "https://unsplash.test/@ana" } }
    }))
    .into_response()
}

async fn fake_pexels(State(up): State<Arc<Upstream>>, headers: HeaderMap) -> Response {
    stall(&up).await;
    if up.pexels_fails.load(Ordering::SeqCst) {
        return StatusCode::BAD_GATEWAY.into_response();
    }
    if !has_header(&headers, "authorization", TEST_PEXELS_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "photos": [{
            "src": { "large": "https://px.test/large.jpg", "landscape": "https://px.test/wide.jpg" },
            "photographer": "Ben Frame",
            "photographer_url": "https://pexels.test/@ben"
        }]
    }))
    .into_response()
}

fn feed_xml() -> String {
    let excerpt = "Wait on the Lord and be renewed. ".repeat(15);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
  <title>Triumph 30</title>
  <item>
    <title>Morning Strength</title>
    <link>{}</link>
    <pubDate>Tue, 07 Jan 2025 05:00:00 +0000</pubDate>
    <description><![CDATA[<p>{}</p>]]></description>
  </item>
</channel>
</rss>"#,
        ARTICLE_URL, excerpt
    )
}

fn article_html() -> String {
    format!(
        r#"<html><head><title>Morning Strength</title></head><body>
<nav>Home About Contact</nav>
<article>
  <h1>Morning Strength</h1>
  <p>Isaiah 40:31 promises new strength to those who wait.</p>
  <p>{}</p>
  <p>Bible Reading Plan: Isaiah 40; Psalm 23</p>
  <p>Tags: hope, strength</p>
</article>
<section>Leave a Reply</section>
</body></html>"#,
        "They will soar on wings like eagles. ".repeat(40)
    )
}

async fn relay(up: &Upstream, position: usize, params: &HashMap<String, String>) -> Response {
    if up.failing_relays.load(Ordering::SeqCst) >= position {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    match params.get("url").map(String::as_str) {
        Some(FEED_URL) => {
            up.feed_hits.fetch_add(1, Ordering::SeqCst);
            ([("content-type", "application/rss+xml")], feed_xml()).into_response()
        }
        Some(ARTICLE_URL) => {
            up.article_hits.fetch_add(1, Ordering::SeqCst);
            ([("content-type", "text/html")], article_html()).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn relay_a(State(up): State<Arc<Upstream>>, Query(params): Query<HashMap<String, String>>) -> Response {
    relay(&up, 1, &params).await
}

async fn relay_b(State(up): State<Arc<Upstream>>, Query(params): Query<HashMap<String, String>>) -> Response {
    relay(&up, 2, &params).await
}

fn fake_upstream(up: Arc<Upstream>) -> Router {
    Router::new()
        .route("/bibles/{translation}/verses/{verse}", get(fake_verse))
        .route("/bibles/{translation}/search", get(fake_search))
        .route("/audio/{translation}/chapters/{chapter}/audio", get(fake_audio))
        .route("/unsplash", get(fake_unsplash))
        .route("/pexels", get(fake_pexels))
        .route("/relay-a", get(relay_a))
        .route("/relay-b", get(relay_b))
        .with_state(up)
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn test_config(upstream: &str, dir: &FsPath, psk: Option<&str>) -> Config {
    Config {
        api_psk: psk.map(String::from),
        db_path: dir.join("test.sqlite"),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        app_version: APP_VERSION.to_string(),
        cache_ttl: Duration::from_secs(12 * 60 * 60),
        bible_api_key: Some(TEST_BIBLE_KEY.to_string()),
        bible_api_url: format!("{}/bibles", upstream),
        audio_api_url: format!("{}/audio", upstream),
        audio_timeout: Duration::from_millis(300),
        upstream_timeout: Duration::from_millis(800),
        unsplash_access_key: Some(TEST_UNSPLASH_KEY.to_string()),
        unsplash_url: format!("{}/unsplash", upstream),
        pexels_api_key: Some(TEST_PEXELS_KEY.to_string()),
        pexels_url: format!("{}/pexels", upstream),
        feed_url: FEED_URL.to_string(),
        cors_proxies: vec![
            format!("{}/relay-a?url=", upstream),
            format!("{}/relay-b?url=", upstream),
        ],
        product_name: "Tabspire".to_string(),
        product_url: "https://tabspire.test".to_string(),
    }
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    upstream: Arc<Upstream>,
    upstream_url: String,
    repo: Arc<Repository>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some(TEST_PSK)).await
    }

    async fn with_psk(psk: Option<&str>) -> Self {
        let upstream = Arc::new(Upstream::default());
        let upstream_url = serve(fake_upstream(upstream.clone())).await;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = test_config(&upstream_url, temp_dir.path(), psk);
        let state = AppState::build(config).await.expect("Failed to build state");
        let repo = state.repo.clone();
        let base_url = serve(create_router(state)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            upstream,
            upstream_url,
            repo,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.post(self.url(path)).send().await.unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self.client.put(self.url(path)).json(&body).send().await.unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.delete(self.url(path)).send().await.unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.json().await.unwrap())
    }
}

// ---------------------------------------------------------------------------
// Health and auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = Client::new().get(fixture.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    let resp = Client::new().get(fixture.url("/api/status")).send().await.unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["appVersion"], APP_VERSION);
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/status"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_auth_bearer_token() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/status"))
        .bearer_auth(TEST_PSK)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_no_psk_means_open_api() {
    let fixture = TestFixture::with_psk(None).await;

    let (status, body) = fixture.get("/api/languages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 25);
}

// ---------------------------------------------------------------------------
// Scripture
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_scripture_explicit_reference() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .get("/api/scripture?book=John&chapter=3&verse=16&language=en")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["appVersion"], APP_VERSION);

    let data = &body["data"];
    assert_eq!(data["source"], "api.bible");
    assert_eq!(data["cached"], false);
    assert_eq!(data["content"]["reference"], "John 3:16");
    assert!(data["content"]["text"]
        .as_str()
        .unwrap()
        .starts_with("Verse JHN.3.16 from"));
    assert_eq!(
        data["resolvedReference"],
        json!({ "book": "JHN", "chapter": 3, "verse": 16 })
    );
}

#[tokio::test]
async fn test_scripture_api_failure_serves_fallback_verse() {
    let fixture = TestFixture::new().await;
    fixture.upstream.scripture_fails.store(true, Ordering::SeqCst);

    let (status, body) = fixture
        .get("/api/scripture?book=JHN&chapter=3&verse=16")
        .await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["source"], "fallback-verses");
    assert!(data["resolvedReference"].is_null());

    let text = data["content"]["text"].as_str().unwrap();
    let reference = data["content"]["reference"].as_str().unwrap();
    assert!(FALLBACK_VERSES
        .iter()
        .any(|v| v.text == text && v.reference == reference));
}

#[tokio::test]
async fn test_scripture_random_reference_when_none_given() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/scripture").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "api.bible");
    assert!(body["data"]["resolvedReference"]["book"].is_string());
}

#[tokio::test]
async fn test_scripture_partial_reference_is_rejected() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/scripture?book=John&chapter=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = fixture.get("/api/scripture?language=tlh").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scripture_rejects_unsafe_translation_id() {
    let fixture = TestFixture::new().await;

    for path in [
        "/api/scripture?translation=..%2F..%2Fadmin%2Fdelete%3Fx%3D",
        "/api/scripture/search?q=love&translation=a%2Fb",
        "/api/scripture/audio?book=JHN&chapter=3&translation=x%3Fy",
    ] {
        let (status, body) = fixture.get(path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let (status, body) = fixture
        .get("/api/scripture?book=JHN&chapter=3&verse=16&translation=592420522e16049f-01")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["translationId"], "592420522e16049f-01");
}

#[tokio::test]
async fn test_scripture_uses_stored_language() {
    let fixture = TestFixture::new().await;

    let (status, _) = fixture.put("/api/preferences", json!({ "language": "es" })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = fixture.get("/api/scripture?book=JHN&chapter=3&verse=16").await;
    assert_eq!(body["data"]["translationId"], crate::data::translation_for("es"));
}

// ---------------------------------------------------------------------------
// Verse search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_search_reference_short_circuits() {
    let fixture = TestFixture::new().await;
    fixture.upstream.scripture_fails.store(true, Ordering::SeqCst);

    let (status, body) = fixture.get("/api/scripture/search?q=jn%203%3A16").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["origin"], "reference");
    assert_eq!(data["results"][0]["reference"], "John 3:16");
    assert_eq!(data["results"][0]["target"]["book"], "JHN");
}

#[tokio::test]
async fn test_search_remote_keywords() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/scripture/search?q=love&limit=1").await;
    let data = &body["data"];
    assert_eq!(data["origin"], "remote");
    assert_eq!(data["total"], 1);
    assert_eq!(data["results"][0]["target"]["verse"], 16);
}

#[tokio::test]
async fn test_search_falls_back_to_local_index() {
    let fixture = TestFixture::new().await;
    fixture.upstream.scripture_fails.store(true, Ordering::SeqCst);

    let (status, body) = fixture.get("/api/scripture/search?q=shepherd").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["origin"], "local");
    assert_eq!(data["source"], "local-index");
    assert!(data["results"][0]["reference"]
        .as_str()
        .unwrap()
        .starts_with("Psalm 23"));
}

#[tokio::test]
async fn test_search_rejects_empty_query() {
    let fixture = TestFixture::new().await;
    let (status, _) = fixture.get("/api/scripture/search?q=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Chapter audio
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_audio_recorded() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/scripture/audio?book=John&chapter=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "audio-bible");
    assert_eq!(
        body["data"]["content"],
        json!({ "kind": "recorded", "url": "https://cdn.test/JHN.3.mp3" })
    );
}

#[tokio::test]
async fn test_audio_timeout_degrades_to_speech_synthesis() {
    let fixture = TestFixture::new().await;
    fixture.upstream.audio_delay_ms.store(2_000, Ordering::SeqCst);
    fixture.put("/api/preferences", json!({ "voice": "Samantha" })).await;

    let started = std::time::Instant::now();
    let (status, body) = fixture.get("/api/scripture/audio?book=JHN&chapter=3").await;
    assert!(started.elapsed() < Duration::from_millis(1_500));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "speech-synthesis");
    assert_eq!(
        body["data"]["content"],
        json!({ "kind": "speechSynthesis", "voice": "Samantha" })
    );
}

// ---------------------------------------------------------------------------
// Background photo
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_photo_primary_source_then_cache_hit() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/photo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "unsplash");
    assert_eq!(body["data"]["cached"], false);
    assert_eq!(body["data"]["content"]["attributionName"], "Ana Lens");

    let (_, body) = fixture.get("/api/photo").await;
    assert_eq!(body["data"]["cached"], true);
    assert_eq!(body["data"]["source"], "unsplash");
    assert_eq!(fixture.upstream.unsplash_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_photo_refresh_bypasses_cache() {
    let fixture = TestFixture::new().await;

    fixture.get("/api/photo").await;
    let (_, body) = fixture.post("/api/photo/refresh").await;
    assert_eq!(body["data"]["cached"], false);
    assert_eq!(fixture.upstream.unsplash_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_photo_secondary_source() {
    let fixture = TestFixture::new().await;
    fixture.upstream.unsplash_fails.store(true, Ordering::SeqCst);

    let (_, body) = fixture.get("/api/photo").await;
    assert_eq!(body["data"]["source"], "pexels");
    assert_eq!(body["data"]["content"]["imageUrl"], "https://px.test/wide.jpg");
    assert_eq!(body["data"]["content"]["attributionName"], "Ben Frame");
}

#[tokio::test]
async fn test_photo_all_remote_sources_fail() {
    let fixture = TestFixture::new().await;
    fixture.upstream.unsplash_fails.store(true, Ordering::SeqCst);
    fixture.upstream.pexels_fails.store(true, Ordering::SeqCst);

    let (status, body) = fixture.get("/api/photo").await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["source"], "local-images");
    assert!(FALLBACK_IMAGES.contains(&data["content"]["imageUrl"].as_str().unwrap()));
    assert_eq!(data["content"]["attributionName"], "Tabspire");
    assert_eq!(data["content"]["attributionUrl"], "https://tabspire.test");
}

#[tokio::test]
async fn test_photo_stalled_providers_fall_through_to_local_pool() {
    let fixture = TestFixture::new().await;
    fixture.upstream.photos_stall.store(true, Ordering::SeqCst);

    let started = std::time::Instant::now();
    let (status, body) = fixture.get("/api/photo").await;
    assert!(started.elapsed() < Duration::from_secs(10));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "local-images");
    assert_eq!(body["data"]["content"]["attributionName"], "Tabspire");
}

#[tokio::test]
async fn test_unsplash_key_stays_out_of_errors() {
    let fixture = TestFixture::new().await;
    fixture.upstream.unsplash_fails.store(true, Ordering::SeqCst);

    let config = test_config(&fixture.upstream_url, fixture._temp_dir.path(), None);
    let client = UpstreamClient::new(config.upstream_timeout).unwrap();
    let chain = FallbackChain::new("photo").with_source(UnsplashSource::new(client, &config));

    let err = chain.try_resolve(&()).await.unwrap_err();
    let text = err.to_string();
    assert!(text.contains("500"), "{}", text);
    assert!(!text.contains(TEST_UNSPLASH_KEY), "{}", text);
    assert!(!text.contains("client_id"), "{}", text);
}

#[tokio::test]
async fn test_photo_version_mismatch_refetches_and_signals_update() {
    let fixture = TestFixture::new().await;

    let stale = Resolved {
        content: BackgroundPhoto {
            image_url: "https://images.test/old.jpg".to_string(),
            attribution_name: "Old".to_string(),
            attribution_url: "https://old.test".to_string(),
        },
        source: "unsplash".to_string(),
    };
    fixture
        .repo
        .put_cache_record(
            ContentType::Photo.namespace(),
            &StoredRecord {
                payload: serde_json::to_string(&stale).unwrap(),
                timestamp: chrono::Utc::now().timestamp_millis(),
                version: "1.9.0".to_string(),
            },
        )
        .await
        .unwrap();

    let (_, status) = fixture.get("/api/status").await;
    assert_eq!(status["data"]["updateAvailable"], true);
    assert_eq!(status["data"]["caches"][0]["state"], "versionMismatch");

    let (_, body) = fixture.get("/api/photo").await;
    assert_eq!(body["data"]["cached"], false);
    assert_eq!(body["data"]["updateAvailable"], true);
    assert_eq!(body["data"]["content"]["imageUrl"], "https://images.test/unsplash.jpg");

    let (_, body) = fixture.get("/api/photo").await;
    assert_eq!(body["data"]["cached"], true);
    assert_eq!(body["data"]["updateAvailable"], false);
}

#[tokio::test]
async fn test_photo_expired_record_is_refetched() {
    let fixture = TestFixture::new().await;

    fixture
        .repo
        .put_cache_record(
            ContentType::Photo.namespace(),
            &StoredRecord {
                payload: "{\"content\":{\"imageUrl\":\"x\",\"attributionName\":\"y\",\"attributionUrl\":\"z\"},\"source\":\"pexels\"}"
                    .to_string(),
                timestamp: chrono::Utc::now().timestamp_millis() - 13 * 60 * 60 * 1000,
                version: APP_VERSION.to_string(),
            },
        )
        .await
        .unwrap();

    let (_, body) = fixture.get("/api/photo").await;
    assert_eq!(body["data"]["cached"], false);
    assert_eq!(body["data"]["updateAvailable"], false);
    assert_eq!(body["data"]["source"], "unsplash");
}

#[tokio::test]
async fn test_photo_corrupt_cache_is_a_miss() {
    let fixture = TestFixture::new().await;

    fixture
        .repo
        .put_cache_record(
            ContentType::Photo.namespace(),
            &StoredRecord {
                payload: "not json at all".to_string(),
                timestamp: chrono::Utc::now().timestamp_millis(),
                version: APP_VERSION.to_string(),
            },
        )
        .await
        .unwrap();

    let (status, body) = fixture.get("/api/photo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cached"], false);
}

#[tokio::test]
async fn test_background_reset_clears_photo_cache() {
    let fixture = TestFixture::new().await;

    fixture.get("/api/photo").await;
    let (status, body) = fixture.delete("/api/photo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cleared"], true);

    let (_, body) = fixture.get("/api/photo").await;
    assert_eq!(body["data"]["cached"], false);
    assert_eq!(fixture.upstream.unsplash_hits.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// Devotional
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_devotional_short_feed_fetches_full_article() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/devotional").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(fixture.upstream.article_hits.load(Ordering::SeqCst), 1);

    let data = &body["data"];
    assert_eq!(data["source"], format!("{}/relay-a?url=", fixture.upstream_url));
    assert_eq!(data["cached"], false);

    let devotional = &data["content"]["devotional"];
    assert_eq!(devotional["title"], "Morning Strength");
    assert_eq!(devotional["reference"], "Isaiah 40:31");
    assert_eq!(devotional["readingPlan"], "Bible Reading Plan: Isaiah 40; Psalm 23");
    assert_eq!(devotional["date"], "Tuesday, January 7, 2025");
    assert_eq!(devotional["url"], ARTICLE_URL);

    let content = devotional["content"].as_str().unwrap();
    assert!(content.starts_with("Morning Strength Isaiah 40:31 promises"));
    assert!(!content.contains("Tags:"));
    assert!(!content.contains("Home About"));

    let passages = data["content"]["passages"].as_array().unwrap();
    assert_eq!(passages.len(), 2);
    assert_eq!(passages[1]["passage"], "Psalm 23");
    assert_eq!(data["content"]["hasMore"], true);
}

#[tokio::test]
async fn test_devotional_is_cached() {
    let fixture = TestFixture::new().await;

    fixture.get("/api/devotional").await;
    let (_, body) = fixture.get("/api/devotional").await;
    assert_eq!(body["data"]["cached"], true);
    assert_eq!(fixture.upstream.feed_hits.load(Ordering::SeqCst), 1);

    fixture.post("/api/devotional/refresh").await;
    assert_eq!(fixture.upstream.feed_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_devotional_second_relay() {
    let fixture = TestFixture::new().await;
    fixture.upstream.failing_relays.store(1, Ordering::SeqCst);

    let (status, body) = fixture.get("/api/devotional").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], format!("{}/relay-b?url=", fixture.upstream_url));
}

#[tokio::test]
async fn test_devotional_relays_exhausted() {
    let fixture = TestFixture::new().await;
    fixture.upstream.failing_relays.store(2, Ordering::SeqCst);

    let (status, body) = fixture.get("/api/devotional").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "DEVOTIONAL_UNAVAILABLE");
    assert_eq!(fixture.upstream.feed_hits.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Preferences, links and status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_preferences_defaults_and_update() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/preferences").await;
    assert_eq!(body["data"]["language"], "en");
    assert_eq!(body["data"]["fontStyle"], "serif");
    assert_eq!(body["data"]["theme"], "full");
    assert_eq!(body["data"]["showDateTime"], true);

    let (status, body) = fixture
        .put(
            "/api/preferences",
            json!({
                "fontStyle": "cursive",
                "theme": "minimal",
                "background": { "type": "color", "value": "#1a1a1a" },
                "showDateTime": false
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fontStyle"], "cursive");
    assert_eq!(body["data"]["background"], json!({ "type": "color", "value": "#1a1a1a" }));

    let (_, body) = fixture.get("/api/preferences").await;
    assert_eq!(body["data"]["theme"], "minimal");
    assert_eq!(body["data"]["showDateTime"], false);
    assert_eq!(body["data"]["language"], "en");
}

#[tokio::test]
async fn test_preferences_validation() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.put("/api/preferences", json!({ "theme": "neon" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, body) = fixture.get("/api/preferences").await;
    assert_eq!(body["data"]["theme"], "full");
}

#[tokio::test]
async fn test_preferences_background_reset_clears_photo() {
    let fixture = TestFixture::new().await;

    fixture.get("/api/photo").await;
    fixture
        .put(
            "/api/preferences",
            json!({ "background": { "type": "image", "value": "/images/2.jpg" } }),
        )
        .await;
    let (_, body) = fixture
        .put("/api/preferences", json!({ "background": { "type": "" } }))
        .await;
    assert_eq!(body["data"]["background"], json!({ "type": "", "value": "" }));

    let (_, body) = fixture.get("/api/photo").await;
    assert_eq!(body["data"]["cached"], false);
}

#[tokio::test]
async fn test_builtin_backgrounds() {
    let fixture = TestFixture::new().await;
    let (_, body) = fixture.get("/api/preferences/backgrounds").await;
    let backgrounds = body["data"].as_array().unwrap();
    assert!(backgrounds.iter().any(|b| b["type"] == "gradient"));
}

#[tokio::test]
async fn test_links() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/links?reference=John%203%3A16").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["bibleGatewayUrl"],
        "https://www.biblegateway.com/passage/?search=John%203%3A16&version=NIV"
    );
    assert_eq!(body["data"]["youversionUrl"], "https://www.youversion.com/bible/1/john.3");
}

#[tokio::test]
async fn test_status_reports_cache_state() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/status").await;
    assert_eq!(body["data"]["appVersion"], APP_VERSION);
    assert_eq!(body["data"]["cacheTtlSeconds"], 12 * 60 * 60);
    assert_eq!(body["data"]["caches"][0]["state"], "missing");
    assert_eq!(body["data"]["updateAvailable"], false);

    fixture.get("/api/photo").await;
    let (_, body) = fixture.get("/api/status").await;
    assert_eq!(body["data"]["caches"][0]["contentType"], "photo");
    assert_eq!(body["data"]["caches"][0]["state"], "fresh");
    assert_eq!(body["data"]["caches"][0]["storedVersion"], APP_VERSION);
    assert_eq!(body["data"]["caches"][1]["state"], "missing");
}
