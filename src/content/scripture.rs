//! Scripture fetcher: verse API first, bundled fallback verses last.

use serde::Deserialize;

use super::chain::{ContentSource, FallbackChain, GuaranteedChain, Resolved, SourceFuture, TerminalSource};
use super::http::{UpstreamClient, API_KEY_HEADER};
use super::text::{clean_verse_html, parse_verse_query, VerseQuery};
use crate::config::Config;
use crate::data::{book_id, random_fallback_verse, random_reference};
use crate::errors::AppError;
use crate::models::{ScriptureResolution, VerseReference};

pub const API_BIBLE_SOURCE: &str = "api.bible";
pub const FALLBACK_VERSES_SOURCE: &str = "fallback-verses";

/// What to look up: an already chosen reference in one translation.
#[derive(Debug, Clone)]
pub struct ScriptureRequest {
    pub reference: VerseReference,
    pub translation_id: String,
}

#[derive(Debug, Deserialize)]
struct VerseEnvelope {
    data: VerseData,
}

#[derive(Debug, Deserialize)]
struct VerseData {
    content: String,
    reference: String,
}

/// `GET {base}/{translation}/verses/{BOOK.C.V}` with the `api-key` header.
pub struct ApiBibleVerseSource {
    client: UpstreamClient,
    base_url: String,
    api_key: Option<String>,
}

impl ApiBibleVerseSource {
    pub fn new(client: UpstreamClient, config: &Config) -> Self {
        Self {
            client,
            base_url: config.bible_api_url.trim_end_matches('/').to_string(),
            api_key: config.bible_api_key.clone(),
        }
    }
}

impl ContentSource<ScriptureRequest, ScriptureResolution> for ApiBibleVerseSource {
    fn id(&self) -> &str {
        API_BIBLE_SOURCE
    }

    fn fetch<'a>(&'a self, request: &'a ScriptureRequest) -> SourceFuture<'a, ScriptureResolution> {
        Box::pin(async move {
            let key = self
                .api_key
                .as_deref()
                .ok_or_else(|| AppError::Config("TABSPIRE_BIBLE_API_KEY is not set".to_string()))?;

            let url = format!(
                "{}/{}/verses/{}",
                self.base_url,
                request.translation_id,
                request.reference.api_id()
            );
            let envelope: VerseEnvelope = self.client.get_json(&url, &[(API_KEY_HEADER, key)]).await?;

            let text = clean_verse_html(&envelope.data.content);
            if text.is_empty() {
                return Err(AppError::Malformed(format!("Empty verse content from {}", url)));
            }

            Ok(ScriptureResolution {
                scripture: crate::models::Scripture {
                    text,
                    reference: envelope.data.reference,
                },
                reference: Some(request.reference.clone()),
            })
        })
    }
}

/// Uniform pick from the bundled fallback verses. Cannot resolve by
/// reference, so it never reports one.
pub struct FallbackVersePool;

impl TerminalSource<ScriptureRequest, ScriptureResolution> for FallbackVersePool {
    fn id(&self) -> &str {
        FALLBACK_VERSES_SOURCE
    }

    fn pick(&self, _request: &ScriptureRequest) -> ScriptureResolution {
        ScriptureResolution {
            scripture: random_fallback_verse().to_scripture(),
            reference: None,
        }
    }
}

pub struct ScriptureFetcher {
    chain: GuaranteedChain<ScriptureRequest, ScriptureResolution>,
}

impl ScriptureFetcher {
    pub fn new(client: UpstreamClient, config: &Config) -> Self {
        let remote = FallbackChain::new("scripture").with_source(ApiBibleVerseSource::new(client, config));
        Self {
            chain: GuaranteedChain::new(remote, FallbackVersePool),
        }
    }

    /// Resolve `reference`, or a random curated verse when none is given.
    pub async fn fetch(
        &self,
        reference: Option<VerseReference>,
        translation_id: &str,
    ) -> Resolved<ScriptureResolution> {
        let request = ScriptureRequest {
            reference: reference.unwrap_or_else(random_reference),
            translation_id: translation_id.to_string(),
        };
        self.chain.resolve(&request).await
    }
}

/// Turn a typed query into a reference, resolving the book name if known.
pub fn reference_from_query(query: &VerseQuery) -> VerseReference {
    let book = book_id(&query.book)
        .map(String::from)
        .unwrap_or_else(|| query.book.to_uppercase());
    VerseReference::new(book, query.chapter, query.verse)
}

/// Reference for a display string such as `Psalm 23:1-3` (range start).
pub fn reference_from_display(display: &str) -> Option<VerseReference> {
    let start = display.split('-').next()?;
    let query = parse_verse_query(start)?;
    book_id(&query.book).map(|book| VerseReference::new(book, query.chapter, query.verse))
}
