//! Verse search: typed references short-circuit, keywords go to the
//! scripture API and fall back to the local verse index.

use std::sync::Arc;

use serde::Deserialize;

use super::chain::{ContentSource, FallbackChain, GuaranteedChain, SourceFuture, TerminalSource};
use super::http::{UpstreamClient, API_KEY_HEADER};
use super::scripture::{reference_from_display, reference_from_query, API_BIBLE_SOURCE};
use super::text::{clean_verse_html, encode_uri_component, parse_verse_query};
use crate::config::Config;
use crate::data::book_name;
use crate::errors::AppError;
use crate::models::{SearchOrigin, VerseReference, VerseSearchHit};
use crate::search::VerseIndex;

pub const LOCAL_INDEX_SOURCE: &str = "local-index";

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const MAX_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub translation_id: String,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub hits: Vec<VerseSearchHit>,
    pub origin: SearchOrigin,
    pub source: String,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    data: SearchData,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    verses: Vec<SearchVerse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchVerse {
    #[serde(default)]
    id: String,
    text: String,
    reference: String,
}

impl SearchVerse {
    fn into_hit(self) -> VerseSearchHit {
        let target = parse_verse_id(&self.id).or_else(|| reference_from_display(&self.reference));
        VerseSearchHit {
            text: clean_verse_html(&self.text),
            reference: self.reference,
            target,
        }
    }
}

/// `JHN.3.16` -> reference; anything else -> `None`.
fn parse_verse_id(id: &str) -> Option<VerseReference> {
    let mut parts = id.split('.');
    let book = parts.next().filter(|b| !b.is_empty())?;
    let chapter = parts.next()?.parse().ok()?;
    let verse = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(VerseReference::new(book, chapter, verse))
}

/// `GET {base}/{translation}/search?query=...&limit=...`
pub struct ApiBibleSearchSource {
    client: UpstreamClient,
    base_url: String,
    api_key: Option<String>,
}

impl ContentSource<SearchRequest, Vec<VerseSearchHit>> for ApiBibleSearchSource {
    fn id(&self) -> &str {
        API_BIBLE_SOURCE
    }

    fn fetch<'a>(&'a self, request: &'a SearchRequest) -> SourceFuture<'a, Vec<VerseSearchHit>> {
        Box::pin(async move {
            let key = self
                .api_key
                .as_deref()
                .ok_or_else(|| AppError::Config("TABSPIRE_BIBLE_API_KEY is not set".to_string()))?;

            let url = format!(
                "{}/{}/search?query={}&limit={}",
                self.base_url,
                request.translation_id,
                encode_uri_component(&request.query),
                request.limit
            );
            let envelope: SearchEnvelope = self.client.get_json(&url, &[(API_KEY_HEADER, key)]).await?;

            Ok(envelope
                .data
                .verses
                .into_iter()
                .take(request.limit)
                .map(SearchVerse::into_hit)
                .collect())
        })
    }
}

/// Offline keyword search over the bundled verses. Index errors yield no hits.
pub struct LocalIndexSearch {
    index: Arc<VerseIndex>,
}

impl TerminalSource<SearchRequest, Vec<VerseSearchHit>> for LocalIndexSearch {
    fn id(&self) -> &str {
        LOCAL_INDEX_SOURCE
    }

    fn pick(&self, request: &SearchRequest) -> Vec<VerseSearchHit> {
        self.index
            .search(&request.query, request.limit)
            .unwrap_or_else(|e| {
                tracing::warn!("local verse search failed: {}", e);
                Vec::new()
            })
    }
}

pub struct VerseSearch {
    chain: GuaranteedChain<SearchRequest, Vec<VerseSearchHit>>,
}

impl VerseSearch {
    pub fn new(client: UpstreamClient, config: &Config, index: Arc<VerseIndex>) -> Self {
        let remote = FallbackChain::new("verse-search").with_source(ApiBibleSearchSource {
            client,
            base_url: config.bible_api_url.trim_end_matches('/').to_string(),
            api_key: config.bible_api_key.clone(),
        });
        Self {
            chain: GuaranteedChain::new(remote, LocalIndexSearch { index }),
        }
    }

    pub async fn search(&self, query: &str, translation_id: &str, limit: usize) -> SearchOutcome {
        let query = query.trim();

        if let Some(parsed) = parse_verse_query(query) {
            let target = reference_from_query(&parsed);
            let display = match book_name(&target.book) {
                Some(name) => format!("{} {}:{}", name, target.chapter, target.verse),
                None => query.to_string(),
            };
            return SearchOutcome {
                hits: vec![VerseSearchHit {
                    text: format!("Go to {}", display),
                    reference: display,
                    target: Some(target),
                }],
                origin: SearchOrigin::Reference,
                source: "reference".to_string(),
            };
        }

        let request = SearchRequest {
            query: query.to_string(),
            translation_id: translation_id.to_string(),
            limit: limit.clamp(1, MAX_SEARCH_LIMIT),
        };
        let resolved = self.chain.resolve(&request).await;
        let origin = if resolved.source == LOCAL_INDEX_SOURCE {
            SearchOrigin::Local
        } else {
            SearchOrigin::Remote
        };

        SearchOutcome {
            hits: resolved.content,
            origin,
            source: resolved.source,
        }
    }
}
