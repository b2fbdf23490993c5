//! Devotional fetcher.
//!
//! The feed is only reachable through CORS relays, tried in configured order.
//! The newest item is taken from the RSS; when it looks truncated the article
//! page is fetched through the same relays and its body text extracted.
//! Unlike scripture and photos there is no local fallback: running out of
//! relays is reported to the caller as [`AppError::DevotionalUnavailable`].

use chrono::DateTime;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::chain::{ContentSource, FallbackChain, Resolved, SourceFuture};
use super::http::{UpstreamClient, XML_ACCEPT};
use super::text::{
    clean_devotional_content, collapse_whitespace, create_bible_gateway_url, create_content_preview,
    decode_entities, encode_uri_component, extract_bible_reading_plan, extract_reference,
    normalize_devotional_html, reading_plan_passages, trim_trailing_sections, READING_PLAN_MARKER,
};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{Devotional, DevotionalView, FeedEntry, ReadingPassage};

/// Content shorter than this is assumed to be a feed excerpt.
pub const MIN_FULL_CONTENT_CHARS: usize = 1000;

/// Whole-document text longer than this is cut to start at the title.
const TITLE_ANCHOR_THRESHOLD: usize = 5000;

/// Preview cut target for the devotional card.
pub const PREVIEW_TARGET_CHARS: usize = 200;

/// Article containers, most specific first.
const CONTENT_SELECTORS: [&str; 7] = [
    "article",
    ".entry-content",
    ".post-content",
    ".content",
    "main",
    ".main-content",
    "h1",
];

/// A CORS relay: the target URL is appended percent-encoded to `prefix`.
pub struct RelaySource {
    client: UpstreamClient,
    prefix: String,
}

impl RelaySource {
    pub fn new(client: UpstreamClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }
}

impl ContentSource<String, String> for RelaySource {
    fn id(&self) -> &str {
        &self.prefix
    }

    fn fetch<'a>(&'a self, target: &'a String) -> SourceFuture<'a, String> {
        Box::pin(async move {
            let url = format!("{}{}", self.prefix, encode_uri_component(target));
            self.client.get_text(&url, &[XML_ACCEPT]).await
        })
    }
}

pub struct DevotionalFetcher {
    feed_url: String,
    relays: FallbackChain<String, String>,
}

impl DevotionalFetcher {
    pub fn new(client: UpstreamClient, config: &Config) -> Self {
        let relays = config
            .cors_proxies
            .iter()
            .fold(FallbackChain::new("devotional-relay"), |chain, prefix| {
                chain.with_source(RelaySource::new(client.clone(), prefix.clone()))
            });

        Self {
            feed_url: config.feed_url.clone(),
            relays,
        }
    }

    pub fn relay_ids(&self) -> Vec<&str> {
        self.relays.source_ids()
    }

    /// Latest devotional, tagged with the relay that delivered the feed.
    pub async fn fetch(&self) -> Result<Resolved<Devotional>, AppError> {
        let feed = self.relays.try_resolve(&self.feed_url).await.map_err(|e| {
            AppError::DevotionalUnavailable(format!("Could not load the devotional feed: {}", e))
        })?;

        let entry = parse_first_entry(&feed.content)
            .map_err(|e| AppError::DevotionalUnavailable(format!("Unreadable devotional feed: {}", e)))?
            .ok_or_else(|| AppError::DevotionalUnavailable("No devotional found in feed".to_string()))?;

        let mut content = entry.best_content().to_string();
        if needs_full_article(&content) && !entry.link.trim().is_empty() {
            tracing::debug!(link = %entry.link, "feed item looks truncated, fetching article");
            match self.fetch_article_text(entry.link.trim(), &entry.title).await {
                Some(article) => content = article,
                None => tracing::warn!(link = %entry.link, "article fetch failed, keeping feed content"),
            }
        }

        Ok(Resolved {
            content: build_devotional(&entry, &content),
            source: feed.source,
        })
    }

    async fn fetch_article_text(&self, link: &str, title: &str) -> Option<String> {
        let page = self.relays.try_resolve(&link.to_string()).await.ok()?;
        extract_article_text(&page.content, &decode_entities(title.trim()))
    }
}

/// Feed content without a reading plan, or shorter than
/// [`MIN_FULL_CONTENT_CHARS`], is treated as an excerpt.
pub fn needs_full_article(content: &str) -> bool {
    !content.contains(READING_PLAN_MARKER) || content.chars().count() < MIN_FULL_CONTENT_CHARS
}

#[derive(Clone, Copy)]
enum ItemField {
    Title,
    Description,
    ContentEncoded,
    PubDate,
    Link,
}

impl ItemField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"title" => Some(Self::Title),
            b"description" => Some(Self::Description),
            b"content:encoded" => Some(Self::ContentEncoded),
            b"pubDate" => Some(Self::PubDate),
            b"link" => Some(Self::Link),
            _ => None,
        }
    }

    fn slot(self, entry: &mut FeedEntry) -> &mut String {
        match self {
            Self::Title => &mut entry.title,
            Self::Description => &mut entry.description,
            Self::ContentEncoded => &mut entry.content_encoded,
            Self::PubDate => &mut entry.pub_date,
            Self::Link => &mut entry.link,
        }
    }
}

/// Text for an entity reference the XML reader reports separately.
fn resolve_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        _ => None,
    }
}

/// Raw fields of the first `<item>`, or `None` when the feed has no items.
pub fn parse_first_entry(xml: &str) -> Result<Option<FeedEntry>, AppError> {
    let mut reader = Reader::from_str(xml);
    let mut entry = FeedEntry::default();
    let mut in_item = false;
    let mut field: Option<ItemField> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = start.name();
                if name.as_ref() == b"item" {
                    in_item = true;
                } else if in_item {
                    field = ItemField::from_tag(name.as_ref());
                }
            }
            Event::End(end) => {
                if in_item && end.name().as_ref() == b"item" {
                    break;
                }
                field = None;
            }
            Event::Text(text) => {
                if let Some(f) = field {
                    f.slot(&mut entry).push_str(&String::from_utf8_lossy(&text));
                }
            }
            Event::CData(data) => {
                if let Some(f) = field {
                    f.slot(&mut entry).push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(f) = field {
                    let resolved = match reference.resolve_char_ref()? {
                        Some(c) => Some(c),
                        None => resolve_entity(&reference),
                    };
                    let slot = f.slot(&mut entry);
                    match resolved {
                        Some(c) => slot.push(c),
                        None => {
                            slot.push('&');
                            slot.push_str(&String::from_utf8_lossy(&reference));
                            slot.push(';');
                        }
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }

    Ok(Some(FeedEntry {
        title: entry.title.trim().to_string(),
        description: entry.description.trim().to_string(),
        content_encoded: entry.content_encoded.trim().to_string(),
        pub_date: entry.pub_date.trim().to_string(),
        link: entry.link.trim().to_string(),
    }))
}

/// Body text of an article page.
///
/// Containers are tried in [`CONTENT_SELECTORS`] order (for a bare `h1` its
/// parent is used), then the whole `<body>`. Text is cut at the first
/// trailing section; a reading-plan line found inside the page is kept on
/// its own line so it can be split off later.
pub fn extract_article_text(html: &str, title: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let mut container = None;
    for css in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let element = if css == "h1" {
                element.parent().and_then(ElementRef::wrap).unwrap_or(element)
            } else {
                element
            };
            container = Some(element);
            break;
        }
    }

    let whole_document = container.is_none();
    let container = match container {
        Some(element) => element,
        None => {
            let selector = Selector::parse("body").ok()?;
            document.select(&selector).next()?
        }
    };

    let text = collapse_whitespace(&container.text().collect::<Vec<_>>().join(" "));
    let text = if whole_document && text.chars().count() > TITLE_ANCHOR_THRESHOLD {
        anchor_on_title(&text, title)
    } else {
        text.as_str()
    };

    let plan = text.find(READING_PLAN_MARKER);
    let body_end = plan.unwrap_or(text.len());
    let body = trim_trailing_sections(&text[..body_end]);

    let mut article = body.to_string();
    if let Some(start) = plan {
        let plan_line = trim_trailing_sections(&text[start..]);
        if !plan_line.is_empty() {
            article.push_str("\n\n");
            article.push_str(plan_line);
        }
    }

    if article.trim().is_empty() {
        None
    } else {
        Some(article)
    }
}

/// Start of `title` in `text` (case-insensitive), or all of `text`.
fn anchor_on_title<'a>(text: &'a str, title: &str) -> &'a str {
    if title.is_empty() {
        return text;
    }
    match Regex::new(&format!("(?i){}", regex::escape(title))) {
        Ok(pattern) => pattern.find(text).map(|m| &text[m.start()..]).unwrap_or(text),
        Err(_) => text,
    }
}

/// RFC 2822 `pubDate` as `Monday, January 6, 2025`, or the raw value.
pub fn format_feed_date(raw: &str) -> String {
    DateTime::parse_from_rfc2822(raw.trim())
        .map(|date| date.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}

pub fn build_devotional(entry: &FeedEntry, content: &str) -> Devotional {
    let normalized = normalize_devotional_html(content);
    let reference = extract_reference(&normalized);
    let split = extract_bible_reading_plan(&normalized);

    Devotional {
        title: decode_entities(entry.title.trim()),
        content: split.cleaned_content,
        date: format_feed_date(&entry.pub_date),
        reference,
        url: entry.link.trim().to_string(),
        reading_plan: split.plan,
    }
}

/// Display-ready view: cleaned body, preview and linked plan passages.
pub fn devotional_view(devotional: Devotional) -> DevotionalView {
    let body = clean_devotional_content(&devotional.content);
    let preview = create_content_preview(&body, PREVIEW_TARGET_CHARS);
    let passages = reading_plan_passages(&devotional.reading_plan)
        .into_iter()
        .map(|passage| ReadingPassage {
            bible_gateway_url: create_bible_gateway_url(&passage, None),
            passage,
        })
        .collect();

    DevotionalView {
        devotional,
        body,
        preview: preview.preview,
        has_more: preview.has_more,
        passages,
    }
}
