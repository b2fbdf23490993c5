//! Text normalisation for verses and devotionals, plus study-link helpers.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::Serialize;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static LEADING_VERSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*").expect("valid verse number pattern"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid blank line pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static ADMIN_METADATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[^"]*?by admin\s+\d+\s+\d+"#).expect("valid admin metadata pattern")
});
static FIRST_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][^.]*\.").expect("valid sentence pattern"));
static READING_PLAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bible Reading Plan:[^\n]*").expect("valid plan pattern"));
static SIMPLE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+)\s+(\d+):(\d+)").expect("valid reference pattern"));
static BOOK_AND_CHAPTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\s+(\d+)").expect("valid chapter pattern"));
static VERSE_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([1-3]?\s?[A-Za-z]+)\s+(\d+):(\d+)$").expect("valid verse query pattern")
});

pub const READING_PLAN_MARKER: &str = "Bible Reading Plan:";

/// Sections that follow the devotional body on the article page.
pub const TRAILING_SECTION_MARKERS: [&str; 4] =
    ["Tags:", "Previous Article", "Leave a Reply", "About Triumph 30"];

/// Entities the feed is known to emit, in replacement order.
const ENTITIES: [(&str, &str); 12] = [
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#8230;", "..."),
    ("&#8217;", "'"),
    ("&#8216;", "'"),
    ("&#8220;", "\""),
    ("&#8221;", "\""),
    ("&#8211;", "\u{2013}"),
    ("&#8212;", "\u{2014}"),
];

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

pub fn strip_html_tags(input: &str) -> String {
    HTML_TAG.replace_all(input, "").into_owned()
}

pub fn decode_entities(input: &str) -> String {
    ENTITIES
        .iter()
        .fold(input.to_string(), |acc, (entity, text)| acc.replace(entity, text))
}

pub fn collapse_whitespace(input: &str) -> String {
    WHITESPACE.replace_all(input, " ").trim().to_string()
}

/// Verse HTML from the scripture API to plain text without the verse number.
pub fn clean_verse_html(content: &str) -> String {
    let text = strip_html_tags(content);
    LEADING_VERSE_NUMBER
        .replace(text.trim_start(), "")
        .trim()
        .to_string()
}

/// Feed or article markup to plain text, keeping paragraph breaks.
pub fn normalize_devotional_html(content: &str) -> String {
    let text = decode_entities(&strip_html_tags(content));
    BLANK_LINES.replace_all(&text, "\n\n").trim().to_string()
}

fn clean_devotional_once(content: &str) -> String {
    let mut cleaned = ADMIN_METADATA.replace(content, "").into_owned();

    let trimmed = cleaned.trim_start();
    if trimmed.starts_with("But what things") || trimmed.starts_with('"') {
        if let Some(quote) = cleaned.find('"') {
            cleaned = cleaned[quote..].to_string();
        } else if let Some(sentence) = FIRST_SENTENCE.find(&cleaned) {
            cleaned = cleaned[sentence.start()..].to_string();
        }
    }

    if let Some(tags) = cleaned.find("Tags:") {
        cleaned.truncate(tags);
    }

    cleaned.trim().to_string()
}

/// Removes feed metadata ("... by admin 0 0") and everything from `Tags:` on.
///
/// Every step only shortens the text, so iterating to a fixpoint terminates
/// and makes the function idempotent.
pub fn clean_devotional_content(content: &str) -> String {
    let mut current = clean_devotional_once(content);
    loop {
        let next = clean_devotional_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPlanSplit {
    pub plan: String,
    pub cleaned_content: String,
}

/// Pulls the first `Bible Reading Plan: ...` line out of `content`.
pub fn extract_bible_reading_plan(content: &str) -> ReadingPlanSplit {
    match READING_PLAN.find(content) {
        Some(found) => ReadingPlanSplit {
            plan: found.as_str().trim().to_string(),
            cleaned_content: content.replacen(found.as_str(), "", 1).trim().to_string(),
        },
        None => ReadingPlanSplit {
            plan: String::new(),
            cleaned_content: content.to_string(),
        },
    }
}

/// Individual passages of a reading plan line, e.g. `["Job 1", "Psalm 2"]`.
pub fn reading_plan_passages(plan: &str) -> Vec<String> {
    plan.replacen(READING_PLAN_MARKER, "", 1)
        .split([',', ';'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// First `Word N:N` occurrence, or empty.
pub fn extract_reference(content: &str) -> String {
    SIMPLE_REFERENCE
        .find(content)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPreview {
    pub preview: String,
    pub has_more: bool,
}

/// Cuts at the first sentence end (`". "`) at or after `target_length`
/// characters, otherwise at 300 characters.
pub fn create_content_preview(content: &str, target_length: usize) -> ContentPreview {
    let start = content.char_indices().nth(target_length).map(|(i, _)| i);

    if let Some(end) = start.and_then(|s| content[s..].find(". ").map(|i| s + i)) {
        return ContentPreview {
            preview: content[..=end].to_string(),
            has_more: true,
        };
    }

    let preview: String = content.chars().take(300).collect();
    ContentPreview {
        has_more: content.chars().count() > 300,
        preview,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookChapter {
    pub book: String,
    pub chapter: u32,
}

/// `"John 3:16"` -> `john`, `3`. Numbered books are not matched.
pub fn parse_bible_reference(reference: &str) -> Option<BookChapter> {
    let caps = BOOK_AND_CHAPTER.captures(reference)?;
    Some(BookChapter {
        book: caps[1].to_lowercase(),
        chapter: caps[2].parse().ok()?,
    })
}

pub fn create_youversion_url(reference: &str) -> Option<String> {
    parse_bible_reference(reference).map(|parsed| {
        format!(
            "https://www.youversion.com/bible/1/{}.{}",
            parsed.book, parsed.chapter
        )
    })
}

pub fn create_bible_gateway_url(reference: &str, version: Option<&str>) -> String {
    format!(
        "https://www.biblegateway.com/passage/?search={}&version={}",
        encode_uri_component(reference),
        version.unwrap_or("NIV")
    )
}

/// A typed reference from the search bar, book not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseQuery {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

/// Accepts `John 3:16`, `Jn 3:16`, `1 Cor 13:4`.
pub fn parse_verse_query(input: &str) -> Option<VerseQuery> {
    let caps = VERSE_QUERY.captures(input.trim())?;
    Some(VerseQuery {
        book: caps[1].split_whitespace().collect(),
        chapter: caps[2].parse().ok()?,
        verse: caps[3].parse().ok()?,
    })
}

/// Cuts article text at the earliest trailing section marker past the start.
pub fn trim_trailing_sections(text: &str) -> &str {
    let end = TRAILING_SECTION_MARKERS
        .iter()
        .filter_map(|marker| text.find(marker))
        .filter(|&i| i > 0)
        .min()
        .unwrap_or(text.len());
    text[..end].trim()
}
