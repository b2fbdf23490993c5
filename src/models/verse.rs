//! Scripture models.

use serde::{Deserialize, Serialize};

/// A scripture location independent of translation.
///
/// `book` is the USFM book id the scripture API expects (`JHN`, `1CO`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseReference {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseReference {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }

    /// Path segment used by the verses endpoint, e.g. `JHN.3.16`.
    pub fn api_id(&self) -> String {
        format!("{}.{}.{}", self.book, self.chapter, self.verse)
    }
}

/// Resolved verse text in one translation. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scripture {
    pub text: String,
    pub reference: String,
}

/// Outcome of a scripture lookup.
///
/// `reference` is `None` whenever a fallback answered, so callers must not
/// advance navigation state from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptureResolution {
    pub scripture: Scripture,
    pub reference: Option<VerseReference>,
}

/// One hit from the verse search bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseSearchHit {
    pub text: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<VerseReference>,
}

/// Where a set of search hits came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchOrigin {
    Reference,
    Remote,
    Local,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_ids() {
        let reference = VerseReference::new("JHN", 3, 16);
        assert_eq!(reference.api_id(), "JHN.3.16");
    }
}
