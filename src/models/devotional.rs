//! Devotional models.

use serde::{Deserialize, Serialize};

/// A devotional resolved from the latest feed entry.
///
/// `content` is already stripped of markup with the reading plan removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Devotional {
    pub title: String,
    pub content: String,
    pub date: String,
    pub reference: String,
    pub url: String,
    #[serde(default)]
    pub reading_plan: String,
}

/// Raw fields of the first `<item>` of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub description: String,
    pub content_encoded: String,
    pub pub_date: String,
    pub link: String,
}

impl FeedEntry {
    /// Full content when the feed carries it, the short description otherwise.
    pub fn best_content(&self) -> &str {
        if self.content_encoded.trim().is_empty() {
            &self.description
        } else {
            &self.content_encoded
        }
    }
}

/// A reading-plan passage with its study link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPassage {
    pub passage: String,
    pub bible_gateway_url: String,
}

/// Display-ready view of a devotional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevotionalView {
    pub devotional: Devotional,
    pub body: String,
    pub preview: String,
    pub has_more: bool,
    pub passages: Vec<ReadingPassage>,
}
