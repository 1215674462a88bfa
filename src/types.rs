//! Input records shared between the content loader and the builders.
//!
//! These are the already-validated shapes the loader hands over: one
//! [`CategoryRecord`] per declared category and one [`ArticleRecord`] per
//! Markdown article. Neither builder cares where they came from, so tests
//! construct them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A category declaration, as read from `categories/<id>.toml`.
///
/// Values are kept exactly as written; trimming and the empty-means-absent
/// rule for `parent` and `description` are applied by the hierarchy builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Source identifier (file stem), used in error messages
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A "this day in history" entry attached to an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DayEvent {
    /// Calendar day in `MM-DD` form
    pub date: String,
    pub text: String,
}

/// An article with its front matter resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Path under the articles directory without extension, `/`-separated
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub lastmod: DateTime<Utc>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub views: u64,
    /// Free-text category name; must match a declared category after trimming
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Explicit URL slug; falls back to `id` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub is_day_article: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<DayEvent>,
    /// Raw Markdown body. Not part of manifests.
    #[serde(skip)]
    pub body: String,
}

impl ArticleRecord {
    /// The URL segment this article is served under (`/articles/<slug>`).
    pub fn route_slug(&self) -> &str {
        crate::naming::article_slug(&self.id, self.slug.as_deref())
    }
}
