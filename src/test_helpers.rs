//! Shared test utilities for the simple-wiki test suite.
//!
//! Provides record builders for the pure builders, fixture setup for the
//! loader, and lookup helpers that panic with the available keys on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let h = category::build(
//!     &[category("Science", None), category("Physics", Some("Science"))],
//!     &[article("newton", "Physics", "2024-01-15")],
//! ).unwrap();
//! assert_eq!(names(h.children_of("Science")), vec!["Physics"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::category::CategoryNode;
use crate::types::{ArticleRecord, CategoryRecord};
use chrono::NaiveDate;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

// =========================================================================
// Record builders
// =========================================================================

/// A category record whose id is its name.
pub fn category(name: &str, parent: Option<&str>) -> CategoryRecord {
    CategoryRecord {
        id: name.to_string(),
        name: name.to_string(),
        parent: parent.map(String::from),
        description: None,
    }
}

/// A category record with a description.
pub fn described(name: &str, parent: Option<&str>, description: &str) -> CategoryRecord {
    CategoryRecord {
        description: Some(description.to_string()),
        ..category(name, parent)
    }
}

/// An article with `lastmod` (and `date`) at midnight UTC of a `YYYY-MM-DD` day.
pub fn article(id: &str, category: &str, lastmod: &str) -> ArticleRecord {
    let lastmod = NaiveDate::parse_from_str(lastmod, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad test date '{lastmod}': {e}"))
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();
    ArticleRecord {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        date: lastmod,
        lastmod,
        featured: false,
        views: 0,
        category: category.to_string(),
        image: None,
        slug: None,
        is_day_article: false,
        events: Vec::new(),
        body: String::new(),
    }
}

/// An article with a Markdown body.
pub fn article_with_body(id: &str, category: &str, body: &str) -> ArticleRecord {
    ArticleRecord {
        body: body.to_string(),
        ..article(id, category, "2024-01-01")
    }
}

/// ```text
/// Science ─┬─ Chemistry
///          └─ Physics ─┬─ Optics
///                      └─ Quantum
/// History
/// ```
///
/// Declared out of order on purpose.
pub fn sample_categories() -> Vec<CategoryRecord> {
    vec![
        category("Quantum", Some("Physics")),
        category("Science", None),
        category("Physics", Some("Science")),
        category("History", None),
        category("Optics", Some("Physics")),
        category("Chemistry", Some("Science")),
    ]
}

// =========================================================================
// Extractors and lookups
// =========================================================================

/// Names of a node list, in order.
pub fn names(nodes: &[CategoryNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}

/// Names of a borrowed node list, in order.
pub fn names_of<'a>(nodes: &[&'a CategoryNode]) -> Vec<&'a str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}

/// Ids of an article list, in order.
pub fn article_ids(articles: &[ArticleRecord]) -> Vec<&str> {
    articles.iter().map(|a| a.id.as_str()).collect()
}

/// Find an article by id. Panics if not found.
pub fn find_article<'a>(articles: &'a [ArticleRecord], id: &str) -> &'a ArticleRecord {
    articles.iter().find(|a| a.id == id).unwrap_or_else(|| {
        let ids = article_ids(articles);
        panic!("article '{id}' not found. Available: {ids:?}")
    })
}
