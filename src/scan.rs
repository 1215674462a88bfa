//! Content directory loading.
//!
//! Reads the category declarations and Markdown articles that the builders in
//! [`crate::category`] and [`crate::summary`] consume. Nothing here knows about
//! the category tree; it only turns files into records.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── categories/                  # One file per category
//! │   ├── science.toml             #   name = "Science"
//! │   └── physics.toml             #   name = "Physics", parent = "Science"
//! └── articles/                    # Markdown, searched recursively
//!     ├── double-slit.md           # id "double-slit"
//!     └── physics/
//!         └── newton.md            # id "physics/newton"
//! ```
//!
//! Hidden files and directories (leading `.`) are ignored. A missing
//! `categories/` or `articles/` directory is treated as empty.
//!
//! ## Article Format
//!
//! Every article starts with a `+++`-delimited TOML front matter block:
//!
//! ```text
//! +++
//! title = "Double-slit experiment"
//! description = "Light behaving as a wave"
//! date = 2024-01-10
//! lastmod = 2024-02-01T09:30:00+09:00
//! category = "Quantum"
//! slug = "Double-slit experiment"   # optional, defaults to the id
//! featured = false                  # optional
//! views = 0                         # optional
//! image = "/images/slit.png"        # optional
//! is_day_article = false            # optional
//! events = [{ date = "01-10", text = "..." }]   # optional, MM-DD
//! +++
//!
//! Markdown body with [[Wiki links]].
//! ```
//!
//! Dates are TOML dates or datetimes. A date without a time is midnight UTC;
//! a datetime without an offset is taken as UTC.
//!
//! ## Parallelism
//!
//! Article files are parsed on the rayon pool. Results are collected in path
//! order, so the output does not depend on scheduling.

use crate::config::{self, SiteConfig};
use crate::types::{ArticleRecord, CategoryRecord, DayEvent};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, trace};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Missing +++ front matter in {}", .0.display())]
    MissingFrontMatter(PathBuf),
    #[error("Invalid {field} in {}: dates need a calendar day", .path.display())]
    InvalidDate { path: PathBuf, field: &'static str },
    #[error("Invalid event date \"{date}\" in {} (expected MM-DD)", .path.display())]
    InvalidEventDate { path: PathBuf, date: String },
}

/// Everything loaded from a content directory.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub categories: Vec<CategoryRecord>,
    pub articles: Vec<ArticleRecord>,
    pub config: SiteConfig,
}

/// `categories/<id>.toml`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryFile {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Article front matter, before date conversion.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    title: String,
    description: String,
    date: toml::value::Datetime,
    lastmod: toml::value::Datetime,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    views: u64,
    category: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    is_day_article: bool,
    #[serde(default)]
    events: Vec<DayEvent>,
}

/// Load config, categories and articles from a content root.
pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    scan_with_config(root, config)
}

/// Load categories and articles using an already resolved config.
///
/// The directory layout comes from `config.content`; the config itself ends
/// up in the manifest unchanged.
pub fn scan_with_config(root: &Path, config: SiteConfig) -> Result<Manifest, ScanError> {
    let categories = load_categories(&root.join(&config.content.categories_dir))?;
    let articles = load_articles(&root.join(&config.content.articles_dir))?;

    info!(
        categories = categories.len(),
        articles = articles.len(),
        root = %root.display(),
        "content scanned"
    );

    Ok(Manifest {
        categories,
        articles,
        config,
    })
}

/// Parse every `*.toml` directly inside `dir`, sorted by file name.
pub fn load_categories(dir: &Path) -> Result<Vec<CategoryRecord>, ScanError> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "no categories directory");
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_extension(p, "toml") && !is_hidden_path(p))
        .collect();
    files.sort();

    files.iter().map(|path| parse_category(path)).collect()
}

fn parse_category(path: &Path) -> Result<CategoryRecord, ScanError> {
    let content = fs::read_to_string(path)?;
    let file: CategoryFile = toml::from_str(&content).map_err(|source| ScanError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    trace!(id = %id, name = %file.name, "parsed category");

    Ok(CategoryRecord {
        id,
        name: file.name,
        parent: file.parent,
        description: file.description,
    })
}

/// Parse every `*.md` under `dir`, recursively, in path order.
pub fn load_articles(dir: &Path) -> Result<Vec<ArticleRecord>, ScanError> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "no articles directory");
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), "md") {
            paths.push(entry.into_path());
        }
    }

    debug!(files = paths.len(), dir = %dir.display(), "parsing articles");

    paths
        .par_iter()
        .map(|path| parse_article(dir, path))
        .collect()
}

fn parse_article(dir: &Path, path: &Path) -> Result<ArticleRecord, ScanError> {
    let content = fs::read_to_string(path)?;
    let (front, body) = split_front_matter(&content)
        .ok_or_else(|| ScanError::MissingFrontMatter(path.to_path_buf()))?;
    let fm: FrontMatter = toml::from_str(front).map_err(|source| ScanError::Toml {
        path: path.to_path_buf(),
        source,
    })?;

    let date = to_utc(&fm.date).ok_or_else(|| ScanError::InvalidDate {
        path: path.to_path_buf(),
        field: "date",
    })?;
    let lastmod = to_utc(&fm.lastmod).ok_or_else(|| ScanError::InvalidDate {
        path: path.to_path_buf(),
        field: "lastmod",
    })?;

    if let Some(event) = fm.events.iter().find(|e| !is_month_day(&e.date)) {
        return Err(ScanError::InvalidEventDate {
            path: path.to_path_buf(),
            date: event.date.clone(),
        });
    }

    let id = article_id(dir, path);
    trace!(id = %id, category = %fm.category, "parsed article");

    Ok(ArticleRecord {
        id,
        title: fm.title,
        description: fm.description,
        date,
        lastmod,
        featured: fm.featured,
        views: fm.views,
        category: fm.category,
        image: fm.image,
        slug: fm.slug,
        is_day_article: fm.is_day_article,
        events: fm.events,
        body: body.to_string(),
    })
}

/// Split `+++` front matter from the body.
///
/// The opening `+++` must be the first line (a BOM is tolerated); the block
/// ends at the next line consisting of `+++`. Returns `(front_matter, body)`.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content.strip_prefix("+++")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "+++" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Convert a TOML date or datetime to UTC. Time-only values have no day and
/// yield `None`, as do out-of-range components.
fn to_utc(value: &toml::value::Datetime) -> Option<DateTime<Utc>> {
    let date = value.date?;
    let day = NaiveDate::from_ymd_opt(
        i32::from(date.year),
        u32::from(date.month),
        u32::from(date.day),
    )?;
    let time = match value.time {
        Some(t) => NaiveTime::from_hms_nano_opt(
            u32::from(t.hour),
            u32::from(t.minute),
            u32::from(t.second),
            t.nanosecond,
        )?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };
    let naive = day.and_time(time);

    match value.offset {
        None | Some(toml::value::Offset::Z) => Some(naive.and_utc()),
        Some(toml::value::Offset::Custom { minutes }) => {
            let offset = FixedOffset::east_opt(i32::from(minutes) * 60)?;
            offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}

/// `MM-DD` naming a real day in a leap year.
fn is_month_day(value: &str) -> bool {
    value.len() == 5
        && value.as_bytes()[2] == b'-'
        && NaiveDate::parse_from_str(&format!("2000-{value}"), "%Y-%m-%d").is_ok()
}

/// Article id: path under the articles directory, extension dropped, `/`-separated.
fn article_id(dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(dir).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_hidden_path(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
