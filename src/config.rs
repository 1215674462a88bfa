//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is sparse: user values are merged over the stock
//! defaults, so it only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # site = "https://example.github.io"  # Absolute site URL (unset by default)
//! base_path = "/"                       # URL prefix the site is served under
//!
//! [content]
//! articles_dir = "articles"             # Markdown articles, searched recursively
//! categories_dir = "categories"         # One TOML file per category
//!
//! [processing]
//! max_processes = 4                     # Max parallel parsers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Deployment Overrides
//!
//! When building on a CI runner, the environment can override the URL
//! settings without editing the file. See [`apply_env_overrides`]:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `SITE_URL` | replaces `site` |
//! | `BASE_PATH` | replaces `base_path` |
//! | `GITHUB_REPOSITORY` | `owner/repo`; fills `site` with `https://owner.github.io` and, for project pages, `base_path` with `/repo/` |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute site URL, e.g. `https://example.github.io`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// URL prefix for every generated link. Always `/` or `/segment/` after loading.
    pub base_path: String,
    /// Content directory layout.
    pub content: ContentConfig,
    /// Parallel parsing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: None,
            base_path: "/".to_string(),
            content: ContentConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content.articles_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content.articles_dir must not be empty".into(),
            ));
        }
        if self.content.categories_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content.categories_dir must not be empty".into(),
            ));
        }
        if let Some(site) = &self.site
            && !(site.starts_with("http://") || site.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "site must be an http(s) URL, got \"{site}\""
            )));
        }
        Ok(())
    }
}

/// Where articles and category declarations live, relative to the content root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub articles_dir: String,
    pub categories_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            articles_dir: "articles".to_string(),
            categories_dir: "categories".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel article parsers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Normalize a base path to `/` or `/segment(s)/`.
///
/// Leading and trailing slashes are collapsed, so `docs`, `/docs` and
/// `//docs//` all become `/docs/`.
pub fn normalize_base_path(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Apply deployment overrides from the environment.
///
/// `lookup` is `std::env::var` in production; tests pass a map. Empty values
/// count as unset. `SITE_URL` and `BASE_PATH` win outright. Otherwise a
/// `GITHUB_REPOSITORY` of `owner/repo` fills in a missing `site` with the
/// owner's GitHub Pages URL, and for project pages (any repo other than
/// `owner.github.io`) moves a root `base_path` under `/repo/`.
pub fn apply_env_overrides<F>(config: &mut SiteConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let repository = var("GITHUB_REPOSITORY").unwrap_or_default();
    let (owner, repo) = repository.split_once('/').unwrap_or((repository.as_str(), ""));
    let is_project_page =
        !owner.is_empty() && !repo.is_empty() && repo != format!("{owner}.github.io");

    if let Some(site) = var("SITE_URL") {
        config.site = Some(site);
    } else if config.site.is_none() && !owner.is_empty() {
        config.site = Some(format!("https://{owner}.github.io"));
    }

    if let Some(base) = var("BASE_PATH") {
        config.base_path = normalize_base_path(&base);
    } else if is_project_page && config.base_path == "/" {
        config.base_path = normalize_base_path(repo);
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize, normalize
/// and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: SiteConfig = merged.try_into()?;
    config.base_path = normalize_base_path(&config.base_path);
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Wiki Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# Absolute URL the site is published at. Unset by default.
# SITE_URL in the environment overrides this.
# site = "https://example.github.io"

# URL prefix every link is generated under: "/" or "/name/".
# BASE_PATH in the environment overrides this.
base_path = "/"

# ---------------------------------------------------------------------------
# Content layout (relative to the content root)
# ---------------------------------------------------------------------------
[content]
# Markdown articles with +++ TOML front matter, searched recursively.
articles_dir = "articles"

# One <name>.toml per category: name, parent (optional), description (optional).
categories_dir = "categories"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel article parsers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
