//! # Simple Wiki
//!
//! Content tooling for a small Markdown wiki. Articles are Markdown files with
//! TOML front matter, categories are one TOML file each, and every category
//! may name a parent. Simple Wiki loads that content, validates the category
//! forest, and answers the questions a site generator needs: which articles
//! sit where, how many articles each category holds, and where each
//! `[[wiki link]]` points.
//!
//! # Architecture: Load, Then Build
//!
//! ```text
//! 1. Scan      content/   →  config + category records + article records
//! 2. Build     records    →  Hierarchy            (validated forest)
//! 3. Derive    records    →  summary, wiki links, broken-link report
//! ```
//!
//! Scanning is the only stage that touches the filesystem. The builders are
//! pure functions over slices of records, so unit tests exercise them without
//! any content directory. The `scan` command writes everything it loaded and
//! built to a JSON manifest for inspection.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the content directory, parses category files and article front matter |
//! | [`category`] | Builds and validates the category hierarchy; tree queries |
//! | [`summary`] | Flat per-category article counts |
//! | [`links`] | `[[Target\|Label]]` extraction, URL resolution, broken-link detection |
//! | [`config`] | `config.toml` loading, validation, merging and deployment overrides |
//! | [`types`] | Records shared between the loader and the builders |
//! | [`naming`] | Slugs and the name ordering used for every sorted list |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Names Are Identity
//!
//! A category is identified by its trimmed name: parents, article
//! assignments and map keys all refer to it by name. The hierarchy is a set
//! of name-keyed maps instead of linked nodes, which keeps it owned,
//! serializable, and free of reference cycles even while the parent relation
//! is still being validated.
//!
//! ## Fail Fast
//!
//! The first content error (duplicate name, unknown parent, parent cycle,
//! unknown article category) stops the build with a message that names the
//! offending category or article. There is no partial hierarchy.
//!
//! ## Name Ordering
//!
//! Roots, children and summaries are sorted with [`naming::compare_names`]:
//! case-insensitive, full-width letters equal to their ASCII forms, katakana
//! equal to hiragana, then code point order to break ties. Sorting is stable
//! across machines because it does not depend on the system locale.

pub mod category;
pub mod config;
pub mod links;
pub mod naming;
pub mod output;
pub mod scan;
pub mod summary;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
