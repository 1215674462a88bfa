//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Categories are shown
//! by name and position in the tree with their counts; file paths appear only
//! where they help track down a problem (broken links).
//!
//! # Output Format
//!
//! ## Tree
//!
//! ```text
//! Categories
//! 001 History (1 article, 1 subcategory)
//!     001 日本史 (1 article)
//!         Description: Japanese history
//! 002 Science (4 articles, 2 subcategories)
//!     Description: Natural sciences
//!     001 Physics (3 articles, 1 subcategory)
//!         - Newton's laws (2024-01-15)
//!         001 Quantum (2 articles)
//!             Description: Quantum mechanics and its oddities
//!             - Quantum entanglement (2024-03-01)
//!             - Double-slit experiment (2024-02-01)
//! ```
//!
//! Article counts are subtree totals. Article lines are only shown when
//! asked for.
//!
//! ## Summary
//!
//! ```text
//! Categories by use
//! 001 Physics (1 article)
//! 002 Quantum (2 articles)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::category::{CategoryNode, Hierarchy};
use crate::links::BrokenLink;
use crate::scan::Manifest;
use crate::summary::CategorySummary;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 article`, `2 articles`.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 Science (4 articles, 2 subcategories)
/// 001 Science
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Counts shown next to a category: subtree articles, then descendants.
fn category_detail(hierarchy: &Hierarchy, name: &str) -> String {
    let articles = plural(
        hierarchy.subtree_article_count(name),
        "article",
        "articles",
    );
    match hierarchy.descendant_count(name) {
        0 => articles,
        n => format!("{}, {}", articles, plural(n, "subcategory", "subcategories")),
    }
}

/// Breadcrumb from the root down to `node`, e.g. `Science > Physics > Quantum`.
pub fn format_breadcrumb(hierarchy: &Hierarchy, node: &CategoryNode) -> String {
    let mut parts: Vec<&str> = hierarchy
        .ancestors(node)
        .into_iter()
        .map(|n| n.name.as_str())
        .collect();
    parts.push(&node.name);
    parts.join(" > ")
}

/// Attach 1-based sibling positions to a pre-order `(depth, node)` walk.
fn with_positions<'a>(walk: Vec<(usize, &'a CategoryNode)>) -> Vec<(usize, usize, &'a CategoryNode)> {
    let mut counters: Vec<usize> = Vec::new();
    walk.into_iter()
        .map(|(depth, node)| {
            counters.truncate(depth + 1);
            if counters.len() <= depth {
                counters.resize(depth + 1, 0);
            }
            counters[depth] += 1;
            (depth, counters[depth], node)
        })
        .collect()
}

// ============================================================================
// Tree
// ============================================================================

/// Format the category tree, or the subtree under `focus`.
///
/// With a focus, the first line is its breadcrumb. With `with_articles`,
/// each category lists its direct articles newest first.
pub fn format_tree(hierarchy: &Hierarchy, focus: Option<&str>, with_articles: bool) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];

    let walk = match focus {
        Some(name) => match hierarchy.get(name) {
            Some(node) => {
                lines.push(format!("Path: {}", format_breadcrumb(hierarchy, node)));
                hierarchy.walk_subtree(name)
            }
            None => {
                lines.push(format!("    (no category named \"{name}\")"));
                return lines;
            }
        },
        None => hierarchy.walk(),
    };

    if walk.is_empty() {
        lines.push("    (none)".to_string());
        return lines;
    }

    for (depth, position, node) in with_positions(walk) {
        let base_indent = indent(depth);
        let detail = category_detail(hierarchy, &node.name);
        lines.push(format!(
            "{}{}",
            base_indent,
            entity_header(position, &node.name, Some(&detail))
        ));

        if let Some(desc) = &node.description {
            lines.push(format!(
                "{}    Description: {}",
                base_indent,
                truncate_desc(desc, 60)
            ));
        }

        if with_articles {
            for article in hierarchy.direct_articles(&node.name) {
                lines.push(format!(
                    "{}    - {} ({})",
                    base_indent,
                    article.title,
                    article.lastmod.format("%Y-%m-%d")
                ));
            }
        }
    }

    lines
}

/// Print the category tree to stdout.
pub fn print_tree(hierarchy: &Hierarchy, focus: Option<&str>, with_articles: bool) {
    for line in format_tree(hierarchy, focus, with_articles) {
        println!("{}", line);
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Format scan output: the tree, article totals and effective config.
pub fn format_scan_output(manifest: &Manifest, hierarchy: &Hierarchy) -> Vec<String> {
    let mut lines = format_tree(hierarchy, None, false);

    lines.push(String::new());
    lines.push("Articles".to_string());
    let articles = &manifest.articles;
    let featured = articles.iter().filter(|a| a.featured).count();
    let day = articles.iter().filter(|a| a.is_day_article).count();
    lines.push(format!(
        "    {}, {} featured, {}",
        plural(articles.len(), "article", "articles"),
        featured,
        plural(day, "day article", "day articles")
    ));
    if let Some(newest) = articles.iter().max_by_key(|a| a.lastmod) {
        lines.push(format!(
            "    Newest: {} ({})",
            newest.title,
            newest.lastmod.format("%Y-%m-%d")
        ));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if let Some(site) = &manifest.config.site {
        lines.push(format!("    site: {}", site));
    }
    lines.push(format!("    base_path: {}", manifest.config.base_path));

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, hierarchy: &Hierarchy) {
    for line in format_scan_output(manifest, hierarchy) {
        println!("{}", line);
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the flat category usage summary.
pub fn format_summary(summaries: &[CategorySummary]) -> Vec<String> {
    let mut lines = vec!["Categories by use".to_string()];
    if summaries.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, summary) in summaries.iter().enumerate() {
        let detail = plural(summary.count, "article", "articles");
        lines.push(entity_header(i + 1, &summary.name, Some(&detail)));
    }
    lines
}

/// Print the summary to stdout.
pub fn print_summary(summaries: &[CategorySummary]) {
    for line in format_summary(summaries) {
        println!("{}", line);
    }
}

// ============================================================================
// Links
// ============================================================================

/// Format the broken wiki-link report.
pub fn format_broken_links(broken: &[BrokenLink]) -> Vec<String> {
    if broken.is_empty() {
        return vec!["No broken wiki links".to_string()];
    }
    let mut lines = vec![format!(
        "Broken wiki links ({})",
        broken.len()
    )];
    for link in broken {
        lines.push(format!("    {}: [[{}]]", link.article_id, link.target));
    }
    lines
}

/// Print the broken wiki-link report to stdout.
pub fn print_broken_links(broken: &[BrokenLink]) {
    for line in format_broken_links(broken) {
        println!("{}", line);
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Format a fatal error for stderr using its display message.
pub fn format_error(error: &dyn std::error::Error) -> String {
    format!("Error: {error}")
}

/// Print a fatal error to stderr.
pub fn print_error(error: &dyn std::error::Error) {
    eprintln!("{}", format_error(error));
}

// ============================================================================
// Tests
// ============================================================================
