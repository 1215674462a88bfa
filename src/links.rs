//! Wiki-style links between articles.
//!
//! Article bodies link to each other with `[[Target]]` or, with a display
//! label, `[[Target|Label]]`. The target is an article's route slug (its
//! `slug` front matter, else its id) and resolves to
//! `{base_path}articles/{target}` with the target percent-encoded the way
//! JavaScript's `encodeURIComponent` does it, so `[[Double-slit experiment]]`
//! under base `/wiki/` becomes `/wiki/articles/Double-slit%20experiment`.
//!
//! Parsing goes through pulldown-cmark with its wikilink extension enabled,
//! so brackets inside code spans and code blocks are not links.

use crate::types::ArticleRecord;
use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use std::collections::HashSet;

/// A `[[Target|Label]]` occurrence in Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WikiLink {
    /// Trimmed link target
    pub target: String,
    /// Display text; the target itself when no label was given
    pub label: String,
    pub href: String,
}

/// A wiki link whose target matches no article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub article_id: String,
    pub target: String,
}

/// URL of the article served under `permalink`.
pub fn article_href(base_path: &str, permalink: &str) -> String {
    format!(
        "{base_path}articles/{}",
        encode_uri_component(permalink.trim())
    )
}

/// All wiki links in a Markdown document, in document order.
pub fn extract_wiki_links(markdown: &str, base_path: &str) -> Vec<WikiLink> {
    let mut links = Vec::new();
    let mut open: Option<(String, String)> = None;

    for event in Parser::new_ext(markdown, Options::ENABLE_WIKILINKS) {
        match event {
            Event::Start(Tag::Link {
                link_type: LinkType::WikiLink { .. },
                dest_url,
                ..
            }) => {
                open = Some((dest_url.trim().to_string(), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, label)) = open.as_mut() {
                    label.push_str(&text);
                }
            }
            Event::End(TagEnd::Link) => {
                if let Some((target, label)) = open.take()
                    && !target.is_empty()
                {
                    let label = if label.trim().is_empty() {
                        target.clone()
                    } else {
                        label
                    };
                    links.push(WikiLink {
                        href: article_href(base_path, &target),
                        target,
                        label,
                    });
                }
            }
            _ => {}
        }
    }

    links
}

/// Wiki links that resolve to no article, per article in input order.
///
/// Each missing target is reported once per article.
pub fn find_broken_links(articles: &[ArticleRecord], base_path: &str) -> Vec<BrokenLink> {
    let known: HashSet<&str> = articles.iter().map(ArticleRecord::route_slug).collect();

    let mut broken = Vec::new();
    for article in articles {
        let mut reported = HashSet::new();
        for link in extract_wiki_links(&article.body, base_path) {
            if !known.contains(link.target.as_str()) && reported.insert(link.target.clone()) {
                broken.push(BrokenLink {
                    article_id: article.id.clone(),
                    target: link.target,
                });
            }
        }
    }
    broken
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
