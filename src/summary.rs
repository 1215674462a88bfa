//! Category usage counts straight from articles.
//!
//! Unlike [`crate::category::build`], this needs no category declarations and
//! never fails: it counts how many articles use each distinct category name.
//! Used where only popularity matters (tag-cloud style listings). Blank
//! category values are skipped.

use crate::naming::{category_to_slug, compare_names};
use crate::types::ArticleRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// Count articles per trimmed category name, sorted by name.
pub fn summarize(articles: &[ArticleRecord]) -> Vec<CategorySummary> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for article in articles {
        let name = article.category.trim();
        if name.is_empty() {
            continue;
        }
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut summaries: Vec<CategorySummary> = counts
        .into_iter()
        .map(|(name, count)| CategorySummary {
            name: name.to_string(),
            slug: category_to_slug(name),
            count,
        })
        .collect();
    summaries.sort_by(|a, b| compare_names(&a.name, &b.name));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::article;

    fn tally(categories: &[&str]) -> Vec<(String, usize)> {
        let articles: Vec<ArticleRecord> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| article(&format!("a{i}"), c, "2024-01-01"))
            .collect();
        summarize(&articles)
            .into_iter()
            .map(|s| (s.name, s.count))
            .collect()
    }

    #[test]
    fn counts_and_skips_blank() {
        assert_eq!(
            tally(&["A", "B", "A", "", " "]),
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
    }

    #[test]
    fn trims_before_counting() {
        assert_eq!(tally(&["Tech", " Tech ", "Tech\n"]), vec![("Tech".to_string(), 3)]);
    }

    #[test]
    fn sorted_by_name() {
        let names: Vec<String> = tally(&["zebra", "Apple", "mango"])
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Apple", "mango", "zebra"]);
    }

    #[test]
    fn slug_is_name() {
        let summaries = summarize(&[article("a", "  Machine Learning ", "2024-01-01")]);
        assert_eq!(summaries[0].slug, "Machine Learning");
    }

    #[test]
    fn empty_input() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn undeclared_names_are_fine() {
        // No hierarchy involved: any non-blank name counts
        assert_eq!(tally(&["Nonexistent"]), vec![("Nonexistent".to_string(), 1)]);
    }
}
