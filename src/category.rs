//! Category hierarchy construction and queries.
//!
//! Categories are declared flat: each one names at most one parent. [`build`]
//! turns those declarations plus the article list into a [`Hierarchy`], a
//! validated forest with per-category article lists.
//!
//! ## Representation
//!
//! The tree is a set of name-keyed maps rather than linked nodes. Parent and
//! child relationships are lookups by name into [`Hierarchy::by_name`] and
//! [`Hierarchy::children`], so the snapshot is plain owned data: cheap to
//! clone, trivially serializable, and free of back-references.
//!
//! ## Build Passes
//!
//! ```text
//! 1. Register      trim names, reject empty and duplicate names
//! 2. Link          resolve parents, reject unknown and self parents
//! 3. Cycle check   three-state walk over the parent relation
//! 4. Assign        attach each article to its category
//! 5. Finalize      sort children and roots by name, articles by lastmod desc
//! ```
//!
//! The first violation aborts the build with a [`CategoryError`]. These are
//! authoring mistakes in the content, so the caller is expected to stop and
//! show the message as-is.
//!
//! ## Ordering
//!
//! `roots` and every `children` list use [`naming::compare_names`]. Article
//! lists are newest first by `lastmod`; articles with equal `lastmod` keep
//! their input order.

use crate::naming::{self, compare_names};
use crate::types::{ArticleRecord, CategoryRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Empty category name in \"{id}\"")]
    EmptyCategoryName { id: String },
    #[error("Duplicate category name \"{0}\"")]
    DuplicateCategory(String),
    #[error("Category \"{category}\" references unknown parent \"{parent}\"")]
    UnknownParent { category: String, parent: String },
    #[error("Category \"{0}\" cannot be its own parent")]
    SelfParent(String),
    /// The cycle path, starting and ending at the repeated category.
    #[error("Parent cycle detected: {}", .0.join(" -> "))]
    CategoryCycle(Vec<String>),
    #[error("Article \"{article}\" has an empty category")]
    EmptyArticleCategory { article: String },
    #[error("Article \"{article}\" references undefined category \"{category}\"")]
    UnknownArticleCategory { article: String, category: String },
}

/// A validated category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Immutable snapshot of the category forest and its articles.
///
/// Every declared category has an entry in `by_name`, `children`,
/// `direct_article_count` and `direct_articles_by_category`, with empty
/// lists and zero counts where nothing applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub by_name: BTreeMap<String, CategoryNode>,
    /// Categories without a parent, sorted by name
    pub roots: Vec<CategoryNode>,
    /// Direct children per category, sorted by name
    pub children: BTreeMap<String, Vec<CategoryNode>>,
    pub direct_article_count: BTreeMap<String, usize>,
    /// Articles assigned directly to each category, newest `lastmod` first
    pub direct_articles_by_category: BTreeMap<String, Vec<ArticleRecord>>,
}

/// Build and validate the category hierarchy.
///
/// Neither input is modified; articles are cloned into the snapshot.
pub fn build(
    categories: &[CategoryRecord],
    articles: &[ArticleRecord],
) -> Result<Hierarchy, CategoryError> {
    debug!(
        categories = categories.len(),
        articles = articles.len(),
        "building category hierarchy"
    );

    let mut by_name: BTreeMap<String, CategoryNode> = BTreeMap::new();
    let mut declared: Vec<String> = Vec::with_capacity(categories.len());
    let mut children: BTreeMap<String, Vec<CategoryNode>> = BTreeMap::new();
    let mut direct: BTreeMap<String, Vec<ArticleRecord>> = BTreeMap::new();

    for record in categories {
        let name = record.name.trim();
        if name.is_empty() {
            return Err(CategoryError::EmptyCategoryName {
                id: record.id.clone(),
            });
        }
        if by_name.contains_key(name) {
            return Err(CategoryError::DuplicateCategory(name.to_string()));
        }

        let node = CategoryNode {
            name: name.to_string(),
            slug: naming::category_to_slug(name),
            parent_name: non_blank(record.parent.as_deref()),
            description: non_blank(record.description.as_deref()),
        };
        by_name.insert(name.to_string(), node);
        declared.push(name.to_string());
        children.insert(name.to_string(), Vec::new());
        direct.insert(name.to_string(), Vec::new());
    }

    for name in &declared {
        let node = &by_name[name];
        let Some(parent) = node.parent_name.as_deref() else {
            continue;
        };
        if !by_name.contains_key(parent) {
            return Err(CategoryError::UnknownParent {
                category: node.name.clone(),
                parent: parent.to_string(),
            });
        }
        if parent == node.name {
            return Err(CategoryError::SelfParent(node.name.clone()));
        }
        if let Some(siblings) = children.get_mut(parent) {
            siblings.push(node.clone());
        }
    }

    detect_cycles(&by_name, &declared)?;

    for article in articles {
        let category = article.category.trim();
        if category.is_empty() {
            return Err(CategoryError::EmptyArticleCategory {
                article: article.id.clone(),
            });
        }
        match direct.get_mut(category) {
            Some(list) => list.push(article.clone()),
            None => {
                return Err(CategoryError::UnknownArticleCategory {
                    article: article.id.clone(),
                    category: category.to_string(),
                });
            }
        }
    }

    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| compare_names(&a.name, &b.name));
    }

    let mut direct_article_count = BTreeMap::new();
    for (name, list) in direct.iter_mut() {
        list.sort_by(|a, b| b.lastmod.cmp(&a.lastmod));
        direct_article_count.insert(name.clone(), list.len());
    }

    let mut roots: Vec<CategoryNode> = declared
        .iter()
        .filter_map(|name| by_name.get(name))
        .filter(|node| node.parent_name.is_none())
        .cloned()
        .collect();
    roots.sort_by(|a, b| compare_names(&a.name, &b.name));

    debug!(
        categories = by_name.len(),
        roots = roots.len(),
        "category hierarchy built"
    );

    Ok(Hierarchy {
        by_name,
        roots,
        children,
        direct_article_count,
        direct_articles_by_category: direct,
    })
}

/// Trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Three-state cycle detection over the parent relation.
///
/// Each category has at most one parent, so a traversal from any start is a
/// single chain. The chain is walked with an explicit path stack; hitting an
/// in-progress category means the chain closed on itself. Every declared
/// category is tried as a start, in declaration order, and categories already
/// resolved by an earlier walk are not explored again.
fn detect_cycles(
    by_name: &BTreeMap<String, CategoryNode>,
    declared: &[String],
) -> Result<(), CategoryError> {
    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(declared.len());

    for start in declared {
        let mut path: Vec<&str> = Vec::new();
        let mut current = Some(start.as_str());

        while let Some(name) = current {
            match marks.get(name) {
                Some(Mark::Done) => break,
                Some(Mark::InProgress) => {
                    let from = path.iter().position(|n| *n == name).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[from..].iter().map(|n| n.to_string()).collect();
                    cycle.push(name.to_string());
                    return Err(CategoryError::CategoryCycle(cycle));
                }
                None => {
                    marks.insert(name, Mark::InProgress);
                    path.push(name);
                    current = by_name
                        .get(name)
                        .and_then(|node| node.parent_name.as_deref());
                }
            }
        }

        for name in path {
            marks.insert(name, Mark::Done);
        }
    }

    Ok(())
}

impl Hierarchy {
    pub fn get(&self, name: &str) -> Option<&CategoryNode> {
        self.by_name.get(name)
    }

    /// Number of declared categories.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Direct children of `name`, sorted. Empty for leaves and unknown names.
    pub fn children_of(&self, name: &str) -> &[CategoryNode] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Articles assigned directly to `name`, newest first.
    pub fn direct_articles(&self, name: &str) -> &[ArticleRecord] {
        self.direct_articles_by_category
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn direct_count(&self, name: &str) -> usize {
        self.direct_article_count.get(name).copied().unwrap_or(0)
    }

    /// Ancestors of `category`, root first, excluding the category itself.
    ///
    /// Stops at a parent that is missing from `by_name` or already seen, so
    /// a hierarchy loaded from an edited manifest cannot loop forever.
    pub fn ancestors(&self, category: &CategoryNode) -> Vec<&CategoryNode> {
        let mut ancestors = Vec::new();
        let mut visited: HashSet<&str> = HashSet::from([category.name.as_str()]);
        let mut parent = category.parent_name.as_deref();

        while let Some(name) = parent {
            let Some(node) = self.by_name.get(name) else {
                break;
            };
            if !visited.insert(node.name.as_str()) {
                break;
            }
            ancestors.push(node);
            parent = node.parent_name.as_deref();
        }

        ancestors.reverse();
        ancestors
    }

    /// Number of categories below `name`, at any depth.
    pub fn descendant_count(&self, name: &str) -> usize {
        self.children_of(name)
            .iter()
            .map(|child| 1 + self.descendant_count(&child.name))
            .sum()
    }

    /// Direct articles of `name` plus those of all its descendants.
    pub fn subtree_article_count(&self, name: &str) -> usize {
        self.direct_count(name)
            + self
                .children_of(name)
                .iter()
                .map(|child| self.subtree_article_count(&child.name))
                .sum::<usize>()
    }

    /// Pre-order walk of the forest: roots in order, each followed by its
    /// subtree. Yields `(depth, node)` with roots at depth 0.
    pub fn walk(&self) -> Vec<(usize, &CategoryNode)> {
        self.walk_from(self.roots.iter())
    }

    /// Pre-order walk of the subtree rooted at `name`, which is at depth 0.
    /// Empty for unknown names.
    pub fn walk_subtree(&self, name: &str) -> Vec<(usize, &CategoryNode)> {
        self.walk_from(self.by_name.get(name).into_iter())
    }

    fn walk_from<'a, I>(&'a self, starts: I) -> Vec<(usize, &'a CategoryNode)>
    where
        I: DoubleEndedIterator<Item = &'a CategoryNode>,
    {
        let mut visited = Vec::new();
        let mut stack: Vec<(usize, &CategoryNode)> = starts.rev().map(|node| (0, node)).collect();

        while let Some((depth, node)) = stack.pop() {
            visited.push((depth, node));
            stack.extend(
                self.children_of(&node.name)
                    .iter()
                    .rev()
                    .map(|child| (depth + 1, child)),
            );
        }

        visited
    }
}
