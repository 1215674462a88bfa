//! End-to-end checks over the sample wiki in `fixtures/content/`.

use simple_wiki::category::{self, CategoryError};
use simple_wiki::links::{self, BrokenLink};
use simple_wiki::output;
use simple_wiki::scan::{self, ScanError};
use simple_wiki::summary;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

fn copy_dir(src: &Path, dst: &Path) {
    for entry in std::fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
            copy_dir(&entry.path(), &target);
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn fixture_copy() -> TempDir {
    let tmp = TempDir::new().unwrap();
    copy_dir(&fixture_root(), tmp.path());
    tmp
}

#[test]
fn fixture_wiki_builds_expected_tree() {
    let manifest = scan::scan(&fixture_root()).unwrap();
    let hierarchy = category::build(&manifest.categories, &manifest.articles).unwrap();

    let walked: Vec<(usize, &str)> = hierarchy
        .walk()
        .into_iter()
        .map(|(depth, node)| (depth, node.name.as_str()))
        .collect();
    assert_eq!(
        walked,
        vec![
            (0, "History"),
            (1, "日本史"),
            (0, "Science"),
            (1, "Physics"),
            (2, "Quantum"),
        ]
    );

    assert_eq!(hierarchy.subtree_article_count("Science"), 4);
    assert_eq!(hierarchy.subtree_article_count("History"), 1);
    assert_eq!(hierarchy.descendant_count("Science"), 2);

    let quantum: Vec<&str> = hierarchy
        .direct_articles("Quantum")
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(quantum, vec!["quantum-entanglement", "double-slit"]);

    let ancestors: Vec<&str> = hierarchy
        .ancestors(hierarchy.get("Quantum").unwrap())
        .into_iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(ancestors, vec!["Science", "Physics"]);
}

#[test]
fn fixture_wiki_summary() {
    let manifest = scan::scan(&fixture_root()).unwrap();
    let counts: Vec<(String, usize)> = summary::summarize(&manifest.articles)
        .into_iter()
        .map(|s| (s.name, s.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Physics".to_string(), 1),
            ("Quantum".to_string(), 2),
            ("Science".to_string(), 1),
            ("日本史".to_string(), 1),
        ]
    );
}

#[test]
fn fixture_wiki_has_one_broken_link() {
    let manifest = scan::scan(&fixture_root()).unwrap();
    let broken = links::find_broken_links(&manifest.articles, &manifest.config.base_path);
    assert_eq!(
        broken,
        vec![BrokenLink {
            article_id: "history/meiji-restoration".into(),
            target: "Missing Page".into(),
        }]
    );
    assert_eq!(
        output::format_broken_links(&broken)[1],
        "    history/meiji-restoration: [[Missing Page]]"
    );
}

#[test]
fn wiki_links_resolve_under_base_path() {
    let manifest = scan::scan(&fixture_root()).unwrap();
    let entanglement = manifest
        .articles
        .iter()
        .find(|a| a.id == "quantum-entanglement")
        .unwrap();
    let hrefs: Vec<String> = links::extract_wiki_links(&entanglement.body, &manifest.config.base_path)
        .into_iter()
        .map(|l| l.href)
        .collect();
    assert_eq!(
        hrefs,
        vec![
            "/wiki/articles/Double-slit%20experiment",
            "/wiki/articles/physics%2Fnewton",
        ]
    );
}

#[test]
fn tree_output_for_fixture_wiki() {
    let manifest = scan::scan(&fixture_root()).unwrap();
    let hierarchy = category::build(&manifest.categories, &manifest.articles).unwrap();
    let lines = output::format_tree(&hierarchy, Some("Physics"), true);
    assert_eq!(
        lines,
        vec![
            "Categories",
            "Path: Science > Physics",
            "001 Physics (3 articles, 1 subcategory)",
            "    - Newton's laws (2024-01-15)",
            "    001 Quantum (2 articles)",
            "        Description: Quantum mechanics and its oddities",
            "        - Quantum entanglement (2024-03-01)",
            "        - Double-slit experiment (2024-02-01)",
        ]
    );
}

#[test]
fn cycle_in_content_fails_build() {
    let tmp = fixture_copy();
    std::fs::write(
        tmp.path().join("categories/science.toml"),
        "name = \"Science\"\nparent = \"Quantum\"\n",
    )
    .unwrap();

    let manifest = scan::scan(tmp.path()).unwrap();
    let err = category::build(&manifest.categories, &manifest.articles).unwrap_err();
    assert!(matches!(err, CategoryError::CategoryCycle(_)));
    assert!(err.to_string().starts_with("Parent cycle detected: "));
}

#[test]
fn unknown_article_category_fails_build() {
    let tmp = fixture_copy();
    std::fs::remove_file(tmp.path().join("categories/japanese-history.toml")).unwrap();

    let manifest = scan::scan(tmp.path()).unwrap();
    let err = category::build(&manifest.categories, &manifest.articles).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Article \"history/meiji-restoration\" references undefined category \"日本史\""
    );
}

#[test]
fn article_without_front_matter_fails_scan() {
    let tmp = fixture_copy();
    std::fs::write(tmp.path().join("articles/stray.md"), "# No front matter\n").unwrap();

    let err = scan::scan(tmp.path()).unwrap_err();
    assert!(matches!(err, ScanError::MissingFrontMatter(_)));
}
