//! Test fixture loading and bibliography builders

use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a BibTeX fixture
pub fn load_bibtex_fixture(name: &str) -> String {
    let path = fixture_path(&format!("bibtex/{}", name));
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", path.display()))
}

/// A complete, issue-free article
#[allow(dead_code)]
pub fn article(key: &str, year: u32, english: bool) -> String {
    let (title, hyphenation) = if english {
        ("Graph theory", "  hyphenation = {english},\n")
    } else {
        ("Теория графов", "")
    };
    format!(
        "@article{{{key},\n  author = {{Ivanov, Ivan}},\n  title = {{{title}}},\n  journal = {{Journal}},\n  year = {{{year}}},\n  volume = {{1}},\n{hyphenation}}}\n\n"
    )
}

/// A complete, issue-free Russian-language book
#[allow(dead_code)]
pub fn book(key: &str, year: u32) -> String {
    format!(
        "@book{{{key},\n  author = {{Petrov, Petr}},\n  title = {{Учебник}},\n  year = {{{year}}},\n  address = {{Moscow}},\n  publisher = {{Nauka}},\n  pages = {{300}},\n}}\n\n"
    )
}

/// A bibliography with the given counter profile, built only from clean
/// entries: `foreign` recent English articles, then Russian books from 2005
/// up to `century21`, then Russian books from 1990 up to `total`.
#[allow(dead_code)]
pub fn bibliography(total: u32, foreign: u32, century21: u32) -> String {
    let mut text = String::new();
    for i in 0..total {
        let entry = if i < foreign {
            article(&format!("art{i}"), 2020, true)
        } else if i < century21 {
            book(&format!("new{i}"), 2005)
        } else {
            book(&format!("old{i}"), 1990)
        };
        text.push_str(&entry);
    }
    text
}
