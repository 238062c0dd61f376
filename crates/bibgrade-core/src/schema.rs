//! Entry-type schema table
//!
//! Maps an entry type to the fields it must carry. Some types are pure
//! synonyms of others (`phdthesis` -> `mastersthesis`); alias chains are
//! followed once, when the table is built, so lookups never recurse and a
//! broken chain is reported before any bibliography is validated.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::SchemaError;

lazy_static! {
    /// Built-in table, constructed on first use and never mutated.
    static ref BUILTIN_SCHEMA: SchemaTable = SchemaTable::from_rules(builtin_rules())
        .expect("built-in schema table contains a broken alias chain");
}

/// One row of the schema: a concrete field list or the name of another type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRule {
    Fields(Vec<String>),
    Alias(String),
}

impl SchemaRule {
    pub fn fields(names: &[&str]) -> Self {
        Self::Fields(names.iter().map(|n| n.to_string()).collect())
    }

    pub fn alias(target: &str) -> Self {
        Self::Alias(target.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedType {
    canonical: String,
    fields: Vec<String>,
}

/// Read-only schema table with every alias already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTable {
    rules: BTreeMap<String, SchemaRule>,
    resolved: HashMap<String, ResolvedType>,
}

impl SchemaTable {
    /// Build a table from raw rules, resolving every alias chain.
    ///
    /// Type names, field names and alias targets are lower-cased.
    pub fn from_rules<I, K>(rules: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, SchemaRule)>,
        K: Into<String>,
    {
        let rules: BTreeMap<String, SchemaRule> = rules
            .into_iter()
            .map(|(name, rule)| {
                let rule = match rule {
                    SchemaRule::Fields(fields) => {
                        SchemaRule::Fields(fields.iter().map(|f| f.to_lowercase()).collect())
                    }
                    SchemaRule::Alias(target) => SchemaRule::Alias(target.to_lowercase()),
                };
                (name.into().to_lowercase(), rule)
            })
            .collect();

        let mut resolved = HashMap::with_capacity(rules.len());
        for name in rules.keys() {
            resolved.insert(name.clone(), resolve_chain(&rules, name)?);
        }

        Ok(Self { rules, resolved })
    }

    /// The process-wide built-in table
    pub fn builtin() -> &'static SchemaTable {
        &BUILTIN_SCHEMA
    }

    /// Required fields of a type, or `None` for a type the table does not know
    pub fn required_fields(&self, entry_type: &str) -> Option<&[String]> {
        self.lookup(entry_type).map(|r| r.fields.as_slice())
    }

    /// The concrete type an alias chain ends at (the type itself if it is not an alias)
    pub fn canonical_type(&self, entry_type: &str) -> Option<&str> {
        self.lookup(entry_type).map(|r| r.canonical.as_str())
    }

    pub fn contains(&self, entry_type: &str) -> bool {
        self.lookup(entry_type).is_some()
    }

    /// The rule as written, before alias resolution
    pub fn rule(&self, entry_type: &str) -> Option<&SchemaRule> {
        self.rules.get(&entry_type.to_lowercase())
    }

    /// All types in name order with their resolved field lists
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rules.keys().filter_map(|name| {
            self.resolved
                .get(name)
                .map(|r| (name.as_str(), r.fields.as_slice()))
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn lookup(&self, entry_type: &str) -> Option<&ResolvedType> {
        self.resolved.get(&entry_type.to_lowercase())
    }
}

impl Default for SchemaTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn resolve_chain(
    rules: &BTreeMap<String, SchemaRule>,
    start: &str,
) -> Result<ResolvedType, SchemaError> {
    let mut visited: Vec<&str> = vec![start];
    let mut current = start;

    loop {
        match rules.get(current) {
            Some(SchemaRule::Fields(fields)) => {
                return Ok(ResolvedType {
                    canonical: current.to_string(),
                    fields: fields.clone(),
                });
            }
            Some(SchemaRule::Alias(target)) => {
                let target = target.as_str();
                if visited.contains(&target) {
                    visited.push(target);
                    return Err(SchemaError::AliasCycle {
                        chain: visited.join(" -> "),
                    });
                }
                visited.push(target);
                current = target;
            }
            None => {
                let alias = visited
                    .len()
                    .checked_sub(2)
                    .and_then(|i| visited.get(i))
                    .copied()
                    .unwrap_or(start);
                return Err(SchemaError::UnknownAlias {
                    alias: alias.to_string(),
                    target: current.to_string(),
                });
            }
        }
    }
}

fn builtin_rules() -> Vec<(&'static str, SchemaRule)> {
    use SchemaRule as R;

    vec![
        ("article", R::fields(&["author", "title", "journal", "year"])),
        (
            "book",
            R::fields(&["author", "title", "year", "address", "publisher", "pages"]),
        ),
        ("manual", R::fields(&["organization", "title", "year"])),
        ("misc", R::fields(&["author", "title", "urldate", "url"])),
        ("online", R::fields(&["author", "title", "urldate", "url"])),
        ("mvbook", R::alias("book")),
        ("inbook", R::fields(&["author", "title", "booktitle", "year"])),
        ("bookinbook", R::alias("inbook")),
        ("suppbook", R::alias("inbook")),
        ("booklet", R::fields(&["author", "title", "year"])),
        ("collection", R::fields(&["editor", "title", "year"])),
        ("mvcollection", R::alias("collection")),
        (
            "incollection",
            R::fields(&["author", "title", "booktitle", "year"]),
        ),
        ("suppcollection", R::alias("incollection")),
        ("patent", R::fields(&["author", "title", "number", "year"])),
        ("periodical", R::fields(&["editor", "title", "year"])),
        ("suppperiodical", R::alias("article")),
        ("proceedings", R::fields(&["title", "year"])),
        ("mvproceedings", R::alias("proceedings")),
        (
            "inproceedings",
            R::fields(&[
                "author",
                "title",
                "booktitle",
                "year",
                "pages",
                "organization",
            ]),
        ),
        ("reference", R::alias("collection")),
        ("mvreference", R::alias("collection")),
        ("inreference", R::alias("incollection")),
        (
            "report",
            R::fields(&["author", "title", "type", "institution", "year"]),
        ),
        (
            "thesis",
            R::fields(&["author", "title", "type", "institution", "year"]),
        ),
        ("unpublished", R::fields(&["author", "title", "year"])),
        (
            "mastersthesis",
            R::fields(&["author", "title", "institution", "year"]),
        ),
        (
            "techreport",
            R::fields(&["author", "title", "institution", "year"]),
        ),
        ("conference", R::alias("inproceedings")),
        ("electronic", R::alias("online")),
        ("phdthesis", R::alias("mastersthesis")),
        ("www", R::alias("online")),
        ("school", R::alias("mastersthesis")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_resolves() {
        let table = SchemaTable::builtin();
        assert_eq!(table.len(), 33);
        assert!(table.iter().all(|(_, fields)| !fields.is_empty()));
    }

    #[test]
    fn test_concrete_type() {
        let table = SchemaTable::builtin();
        assert_eq!(
            table.required_fields("article").unwrap(),
            &["author", "title", "journal", "year"]
        );
        assert_eq!(table.canonical_type("article"), Some("article"));
    }

    #[test]
    fn test_alias_resolution() {
        let table = SchemaTable::builtin();
        assert_eq!(
            table.required_fields("phdthesis"),
            table.required_fields("mastersthesis")
        );
        assert_eq!(table.canonical_type("school"), Some("mastersthesis"));
        assert_eq!(table.canonical_type("suppperiodical"), Some("article"));
        assert_eq!(table.canonical_type("www"), Some("online"));
        assert_eq!(table.rule("www"), Some(&SchemaRule::alias("online")));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = SchemaTable::builtin();
        assert!(table.contains("InProceedings"));
        assert_eq!(table.canonical_type("CONFERENCE"), Some("inproceedings"));
    }

    #[test]
    fn test_unknown_type() {
        let table = SchemaTable::builtin();
        assert!(table.required_fields("software").is_none());
        assert!(!table.contains("software"));
    }

    #[test]
    fn test_transitive_alias() {
        let table = SchemaTable::from_rules([
            ("a", SchemaRule::alias("b")),
            ("b", SchemaRule::alias("c")),
            ("c", SchemaRule::fields(&["Title"])),
        ])
        .unwrap();
        assert_eq!(table.required_fields("a").unwrap(), &["title"]);
        assert_eq!(table.canonical_type("a"), Some("c"));
    }

    #[test]
    fn test_alias_cycle_is_rejected() {
        let err = SchemaTable::from_rules([
            ("a", SchemaRule::alias("b")),
            ("b", SchemaRule::alias("a")),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::AliasCycle { .. }));
    }

    #[test]
    fn test_self_alias_is_rejected() {
        let err = SchemaTable::from_rules([("a", SchemaRule::alias("a"))]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::AliasCycle {
                chain: "a -> a".to_string()
            }
        );
    }

    #[test]
    fn test_dangling_alias_is_rejected() {
        let err = SchemaTable::from_rules([
            ("a", SchemaRule::alias("b")),
            ("b", SchemaRule::alias("missing")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownAlias {
                alias: "b".to_string(),
                target: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_rules_deserialize_from_json() {
        let rules: BTreeMap<String, SchemaRule> =
            serde_json::from_str(r#"{"paper": ["author", "title"], "preprint": "paper"}"#)
                .unwrap();
        let table = SchemaTable::from_rules(rules).unwrap();
        assert_eq!(table.required_fields("preprint").unwrap(), &["author", "title"]);
    }
}
