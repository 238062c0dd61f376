//! Per-entry validation rules
//!
//! Rules run in a fixed order so that messages for one entry always come
//! out in the same sequence:
//! 1. required fields of the (alias-resolved) type
//! 2. journal locator for articles
//! 3. author format
//! 4. future year
//! 5. hyphenation for titles without Cyrillic characters
//!
//! Duplicate citation keys are a corpus-level check and live in the facade.

use bibgrade_bibtex::BibEntry;
use tracing::{debug, warn};

use crate::author::{check_author_format, AuthorFormat};
use crate::classify::contains_cyrillic;
use crate::issue::ValidationIssue;
use crate::schema::SchemaTable;

/// Types validated against another type's field list. Messages still report
/// the type as written.
const VALIDATION_FOLDS: &[(&str, &str)] = &[("online", "misc")];

/// Fields of which an article needs at least one
const JOURNAL_LOCATORS: &[&str] = &["volume", "number", "issue"];

/// Applies the entry rules against one schema table
#[derive(Debug, Clone, Copy)]
pub struct EntryValidator<'s> {
    schema: &'s SchemaTable,
    current_year: i32,
}

impl<'s> EntryValidator<'s> {
    pub fn new(schema: &'s SchemaTable, current_year: i32) -> Self {
        Self {
            schema,
            current_year,
        }
    }

    /// All issues for one entry, in rule order
    pub fn validate(&self, entry: &BibEntry) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let schema_type = schema_type(&entry.entry_type);

        let required: &[String] = match self.schema.required_fields(schema_type) {
            Some(fields) => fields,
            None => {
                warn!(
                    key = %entry.citation_key,
                    entry_type = %entry.entry_type,
                    "unknown entry type, no required fields"
                );
                &[]
            }
        };

        for field in required {
            if !entry.has_field(field) {
                issues.push(ValidationIssue::missing_field(entry, field));
            }
        }

        if self.is_article(entry, schema_type)
            && !JOURNAL_LOCATORS.iter().any(|f| entry.has_field(f))
        {
            issues.push(ValidationIssue::missing_journal_locator(entry));
        }

        if required.iter().any(|f| f == "author") {
            if let Some(author) = entry.author() {
                match check_author_format(author) {
                    AuthorFormat::Valid => {}
                    AuthorFormat::Empty => issues.push(ValidationIssue::empty_author(entry)),
                    AuthorFormat::Malformed { component } => {
                        issues.push(ValidationIssue::bad_author_format(entry, &component))
                    }
                }
            }
        }

        if let Some(year) = entry.numeric_year() {
            if i64::from(year) > i64::from(self.current_year) {
                issues.push(ValidationIssue::future_year(entry, year));
            }
        }

        if let Some(title) = entry.title() {
            if !contains_cyrillic(title) && !entry.has_field("hyphenation") {
                issues.push(ValidationIssue::missing_hyphenation(entry));
            }
        }

        for issue in &issues {
            debug!(key = %entry.citation_key, kind = %issue.kind, "{}", issue.message);
        }

        issues
    }

    fn is_article(&self, entry: &BibEntry, schema_type: &str) -> bool {
        entry.entry_type == "article" || self.schema.canonical_type(schema_type) == Some("article")
    }
}

fn schema_type(entry_type: &str) -> &str {
    VALIDATION_FOLDS
        .iter()
        .find(|&&(from, _)| from == entry_type)
        .map_or(entry_type, |&(_, to)| to)
}
