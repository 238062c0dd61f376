//! Reported problems
//!
//! Every problem, whether found by the tokenizer or by the entry rules, ends
//! up as a [`ValidationIssue`]. Issues are never deduplicated: one entry can
//! collect several of them.

use bibgrade_bibtex::{BibEntry, SyntaxError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    Syntax,
    DuplicateKey,
    MissingField,
    BadAuthorFormat,
    FutureYear,
    MissingJournalLocator,
    MissingHyphenation,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::DuplicateKey => "duplicate-key",
            Self::MissingField => "missing-field",
            Self::BadAuthorFormat => "bad-author-format",
            Self::FutureYear => "future-year",
            Self::MissingJournalLocator => "missing-journal-locator",
            Self::MissingHyphenation => "missing-hyphenation",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
    pub citation_key: Option<String>,
    pub line: Option<u32>,
}

impl ValidationIssue {
    fn for_entry(kind: IssueKind, entry: &BibEntry, message: String) -> Self {
        Self {
            kind,
            message,
            citation_key: Some(entry.citation_key.clone()),
            line: Some(entry.source_line),
        }
    }

    pub(crate) fn duplicate_key(entry: &BibEntry) -> Self {
        let message = format!(
            "Duplicate citation key '{}' (line {})",
            entry.citation_key, entry.source_line
        );
        Self::for_entry(IssueKind::DuplicateKey, entry, message)
    }

    pub(crate) fn missing_field(entry: &BibEntry, field: &str) -> Self {
        let message = format!(
            "Missing required field '{}' in entry '{}' of type '{}' (line {})",
            field, entry.citation_key, entry.entry_type, entry.source_line
        );
        Self::for_entry(IssueKind::MissingField, entry, message)
    }

    pub(crate) fn missing_journal_locator(entry: &BibEntry) -> Self {
        let message = format!(
            "Entry '{}' of type '{}' has none of the fields volume, number, issue (line {})",
            entry.citation_key, entry.entry_type, entry.source_line
        );
        Self::for_entry(IssueKind::MissingJournalLocator, entry, message)
    }

    pub(crate) fn empty_author(entry: &BibEntry) -> Self {
        let message = format!(
            "Empty author field in entry '{}' (line {})",
            entry.citation_key, entry.source_line
        );
        Self::for_entry(IssueKind::BadAuthorFormat, entry, message)
    }

    pub(crate) fn bad_author_format(entry: &BibEntry, component: &str) -> Self {
        let message = format!(
            "Invalid author format in entry '{}' (line {}): '{}' is not written as 'Surname, Given names'",
            entry.citation_key, entry.source_line, component
        );
        Self::for_entry(IssueKind::BadAuthorFormat, entry, message)
    }

    pub(crate) fn future_year(entry: &BibEntry, year: u32) -> Self {
        let message = format!(
            "Publication year {} is in the future for entry '{}' (line {})",
            year, entry.citation_key, entry.source_line
        );
        Self::for_entry(IssueKind::FutureYear, entry, message)
    }

    pub(crate) fn missing_hyphenation(entry: &BibEntry) -> Self {
        let message = format!(
            "Entry '{}' has a title without Cyrillic characters but no hyphenation field (line {})",
            entry.citation_key, entry.source_line
        );
        Self::for_entry(IssueKind::MissingHyphenation, entry, message)
    }
}

impl From<SyntaxError> for ValidationIssue {
    fn from(err: SyntaxError) -> Self {
        Self {
            kind: IssueKind::Syntax,
            message: err.message,
            citation_key: err.citation_key,
            line: Some(err.line),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
