//! Per-entry classification and corpus counters

use bibgrade_bibtex::BibEntry;
use serde::{Deserialize, Serialize};

use crate::config::{LanguageDetection, ValidatorConfig};

/// Language an entry is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Russian,
}

/// True if any character falls in the Cyrillic block (U+0400..U+04FF)
pub fn contains_cyrillic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c))
}

/// Attribute a language to an entry.
///
/// With [`LanguageDetection::Hyphenation`] only an explicit
/// `hyphenation = {english}` makes an entry English. With
/// [`LanguageDetection::TitleScript`] a title without Cyrillic letters does.
pub fn detect_language(entry: &BibEntry, mode: LanguageDetection) -> Language {
    let english = match mode {
        LanguageDetection::Hyphenation => entry
            .hyphenation()
            .is_some_and(|h| h.trim().eq_ignore_ascii_case("english")),
        LanguageDetection::TitleScript => !contains_cyrillic(entry.title().unwrap_or_default()),
    };

    if english {
        Language::English
    } else {
        Language::Russian
    }
}

/// How one entry contributes to the corpus counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub language: Language,
    pub year: Option<u32>,
    pub counted: bool,
    pub foreign: bool,
    pub recent_article: bool,
    pub century21: bool,
}

/// Classify one entry against the configured cutoffs.
///
/// Type-based exclusions use the entry type as written, not its schema alias.
pub fn classify(entry: &BibEntry, config: &ValidatorConfig) -> Classification {
    let entry_type = entry.entry_type.as_str();
    let language = detect_language(entry, config.language_detection);
    let year = entry.numeric_year();
    let counted = !config.is_suppressed(entry_type);

    Classification {
        language,
        year,
        counted,
        foreign: counted
            && language == Language::English
            && !config.is_foreign_excluded(entry_type),
        recent_article: entry_type == "article"
            && year.is_some_and(|y| y > config.recent_cutoff_year),
        century21: year.is_some_and(|y| y >= config.century_start_year),
    }
}

/// Aggregate counters over one validation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    pub total_count: u32,
    pub foreign_language_count: u32,
    pub recent_article_count: u32,
    pub century21_count: u32,
}

impl CorpusStatistics {
    pub fn add(&mut self, classification: &Classification) {
        self.total_count += u32::from(classification.counted);
        self.foreign_language_count += u32::from(classification.foreign);
        self.recent_article_count += u32::from(classification.recent_article);
        self.century21_count += u32::from(classification.century21);
    }

    /// Classify every entry in order and sum the results
    pub fn collect<'a>(
        entries: impl IntoIterator<Item = &'a BibEntry>,
        config: &ValidatorConfig,
    ) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            stats.add(&classify(entry, config));
        }
        stats
    }
}
