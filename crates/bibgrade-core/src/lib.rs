//! bibgrade-core: bibliography validation engine
//!
//! Turns the text of a BibTeX file into a compliance result:
//! - syntax problems found while tokenizing
//! - per-entry schema, author, year and language checks
//! - corpus counters (total, foreign-language, recent articles, 21st century)
//! - a compliance tier and the deltas needed to reach the next one
//!
//! The engine is pure: no I/O, no shared mutable state. Malformed input is
//! reported in the result, never as an error.
//!
//! ```
//! let result = bibgrade_core::validate("");
//! assert!(result.errors.is_empty());
//! assert_eq!(result.tier, "0");
//! ```

pub mod author;
pub mod classify;
pub mod config;
pub mod error;
pub mod issue;
pub mod report;
pub mod schema;
pub mod scorer;
pub mod validator;

use std::collections::HashSet;

use tracing::{debug, info};

pub use bibgrade_bibtex::{BibEntry, BibField};
pub use classify::{classify, detect_language, Classification, CorpusStatistics, Language};
pub use config::{LanguageDetection, ValidatorConfig};
pub use error::{BibgradeError, ConfigError, Result, SchemaError};
pub use issue::{IssueKind, ValidationIssue};
pub use report::{ComplianceResult, ValidationReport};
pub use schema::{SchemaRule, SchemaTable};
pub use scorer::{NextTierRequirements, TierTable, TierThreshold, MAX_TIER_MESSAGE};
pub use validator::EntryValidator;

/// Validation facade: tokenizer, entry rules, classifier and scorer
#[derive(Debug, Clone)]
pub struct Validator<'s> {
    config: ValidatorConfig,
    schema: &'s SchemaTable,
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self {
            config: ValidatorConfig::default(),
            schema: SchemaTable::builtin(),
        }
    }
}

impl Validator<'static> {
    /// Validator over the built-in schema table
    pub fn with_config(config: ValidatorConfig) -> Result<Self> {
        Self::new(config, SchemaTable::builtin())
    }
}

impl<'s> Validator<'s> {
    pub fn new(config: ValidatorConfig, schema: &'s SchemaTable) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, schema })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn schema(&self) -> &SchemaTable {
        self.schema
    }

    /// Validate bibliography text
    pub fn validate(&self, text: &str) -> ComplianceResult {
        self.report(text).into()
    }

    /// Validate bibliography text, keeping entries, kinded issues and counters
    pub fn report(&self, text: &str) -> ValidationReport {
        let parsed = bibgrade_bibtex::parse(text);
        info!(
            entries = parsed.entries.len(),
            syntax_errors = parsed.errors.len(),
            "parsed bibliography"
        );

        let mut issues: Vec<ValidationIssue> =
            parsed.errors.into_iter().map(ValidationIssue::from).collect();
        let rules = EntryValidator::new(self.schema, self.config.effective_current_year());
        let mut seen_keys = HashSet::new();
        let mut statistics = CorpusStatistics::default();

        for entry in &parsed.entries {
            debug!(
                key = %entry.citation_key,
                entry_type = %entry.entry_type,
                line = entry.source_line,
                "validating entry"
            );
            if !seen_keys.insert(entry.citation_key.as_str()) {
                issues.push(ValidationIssue::duplicate_key(entry));
            }
            issues.extend(rules.validate(entry));
            statistics.add(&classify(entry, &self.config));
        }

        let tier = self.config.tiers.score(&statistics).to_string();
        let next_tier_requirements = self.config.tiers.next_tier_requirements(&tier, &statistics);
        info!(
            total = statistics.total_count,
            foreign = statistics.foreign_language_count,
            recent_articles = statistics.recent_article_count,
            century21 = statistics.century21_count,
            issues = issues.len(),
            tier = %tier,
            "bibliography scored"
        );

        ValidationReport {
            entries: parsed.entries,
            issues,
            statistics,
            tier,
            next_tier_requirements,
        }
    }
}

/// Validate bibliography text with the default configuration
pub fn validate(text: &str) -> ComplianceResult {
    Validator::default().validate(text)
}
