//! Configuration for bibgrade-core
//!
//! Cutoff years, type exclusions and the tier table have drifted between
//! rule revisions, so they live here as data rather than as constants in
//! the rules. Defaults match the current ruleset.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::scorer::TierTable;

/// How an entry's language is decided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageDetection {
    /// English only when `hyphenation = {english}` is declared
    #[default]
    Hyphenation,
    /// English when the title has no Cyrillic characters
    TitleScript,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Articles published strictly after this year count as recent
    pub recent_cutoff_year: u32,
    /// Entries published in or after this year count as 21st-century
    pub century_start_year: u32,
    /// Calendar year for the future-year rule (local clock when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_year: Option<i32>,
    /// Types left out of the total and foreign counts
    pub suppressed_types: Vec<String>,
    /// Types additionally left out of the foreign count
    pub foreign_excluded_types: Vec<String>,
    pub language_detection: LanguageDetection,
    pub tiers: TierTable,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            recent_cutoff_year: 2015,
            century_start_year: 2000,
            current_year: None,
            suppressed_types: vec!["online".to_string()],
            foreign_excluded_types: vec!["online".to_string(), "misc".to_string()],
            language_detection: LanguageDetection::default(),
            tiers: TierTable::default(),
        }
    }
}

impl ValidatorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// `<config dir>/bibgrade/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bibgrade").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.century_start_year == 0 {
            return Err(ConfigError::OutOfRange(
                "century_start_year must be positive".to_string(),
            ));
        }

        if let Some(year) = self.current_year {
            if year <= 0 {
                return Err(ConfigError::OutOfRange(format!(
                    "current_year must be positive, got {year}"
                )));
            }
        }

        self.tiers.validate()
    }

    /// The configured year, or the local calendar year
    pub fn effective_current_year(&self) -> i32 {
        self.current_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    pub fn is_suppressed(&self, entry_type: &str) -> bool {
        self.suppressed_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(entry_type))
    }

    pub fn is_foreign_excluded(&self, entry_type: &str) -> bool {
        self.is_suppressed(entry_type)
            || self
                .foreign_excluded_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(entry_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ValidatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recent_cutoff_year, 2015);
        assert_eq!(config.century_start_year, 2000);
        assert!(config.is_suppressed("online"));
        assert!(config.is_suppressed("Online"));
        assert!(!config.is_suppressed("misc"));
        assert!(config.is_foreign_excluded("misc"));
        assert!(!config.is_foreign_excluded("article"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ValidatorConfig {
            current_year: Some(2024),
            ..ValidatorConfig::default()
        };
        let toml = config.to_toml().unwrap();
        assert_eq!(ValidatorConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ValidatorConfig::from_toml(
            r#"
recent_cutoff_year = 2010
language_detection = "title-script"
"#,
        )
        .unwrap();
        assert_eq!(config.recent_cutoff_year, 2010);
        assert_eq!(config.language_detection, LanguageDetection::TitleScript);
        assert_eq!(config.tiers, TierTable::default());
        assert_eq!(config.current_year, None);
    }

    #[test]
    fn test_custom_tier_table_from_toml() {
        let config = ValidatorConfig::from_toml(
            r#"
[tiers]
default_tier = "none"

[[tiers.tiers]]
tier = "gold"
total = 10
foreign = 2
recent = 2
century21 = 5

[[tiers.tiers]]
tier = "silver"
total = 5
foreign = 1
recent = 0
century21 = 2
"#,
        )
        .unwrap();
        assert_eq!(config.tiers.max_tier(), "gold");
        assert_eq!(config.tiers.tiers.len(), 2);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = ValidatorConfig::from_toml("current_year = -3").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange(_)));

        let err = ValidatorConfig::from_toml("recent_cutoff_year = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ValidatorConfig::from_json(r#"{"tiers": {"default_tier": "0", "tiers": []}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTiers(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "century_start_year = 2001").unwrap();
        let config = ValidatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.century_start_year, 2001);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ValidatorConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_effective_current_year() {
        let pinned = ValidatorConfig {
            current_year: Some(2030),
            ..ValidatorConfig::default()
        };
        assert_eq!(pinned.effective_current_year(), 2030);
        assert!(ValidatorConfig::default().effective_current_year() >= 2024);
    }

    #[test]
    fn test_json_serialization() {
        let config = ValidatorConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(ValidatorConfig::from_json(&json).unwrap(), config);
    }
}
