//! Error types for bibgrade-core
//!
//! Malformed bibliographies are not errors: they produce
//! [`ValidationIssue`](crate::ValidationIssue)s. The types here cover
//! configuration and programming faults only.

use thiserror::Error;

/// Result type alias for bibgrade operations
pub type Result<T> = std::result::Result<T, BibgradeError>;

/// Main error type for bibgrade operations
#[derive(Error, Debug)]
pub enum BibgradeError {
    /// Schema table could not be built
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Broken alias chains in a schema table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Following aliases leads back to a type already visited
    #[error("Alias cycle: {chain}")]
    AliasCycle { chain: String },

    /// An alias points at a type the table does not define
    #[error("Type '{alias}' is an alias of unknown type '{target}'")]
    UnknownAlias { alias: String, target: String },
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    /// Config text is not valid TOML/JSON for this schema
    #[error("Parse error: {0}")]
    Parse(String),

    /// Tier table is inconsistent
    #[error("Invalid tier table: {0}")]
    InvalidTiers(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
