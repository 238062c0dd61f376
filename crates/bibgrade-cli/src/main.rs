//! bibgrade - bibliography compliance checker
//!
//! ## Commands
//!
//! - `check`: validate `.bib` files, print issues, tier and next-tier deltas
//! - `score`: run only the tier scorer on a set of counters
//! - `types`: print the resolved entry-type schema
//! - `config`: print the effective configuration as TOML

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use bibgrade_core::{ConfigError, CorpusStatistics, SchemaTable, Validator, ValidatorConfig};
use render::Format;

#[derive(Parser)]
#[command(name = "bibgrade")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate BibTeX bibliographies and grade them against compliance tiers", long_about = None)]
struct Cli {
    /// Enable verbose logging (info level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (TOML); defaults to <config dir>/bibgrade/config.toml when present
    #[arg(short, long, global = true, env = "BIBGRADE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one or more bibliography files
    Check {
        /// Files to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Override the calendar year used by the future-year rule
        #[arg(long)]
        current_year: Option<i32>,

        /// Exit with status 1 when any file has errors
        #[arg(long)]
        fail_on_errors: bool,
    },

    /// Compute the tier for a set of corpus counters
    Score {
        #[arg(long)]
        total: u32,

        #[arg(long)]
        foreign: u32,

        /// Articles published after the recency cutoff
        #[arg(long)]
        recent: u32,

        /// Entries published in the 21st century
        #[arg(long)]
        century21: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print the entry-type schema with aliases resolved
    Types {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { Level::INFO } else { Level::WARN });

    // Resolve the schema up front so a broken table fails before any input is read
    let schema = SchemaTable::builtin();
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            files,
            format,
            current_year,
            fail_on_errors,
        } => {
            if current_year.is_some() {
                config.current_year = current_year;
            }
            let validator = Validator::new(config, schema)?;

            let mut any_errors = false;
            for path in &files {
                let text = read_bibliography(path)?;
                let result = validator.validate(&text);
                info!(file = %path.display(), tier = %result.tier, errors = result.errors.len(), "checked");
                any_errors |= !result.is_clean();
                println!("{}", render::check(path, &result, format)?);
            }

            if fail_on_errors && any_errors {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Score {
            total,
            foreign,
            recent,
            century21,
            format,
        } => {
            config.validate()?;
            let stats = CorpusStatistics {
                total_count: total,
                foreign_language_count: foreign,
                recent_article_count: recent,
                century21_count: century21,
            };
            let tier = config.tiers.score(&stats);
            let next = config.tiers.next_tier_requirements(tier, &stats);
            println!("{}", render::score(tier, &next, format)?);
        }
        Commands::Types { format } => {
            println!("{}", render::types(schema, format)?);
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Install the global subscriber; `RUST_LOG` wins over `level`
fn init_tracing(level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<ValidatorConfig, ConfigError> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "loading config");
        return ValidatorConfig::from_file(path);
    }

    match ValidatorConfig::default_path() {
        Some(path) if path.exists() => {
            info!(path = %path.display(), "loading config");
            ValidatorConfig::from_file(&path)
        }
        _ => Ok(ValidatorConfig::default()),
    }
}

/// Read a file, replacing invalid UTF-8 rather than rejecting it
fn read_bibliography(path: &Path) -> Result<String, std::io::Error> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!(file = %path.display(), "file is not valid UTF-8, decoding lossily");
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}
