//! Text and JSON rendering for command output

use std::path::Path;

use bibgrade_core::{ComplianceResult, NextTierRequirements, SchemaRule, SchemaTable};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct FileResult<'a> {
    file: String,
    #[serde(flatten)]
    result: &'a ComplianceResult,
}

#[derive(Serialize)]
struct ScoreResult<'a> {
    tier: &'a str,
    next_tier_requirements: &'a NextTierRequirements,
}

#[derive(Serialize)]
struct TypeRow<'a> {
    entry_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias_of: Option<&'a str>,
    required_fields: &'a [String],
}

pub fn check(
    path: &Path,
    result: &ComplianceResult,
    format: Format,
) -> Result<String, serde_json::Error> {
    if format == Format::Json {
        return serde_json::to_string(&FileResult {
            file: path.display().to_string(),
            result,
        });
    }

    let mut out = format!(
        "{}: tier {}, {} {}\n",
        path.display(),
        result.tier,
        result.errors.len(),
        if result.errors.len() == 1 { "error" } else { "errors" }
    );
    for error in &result.errors {
        out.push_str(&format!("  - {error}\n"));
    }
    out.push_str(&next_tier_line(&result.next_tier_requirements));
    Ok(out)
}

pub fn score(
    tier: &str,
    next: &NextTierRequirements,
    format: Format,
) -> Result<String, serde_json::Error> {
    match format {
        Format::Json => serde_json::to_string(&ScoreResult {
            tier,
            next_tier_requirements: next,
        }),
        Format::Text => Ok(format!("tier {tier}\n{}", next_tier_line(next))),
    }
}

pub fn types(schema: &SchemaTable, format: Format) -> Result<String, serde_json::Error> {
    let rows: Vec<TypeRow<'_>> = schema
        .iter()
        .map(|(entry_type, required_fields)| TypeRow {
            entry_type,
            alias_of: match schema.rule(entry_type) {
                Some(SchemaRule::Alias(_)) => schema.canonical_type(entry_type),
                _ => None,
            },
            required_fields,
        })
        .collect();

    if format == Format::Json {
        return serde_json::to_string_pretty(&rows);
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let fields = if row.required_fields.is_empty() {
                "(none)".to_string()
            } else {
                row.required_fields.join(", ")
            };
            match row.alias_of {
                Some(target) => format!("{} -> {}: {}", row.entry_type, target, fields),
                None => format!("{}: {}", row.entry_type, fields),
            }
        })
        .collect();
    Ok(lines.join("\n"))
}

fn next_tier_line(next: &NextTierRequirements) -> String {
    match &next.message {
        Some(message) => format!("  {message}"),
        None => format!(
            "  next tier {}: +{} total, +{} foreign-language, +{} recent articles, +{} 21st-century",
            next.next_tier,
            next.additional_total,
            next.additional_foreign,
            next.additional_recent_articles,
            next.additional_century21
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibgrade_core::{CorpusStatistics, TierTable};

    fn result(errors: &[&str]) -> ComplianceResult {
        let tiers = TierTable::default();
        let stats = CorpusStatistics::default();
        ComplianceResult {
            errors: errors.iter().map(|e| e.to_string()).collect(),
            tier: "0".to_string(),
            next_tier_requirements: tiers.next_tier_requirements("0", &stats),
        }
    }

    #[test]
    fn test_check_text() {
        let out = check(Path::new("refs.bib"), &result(&["Duplicate citation key 'a' (line 3)"]), Format::Text)
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "refs.bib: tier 0, 1 error");
        assert_eq!(lines[1], "  - Duplicate citation key 'a' (line 3)");
        assert_eq!(
            lines[2],
            "  next tier 2: +16 total, +4 foreign-language, +3 recent articles, +10 21st-century"
        );
    }

    #[test]
    fn test_check_text_without_errors() {
        let out = check(Path::new("clean.bib"), &result(&[]), Format::Text).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "clean.bib: tier 0, 0 errors");
        assert!(lines[1].starts_with("  next tier 2:"));
    }

    #[test]
    fn test_check_json_is_flat() {
        let out = check(Path::new("refs.bib"), &result(&[]), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["file"], "refs.bib");
        assert_eq!(value["tier"], "0");
        assert_eq!(value["errors"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["next_tier_requirements"]["next_tier"], "2");
    }

    #[test]
    fn test_score_at_maximum() {
        let tiers = TierTable::default();
        let next = tiers.next_tier_requirements("6", &CorpusStatistics::default());
        assert_eq!(score("6", &next, Format::Text).unwrap(), "tier 6\n  Maximum level reached");

        let json: serde_json::Value =
            serde_json::from_str(&score("6", &next, Format::Json).unwrap()).unwrap();
        assert_eq!(json["next_tier_requirements"]["message"], "Maximum level reached");
    }

    #[test]
    fn test_types_lists_aliases() {
        let out = types(SchemaTable::builtin(), Format::Text).unwrap();
        assert!(out.lines().any(|l| l == "article: author, title, journal, year"));
        assert!(out.lines().any(|l| l.starts_with("phdthesis -> mastersthesis: ")));

        let json: serde_json::Value =
            serde_json::from_str(&types(SchemaTable::builtin(), Format::Json).unwrap()).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), SchemaTable::builtin().len());
        assert!(rows.iter().all(|r| r.get("required_fields").is_some()));
    }
}
