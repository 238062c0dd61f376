//! Validation output types

use bibgrade_bibtex::BibEntry;
use serde::{Deserialize, Serialize};

use crate::classify::CorpusStatistics;
use crate::issue::{IssueKind, ValidationIssue};
use crate::scorer::NextTierRequirements;

/// The engine's public result: what callers persist and return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// Syntax errors first, then per-entry issues in entry order
    pub errors: Vec<String>,
    pub tier: String,
    pub next_tier_requirements: NextTierRequirements,
}

impl ComplianceResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Everything one validation run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub entries: Vec<BibEntry>,
    pub issues: Vec<ValidationIssue>,
    pub statistics: CorpusStatistics,
    pub tier: String,
    pub next_tier_requirements: NextTierRequirements,
}

impl ValidationReport {
    /// Issues of one kind, in report order
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.issues_of(kind).count()
    }

    pub fn to_result(&self) -> ComplianceResult {
        ComplianceResult {
            errors: self.issues.iter().map(|i| i.message.clone()).collect(),
            tier: self.tier.clone(),
            next_tier_requirements: self.next_tier_requirements.clone(),
        }
    }
}

impl From<ValidationReport> for ComplianceResult {
    fn from(report: ValidationReport) -> Self {
        Self {
            errors: report.issues.into_iter().map(|i| i.message).collect(),
            tier: report.tier,
            next_tier_requirements: report.next_tier_requirements,
        }
    }
}
