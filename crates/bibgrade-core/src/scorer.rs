//! Compliance tier scoring
//!
//! Maps the four corpus counters to a discrete tier. Tiers are listed from
//! the highest to the lowest; the first tier whose four thresholds are all
//! strictly exceeded wins, otherwise the default tier applies.

use serde::{Deserialize, Serialize};

use crate::classify::CorpusStatistics;
use crate::error::ConfigError;

/// Message reported when there is no tier above the current one
pub const MAX_TIER_MESSAGE: &str = "Maximum level reached";

/// Thresholds a corpus must strictly exceed to reach a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThreshold {
    pub tier: String,
    pub total: u32,
    pub foreign: u32,
    pub recent: u32,
    pub century21: u32,
}

impl TierThreshold {
    pub fn new(tier: &str, total: u32, foreign: u32, recent: u32, century21: u32) -> Self {
        Self {
            tier: tier.to_string(),
            total,
            foreign,
            recent,
            century21,
        }
    }

    pub fn is_met_by(&self, stats: &CorpusStatistics) -> bool {
        stats.total_count > self.total
            && stats.foreign_language_count > self.foreign
            && stats.recent_article_count > self.recent
            && stats.century21_count > self.century21
    }

    fn dominates(&self, other: &TierThreshold) -> bool {
        self.total >= other.total
            && self.foreign >= other.foreign
            && self.recent >= other.recent
            && self.century21 >= other.century21
    }
}

/// What is still missing to reach the next tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextTierRequirements {
    pub next_tier: String,
    pub additional_total: u32,
    pub additional_foreign: u32,
    pub additional_recent_articles: u32,
    pub additional_century21: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NextTierRequirements {
    fn towards(target: &TierThreshold, stats: &CorpusStatistics) -> Self {
        let needed = |threshold: u32, have: u32| threshold.saturating_add(1).saturating_sub(have);
        Self {
            next_tier: target.tier.clone(),
            additional_total: needed(target.total, stats.total_count),
            additional_foreign: needed(target.foreign, stats.foreign_language_count),
            additional_recent_articles: needed(target.recent, stats.recent_article_count),
            additional_century21: needed(target.century21, stats.century21_count),
            message: None,
        }
    }

    fn at_maximum(tier: &str) -> Self {
        Self {
            next_tier: tier.to_string(),
            additional_total: 0,
            additional_foreign: 0,
            additional_recent_articles: 0,
            additional_century21: 0,
            message: Some(MAX_TIER_MESSAGE.to_string()),
        }
    }

    pub fn is_at_maximum(&self) -> bool {
        self.message.is_some()
    }
}

/// Ordered tier table, highest tier first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    /// Tier reported when no threshold row qualifies
    pub default_tier: String,
    pub tiers: Vec<TierThreshold>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            default_tier: "0".to_string(),
            tiers: vec![
                TierThreshold::new("6", 35, 7, 7, 20),
                TierThreshold::new("5", 30, 6, 6, 20),
                TierThreshold::new("4", 25, 5, 6, 20),
                TierThreshold::new("3", 20, 4, 4, 14),
                TierThreshold::new("2", 15, 3, 2, 9),
            ],
        }
    }
}

impl TierTable {
    /// The highest tier the statistics qualify for
    pub fn score(&self, stats: &CorpusStatistics) -> &str {
        self.tiers
            .iter()
            .find(|t| t.is_met_by(stats))
            .map_or(self.default_tier.as_str(), |t| t.tier.as_str())
    }

    /// Deltas needed to move from `tier` to the tier directly above it.
    ///
    /// The default tier (or any label not in the table) targets the lowest
    /// listed tier; the top tier reports [`MAX_TIER_MESSAGE`].
    pub fn next_tier_requirements(
        &self,
        tier: &str,
        stats: &CorpusStatistics,
    ) -> NextTierRequirements {
        let target = match self.tiers.iter().position(|t| t.tier == tier) {
            Some(0) => None,
            Some(index) => self.tiers.get(index - 1),
            None => self.tiers.last(),
        };

        match target {
            Some(target) => NextTierRequirements::towards(target, stats),
            None => NextTierRequirements::at_maximum(tier),
        }
    }

    pub fn max_tier(&self) -> &str {
        self.tiers
            .first()
            .map_or(self.default_tier.as_str(), |t| t.tier.as_str())
    }

    /// Check the table is non-empty, labels are unique, and every row is at
    /// most as demanding as the row above it
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::InvalidTiers(
                "at least one tier is required".to_string(),
            ));
        }

        if self.default_tier.trim().is_empty() {
            return Err(ConfigError::InvalidTiers(
                "default_tier must not be empty".to_string(),
            ));
        }

        for (index, row) in self.tiers.iter().enumerate() {
            if row.tier.trim().is_empty() {
                return Err(ConfigError::InvalidTiers(format!(
                    "tier at position {} has an empty label",
                    index + 1
                )));
            }
            if row.tier == self.default_tier {
                return Err(ConfigError::InvalidTiers(format!(
                    "tier '{}' collides with default_tier",
                    row.tier
                )));
            }
            if self.tiers[..index].iter().any(|t| t.tier == row.tier) {
                return Err(ConfigError::InvalidTiers(format!(
                    "tier '{}' is listed twice",
                    row.tier
                )));
            }
            if let Some(above) = index.checked_sub(1).map(|i| &self.tiers[i]) {
                if !above.dominates(row) {
                    return Err(ConfigError::InvalidTiers(format!(
                        "tier '{}' demands more than tier '{}' listed above it",
                        row.tier, above.tier
                    )));
                }
            }
        }

        Ok(())
    }
}
