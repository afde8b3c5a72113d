//! Score-threshold opportunity classification and package pricing.
//!
//! Tiering is driven by the listing score alone: below `high_below` is a
//! HIGH opportunity, below `medium_below` is MEDIUM, everything else is LOW.
//! Every listing receives a tier; there is no "already optimized" exclusion.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::scorer::ScoreResult;
use crate::types::{Fix, Flag, Score};

/// How much a listing could benefit from optimization work.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpportunityTier {
    High,
    Medium,
    Low,
}

impl OpportunityTier {
    pub const ALL: [OpportunityTier; 3] = [Self::High, Self::Medium, Self::Low];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OpportunityTier::High => "HIGH",
            OpportunityTier::Medium => "MEDIUM",
            OpportunityTier::Low => "LOW",
        }
    }

    /// The service package sold at this tier.
    #[must_use]
    pub const fn package(self) -> Package {
        match self {
            OpportunityTier::High => Package::Premium,
            OpportunityTier::Medium => Package::Standard,
            OpportunityTier::Low => Package::Basic,
        }
    }
}

impl std::fmt::Display for OpportunityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Fixed service packages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Package {
    Premium,
    Standard,
    Basic,
}

impl Package {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Package::Premium => "Premium Package",
            Package::Standard => "Standard Package",
            Package::Basic => "Basic Package",
        }
    }
}

/// Package prices in whole euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    pub premium_eur: u32,
    pub standard_eur: u32,
    pub basic_eur: u32,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            premium_eur: 700,
            standard_eur: 400,
            basic_eur: 200,
        }
    }
}

impl PriceTable {
    #[must_use]
    pub const fn price(&self, package: Package) -> u32 {
        match package {
            Package::Premium => self.premium_eur,
            Package::Standard => self.standard_eur,
            Package::Basic => self.basic_eur,
        }
    }

    /// Label such as `"Premium Package (€700)"`.
    #[must_use]
    pub fn label(&self, package: Package) -> String {
        format!("{} (€{})", package.name(), self.price(package))
    }
}

/// Thresholds and prices for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    high_below: u8,
    medium_below: u8,
    prices: PriceTable,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            high_below: 40,
            medium_below: 60,
            prices: PriceTable::default(),
        }
    }
}

impl ClassifierConfig {
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidThresholds`] unless
    /// `high_below <= medium_below <= 100`.
    pub fn new(high_below: u8, medium_below: u8, prices: PriceTable) -> Result<Self, ScoringError> {
        if high_below > medium_below || u32::from(medium_below) > Score::MAX {
            return Err(ScoringError::InvalidThresholds {
                high_below,
                medium_below,
            });
        }
        Ok(Self {
            high_below,
            medium_below,
            prices,
        })
    }

    #[must_use]
    pub const fn high_below(&self) -> u8 {
        self.high_below
    }

    #[must_use]
    pub const fn medium_below(&self) -> u8 {
        self.medium_below
    }

    #[must_use]
    pub const fn prices(&self) -> &PriceTable {
        &self.prices
    }

    #[must_use]
    pub fn tier_for(&self, score: Score) -> OpportunityTier {
        if score.value() < self.high_below {
            OpportunityTier::High
        } else if score.value() < self.medium_below {
            OpportunityTier::Medium
        } else {
            OpportunityTier::Low
        }
    }

    #[must_use]
    pub const fn tier_price(&self, tier: OpportunityTier) -> u32 {
        self.prices.price(tier.package())
    }
}

/// Tier, package, and remediation list for one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub opportunity_level: OpportunityTier,
    pub recommended_package: Package,
    pub package_price_eur: u32,
    pub package_label: String,
    pub priority_fixes: Vec<Fix>,
}

/// Classify a scored listing.
#[must_use]
pub fn classify(result: &ScoreResult, config: &ClassifierConfig) -> Classification {
    let tier = config.tier_for(result.total_score);
    let package = tier.package();
    Classification {
        opportunity_level: tier,
        recommended_package: package,
        package_price_eur: config.prices.price(package),
        package_label: config.prices.label(package),
        priority_fixes: priority_fixes(&result.category_flags),
    }
}

/// Each fix applies when none of its satisfying flags is set.
/// Table order is priority order.
const FIX_RULES: &[(Fix, &[Flag])] = &[
    (Fix::AddHours, &[Flag::HasHours]),
    (Fix::AddPhone, &[Flag::HasPhone]),
    (Fix::AddWebsite, &[Flag::HasWebsite]),
    (Fix::AddPhotos, &[Flag::SufficientPhotos]),
    (Fix::ImproveReviews, &[Flag::ExcellentReviews, Flag::GoodReviews]),
];

/// Derive remediation actions from a flag set, in priority order.
#[must_use]
pub fn priority_fixes(flags: &BTreeSet<Flag>) -> Vec<Fix> {
    FIX_RULES
        .iter()
        .filter(|(_, satisfied_by)| !satisfied_by.iter().any(|f| flags.contains(f)))
        .map(|(fix, _)| *fix)
        .collect()
}

#[cfg(test)]
mod tests {
    use gmbscout_core::BusinessRecord;

    use super::*;
    use crate::scorer::score_listing;

    fn result_with_score(score: u32) -> ScoreResult {
        ScoreResult {
            total_score: Score::new(score).unwrap(),
            category_flags: BTreeSet::new(),
            issues: vec![],
            photo_count: 0,
            rating: 0.0,
            review_count: 0,
        }
    }

    #[test]
    fn default_thresholds() {
        let config = ClassifierConfig::default();
        let tier = |s| classify(&result_with_score(s), &config).opportunity_level;
        assert_eq!(tier(0), OpportunityTier::High);
        assert_eq!(tier(39), OpportunityTier::High);
        assert_eq!(tier(40), OpportunityTier::Medium);
        assert_eq!(tier(59), OpportunityTier::Medium);
        assert_eq!(tier(60), OpportunityTier::Low);
        assert_eq!(tier(100), OpportunityTier::Low);
    }

    #[test]
    fn default_prices_and_labels() {
        let config = ClassifierConfig::default();
        let high = classify(&result_with_score(20), &config);
        assert_eq!(high.recommended_package, Package::Premium);
        assert_eq!(high.package_price_eur, 700);
        assert_eq!(high.package_label, "Premium Package (€700)");

        let medium = classify(&result_with_score(50), &config);
        assert_eq!(medium.package_price_eur, 400);

        let low = classify(&result_with_score(80), &config);
        assert_eq!(low.recommended_package, Package::Basic);
        assert_eq!(low.package_price_eur, 200);
        assert_eq!(low.package_label, "Basic Package (€200)");
    }

    #[test]
    fn classification_is_monotonic_in_score() {
        let config = ClassifierConfig::default();
        let mut previous = OpportunityTier::High;
        for s in 0..=100 {
            let tier = classify(&result_with_score(s), &config).opportunity_level;
            // Ord: High < Medium < Low, so tiers never step back toward High.
            assert!(tier >= previous, "score {s} went from {previous} to {tier}");
            previous = tier;
        }
    }

    #[test]
    fn custom_config_changes_thresholds_and_prices() {
        let prices = PriceTable {
            premium_eur: 900,
            standard_eur: 500,
            basic_eur: 250,
        };
        let config = ClassifierConfig::new(30, 50, prices).unwrap();
        let c = classify(&result_with_score(35), &config);
        assert_eq!(c.opportunity_level, OpportunityTier::Medium);
        assert_eq!(c.package_price_eur, 500);
        assert_eq!(config.tier_price(OpportunityTier::Low), 250);
    }

    #[test]
    fn config_rejects_inverted_thresholds() {
        let err = ClassifierConfig::new(70, 40, PriceTable::default()).unwrap_err();
        assert_eq!(
            err,
            ScoringError::InvalidThresholds {
                high_below: 70,
                medium_below: 40
            }
        );
        assert!(ClassifierConfig::new(40, 101, PriceTable::default()).is_err());
    }

    #[test]
    fn priority_fixes_for_empty_flags_in_order() {
        let fixes = priority_fixes(&BTreeSet::new());
        assert_eq!(
            fixes,
            vec![
                Fix::AddHours,
                Fix::AddPhone,
                Fix::AddWebsite,
                Fix::AddPhotos,
                Fix::ImproveReviews
            ]
        );
    }

    #[test]
    fn priority_fixes_skip_satisfied_flags() {
        let flags: BTreeSet<Flag> = [Flag::HasHours, Flag::HasWebsite, Flag::GoodReviews]
            .into_iter()
            .collect();
        assert_eq!(priority_fixes(&flags), vec![Fix::AddPhone, Fix::AddPhotos]);
    }

    #[test]
    fn excellent_reviews_satisfy_review_fix() {
        let flags: BTreeSet<Flag> = [Flag::ExcellentReviews].into_iter().collect();
        assert!(!priority_fixes(&flags).contains(&Fix::ImproveReviews));
    }

    #[test]
    fn partial_photos_still_need_more() {
        let flags: BTreeSet<Flag> = [Flag::SomePhotos].into_iter().collect();
        assert!(priority_fixes(&flags).contains(&Fix::AddPhotos));
    }

    #[test]
    fn classify_uses_scored_flags() {
        let record = BusinessRecord {
            name: Some("Backhaus".to_string()),
            phone: Some("030 555".to_string()),
            photo_count: 12,
            ..Default::default()
        };
        let config = ClassifierConfig::default();
        let c = classify(&score_listing(&record), &config);
        assert_eq!(
            c.priority_fixes,
            vec![Fix::AddHours, Fix::AddWebsite, Fix::ImproveReviews]
        );
    }

    #[test]
    fn tier_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&OpportunityTier::Medium).unwrap(),
            "\"MEDIUM\""
        );
    }
}
