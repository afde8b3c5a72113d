//! Cross-niche ranking by weighted opportunity score.

use serde::{Deserialize, Serialize};

use crate::aggregate::NicheAggregate;
use crate::types::Issue;

// ---------------------------------------------------------------------------
// Term weights, in percent (must sum to exactly 100)
// ---------------------------------------------------------------------------

/// Share of listings inside the opportunity window.
pub const W_OPPORTUNITY_SHARE: u32 = 40;
/// Share of listings in the HIGH tier.
pub const W_HIGH_TIER_SHARE: u32 = 30;
/// Revenue potential per business, scaled by 1/10.
pub const W_REVENUE: u32 = 20;
/// Improvement headroom, `100 - avg_score`.
pub const W_HEADROOM: u32 = 10;

const _: () = assert!(
    W_OPPORTUNITY_SHARE + W_HIGH_TIER_SHARE + W_REVENUE + W_HEADROOM == 100,
    "ranking weights must sum to exactly 100"
);

/// Each term is clamped into `0..=TERM_CAP` before weighting.
const TERM_CAP: f64 = 100.0;

pub const HIGH_PRIORITY_MIN_HIGH_TIER: usize = 5;
pub const GOOD_TARGET_MIN_OPPORTUNITIES: usize = 10;
pub const POTENTIAL_MAX_AVG_SCORE: f64 = 50.0;

/// Outreach advice for a niche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    HighPriority,
    GoodTarget,
    Potential,
    Saturated,
}

impl Recommendation {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::HighPriority => "HIGH PRIORITY - Many businesses need major help",
            Recommendation::GoodTarget => "GOOD TARGET - Solid opportunity volume",
            Recommendation::Potential => "POTENTIAL - Low scores but fewer businesses",
            Recommendation::Saturated => "SATURATED - Most businesses already optimized",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// One niche's position in a ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicheRanking {
    /// 1-based position.
    pub rank: usize,
    pub niche: String,
    pub opportunity_score: f64,
    pub total_businesses: usize,
    pub opportunities: usize,
    pub opportunity_percentage: f64,
    pub high_opportunity: usize,
    pub revenue_potential: u64,
    pub avg_score: f64,
    pub avg_rating: f64,
    pub top_issues: Vec<Issue>,
    pub recommendation: Recommendation,
}

/// Weighted 0-100 composite for one niche; `None` when it has no listings.
#[must_use]
pub fn opportunity_score(aggregate: &NicheAggregate) -> Option<f64> {
    if aggregate.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let total = aggregate.total_businesses as f64;
    #[allow(clippy::cast_precision_loss)]
    let opportunity_pct = aggregate.opportunities as f64 / total * 100.0;
    #[allow(clippy::cast_precision_loss)]
    let high_pct = aggregate.high_opportunity as f64 / total * 100.0;
    #[allow(clippy::cast_precision_loss)]
    let revenue_per_business = aggregate.revenue_potential as f64 / total;
    let headroom = 100.0 - aggregate.avg_score;

    let weighted =
        |weight: u32, term: f64| f64::from(weight) / 100.0 * term.clamp(0.0, TERM_CAP);

    Some(
        weighted(W_OPPORTUNITY_SHARE, opportunity_pct)
            + weighted(W_HIGH_TIER_SHARE, high_pct)
            + weighted(W_REVENUE, revenue_per_business / 10.0)
            + weighted(W_HEADROOM, headroom),
    )
}

/// Outreach advice derived from a niche's counts.
#[must_use]
pub fn recommend(aggregate: &NicheAggregate) -> Recommendation {
    if aggregate.high_opportunity >= HIGH_PRIORITY_MIN_HIGH_TIER {
        Recommendation::HighPriority
    } else if aggregate.opportunities >= GOOD_TARGET_MIN_OPPORTUNITIES {
        Recommendation::GoodTarget
    } else if aggregate.avg_score < POTENTIAL_MAX_AVG_SCORE {
        Recommendation::Potential
    } else {
        Recommendation::Saturated
    }
}

/// Rank niches by opportunity score, highest first.
///
/// Niches without listings are left out. Equal scores order by niche name,
/// so the output is the same regardless of input order.
#[must_use]
pub fn rank_niches<'a, I, K>(aggregates: I) -> Vec<NicheRanking>
where
    I: IntoIterator<Item = (K, &'a NicheAggregate)>,
    K: AsRef<str>,
{
    let mut ranked: Vec<NicheRanking> = aggregates
        .into_iter()
        .filter_map(|(name, agg)| {
            let Some(score) = opportunity_score(agg) else {
                tracing::debug!(niche = name.as_ref(), "skipping niche with no listings");
                return None;
            };
            #[allow(clippy::cast_precision_loss)]
            let opportunity_percentage =
                agg.opportunities as f64 / agg.total_businesses as f64 * 100.0;
            Some(NicheRanking {
                rank: 0,
                niche: name.as_ref().to_string(),
                opportunity_score: score,
                total_businesses: agg.total_businesses,
                opportunities: agg.opportunities,
                opportunity_percentage,
                high_opportunity: agg.high_opportunity,
                revenue_potential: agg.revenue_potential,
                avg_score: agg.avg_score,
                avg_rating: agg.avg_rating,
                top_issues: agg.common_issues.iter().take(2).map(|f| f.issue).collect(),
                recommendation: recommend(agg),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.opportunity_score
            .total_cmp(&a.opportunity_score)
            .then_with(|| a.niche.cmp(&b.niche))
    });
    for (i, entry) in ranked.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    ranked
}
