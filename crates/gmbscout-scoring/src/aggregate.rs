//! Per-niche aggregation of listing scores.
//!
//! [`NicheAccumulator`] is a commutative, associative fold state: partial
//! accumulators built on disjoint record subsets can be merged in any order
//! and finish to the same [`NicheAggregate`] as a single sequential pass.

use std::collections::BTreeMap;

use gmbscout_core::BusinessRecord;
use serde::{Deserialize, Serialize};

use crate::classifier::{classify, ClassifierConfig, OpportunityTier, Package};
use crate::error::ScoringError;
use crate::scorer::score_listing;
use crate::types::{Fix, Issue, Score};

/// Inclusive score range `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWindow {
    min: u8,
    max: u8,
}

impl Default for ScoreWindow {
    fn default() -> Self {
        Self { min: 30, max: 70 }
    }
}

impl ScoreWindow {
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidWindow`] if `min > max` or `max > 100`.
    pub fn new(min: u8, max: u8) -> Result<Self, ScoringError> {
        if min > max || u32::from(max) > Score::MAX {
            return Err(ScoringError::InvalidWindow { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(&self) -> u8 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> u8 {
        self.max
    }

    #[must_use]
    pub fn contains(&self, score: Score) -> bool {
        (self.min..=self.max).contains(&score.value())
    }
}

/// Knobs for [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub classifier: ClassifierConfig,
    /// Listings scoring inside this window count as `opportunities`.
    pub opportunity_window: ScoreWindow,
    /// When set, listings outside this window are dropped before tallying.
    pub inclusion_filter: Option<ScoreWindow>,
    /// Length of `common_issues` / `common_fixes`.
    pub top_n: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            opportunity_window: ScoreWindow::default(),
            inclusion_filter: None,
            top_n: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFrequency {
    pub issue: Issue,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixFrequency {
    pub fix: Fix,
    pub count: usize,
}

/// Summary of one niche's listings.
///
/// Averages are `0.0` when `total_businesses` is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NicheAggregate {
    pub total_businesses: usize,
    pub filtered_out: usize,
    pub high_opportunity: usize,
    pub medium_opportunity: usize,
    pub low_opportunity: usize,
    /// Listings scoring inside the opportunity window.
    pub opportunities: usize,
    pub avg_score: f64,
    pub avg_rating: f64,
    pub avg_review_count: f64,
    /// Euros: Σ tier count × tier package price.
    pub revenue_potential: u64,
    pub common_issues: Vec<IssueFrequency>,
    pub common_fixes: Vec<FixFrequency>,
}

impl NicheAggregate {
    #[must_use]
    pub const fn tier_count(&self, tier: OpportunityTier) -> usize {
        match tier {
            OpportunityTier::High => self.high_opportunity,
            OpportunityTier::Medium => self.medium_opportunity,
            OpportunityTier::Low => self.low_opportunity,
        }
    }

    /// Listings per recommended package, premium first.
    #[must_use]
    pub fn package_counts(&self) -> [(Package, usize); 3] {
        [
            OpportunityTier::High,
            OpportunityTier::Medium,
            OpportunityTier::Low,
        ]
        .map(|tier| (tier.package(), self.tier_count(tier)))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_businesses == 0
    }
}

/// Running fold state for a niche.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NicheAccumulator {
    included: usize,
    filtered_out: usize,
    tiers: [usize; 3],
    opportunities: usize,
    score_sum: u64,
    /// Ratings in tenths of a star so sums merge exactly.
    rating_tenths_sum: u64,
    review_sum: u64,
    issue_counts: BTreeMap<Issue, usize>,
    fix_counts: BTreeMap<Fix, usize>,
}

impl NicheAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Score, classify, and tally one listing.
    pub fn push(&mut self, record: &BusinessRecord, options: &AggregateOptions) {
        let result = score_listing(record);
        let score = result.total_score;

        if let Some(filter) = options.inclusion_filter {
            if !filter.contains(score) {
                self.filtered_out += 1;
                return;
            }
        }

        let classification = classify(&result, &options.classifier);
        self.included += 1;
        self.tiers[tier_index(classification.opportunity_level)] += 1;
        if options.opportunity_window.contains(score) {
            self.opportunities += 1;
        }
        self.score_sum += u64::from(score.value());
        self.rating_tenths_sum += rating_tenths(result.rating);
        self.review_sum += u64::from(result.review_count);

        for issue in &result.issues {
            *self.issue_counts.entry(*issue).or_insert(0) += 1;
        }
        for fix in &classification.priority_fixes {
            *self.fix_counts.entry(*fix).or_insert(0) += 1;
        }
    }

    /// Combine two partial accumulators.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.included += other.included;
        self.filtered_out += other.filtered_out;
        for (mine, theirs) in self.tiers.iter_mut().zip(other.tiers) {
            *mine += theirs;
        }
        self.opportunities += other.opportunities;
        self.score_sum += other.score_sum;
        self.rating_tenths_sum += other.rating_tenths_sum;
        self.review_sum += other.review_sum;
        for (issue, count) in other.issue_counts {
            *self.issue_counts.entry(issue).or_insert(0) += count;
        }
        for (fix, count) in other.fix_counts {
            *self.fix_counts.entry(fix).or_insert(0) += count;
        }
        self
    }

    /// Compute means, revenue, and top-N frequencies.
    #[must_use]
    pub fn finish(self, options: &AggregateOptions) -> NicheAggregate {
        let [high, medium, low] = self.tiers;
        let prices = &options.classifier;
        let revenue_potential = OpportunityTier::ALL
            .iter()
            .map(|&tier| {
                self.tiers[tier_index(tier)] as u64 * u64::from(prices.tier_price(tier))
            })
            .sum();

        #[allow(clippy::cast_precision_loss)]
        let mean = |sum: u64| -> f64 {
            if self.included == 0 {
                0.0
            } else {
                sum as f64 / self.included as f64
            }
        };

        NicheAggregate {
            total_businesses: self.included,
            filtered_out: self.filtered_out,
            high_opportunity: high,
            medium_opportunity: medium,
            low_opportunity: low,
            opportunities: self.opportunities,
            avg_score: mean(self.score_sum),
            avg_rating: mean(self.rating_tenths_sum) / 10.0,
            avg_review_count: mean(self.review_sum),
            revenue_potential,
            common_issues: top_n(&self.issue_counts, options.top_n)
                .map(|(issue, count)| IssueFrequency { issue, count })
                .collect(),
            common_fixes: top_n(&self.fix_counts, options.top_n)
                .map(|(fix, count)| FixFrequency { fix, count })
                .collect(),
        }
    }
}

/// Score, classify, and summarize one niche's listings.
///
/// Empty input (or input fully removed by the inclusion filter) yields a
/// zeroed aggregate.
#[must_use]
pub fn aggregate<'a, I>(records: I, options: &AggregateOptions) -> NicheAggregate
where
    I: IntoIterator<Item = &'a BusinessRecord>,
{
    records
        .into_iter()
        .fold(NicheAccumulator::new(), |mut acc, record| {
            acc.push(record, options);
            acc
        })
        .finish(options)
}

/// Like [`aggregate`], splitting `records` across up to `workers` scoped
/// threads and merging their partial accumulators.
#[must_use]
pub fn aggregate_parallel(
    records: &[BusinessRecord],
    options: &AggregateOptions,
    workers: usize,
) -> NicheAggregate {
    let workers = workers.clamp(1, records.len().max(1));
    if workers == 1 {
        return aggregate(records, options);
    }
    let chunk_size = records.len().div_ceil(workers);

    let partials: Vec<NicheAccumulator> = std::thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    let mut acc = NicheAccumulator::new();
                    for record in chunk {
                        acc.push(record, options);
                    }
                    acc
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(acc) => acc,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    tracing::debug!(
        workers = partials.len(),
        records = records.len(),
        "merging partial niche accumulators"
    );

    partials
        .into_iter()
        .fold(NicheAccumulator::new(), NicheAccumulator::merge)
        .finish(options)
}

const fn tier_index(tier: OpportunityTier) -> usize {
    match tier {
        OpportunityTier::High => 0,
        OpportunityTier::Medium => 1,
        OpportunityTier::Low => 2,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rating_tenths(rating: f64) -> u64 {
    (rating.clamp(0.0, 5.0) * 10.0).round() as u64
}

/// Highest counts first; equal counts keep key order.
fn top_n<K: Copy + Ord>(
    counts: &BTreeMap<K, usize>,
    n: usize,
) -> impl Iterator<Item = (K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.iter().map(|(k, c)| (*k, *c)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().take(n)
}
