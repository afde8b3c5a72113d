//! Listing scoring and niche ranking pipeline.
//!
//! Scores a directory listing's completeness on a fixed 0-100 rubric,
//! classifies the sales opportunity into a priced tier, aggregates those
//! results per niche, and ranks niches by a weighted opportunity score.
//! Everything here is pure and synchronous; retrieval lives in
//! `gmbscout-places`.

pub mod aggregate;
pub mod assessment;
pub mod classifier;
pub mod error;
pub mod rank;
pub mod scorer;
pub mod types;

pub use aggregate::{
    aggregate, aggregate_parallel, AggregateOptions, FixFrequency, IssueFrequency,
    NicheAccumulator, NicheAggregate, ScoreWindow,
};
pub use assessment::{assess, find_opportunities, ListingAssessment};
pub use classifier::{
    classify, priority_fixes, Classification, ClassifierConfig, OpportunityTier, Package,
    PriceTable,
};
pub use error::ScoringError;
pub use rank::{opportunity_score, rank_niches, recommend, NicheRanking, Recommendation};
pub use scorer::{score_listing, ScoreResult};
pub use types::{Fix, Flag, Issue, Score};
