use thiserror::Error;

/// Errors raised by the scoring pipeline.
///
/// None of these are runtime conditions of well-formed input: they signal an
/// invalid configuration or a broken invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("score {score} is outside the range 0..=100")]
    ScoreOutOfRange { score: u32 },

    #[error(
        "invalid tier thresholds: high_below={high_below} must not exceed medium_below={medium_below}, and both must be <= 100"
    )]
    InvalidThresholds { high_below: u8, medium_below: u8 },

    #[error("invalid score window {min}..={max}: min must not exceed max and max must be <= 100")]
    InvalidWindow { min: u8, max: u8 },
}
