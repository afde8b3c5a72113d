//! Closed symbol sets shared by the scorer, classifier, and aggregator.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// A listing completeness score in `0..=100`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct Score(u8);

impl Score {
    pub const MAX: u32 = 100;

    /// # Errors
    ///
    /// Returns [`ScoringError::ScoreOutOfRange`] if `value` exceeds 100.
    pub fn new(value: u32) -> Result<Self, ScoringError> {
        u8::try_from(value)
            .ok()
            .filter(|v| u32::from(*v) <= Self::MAX)
            .map(Self)
            .ok_or(ScoringError::ScoreOutOfRange { score: value })
    }

    /// Clamp a raw point sum into range.
    #[must_use]
    pub fn clamped(raw: u32) -> Self {
        Self(u8::try_from(raw.min(Self::MAX)).unwrap_or(100))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for Score {
    type Error = ScoringError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for u32 {
    fn from(score: Score) -> Self {
        u32::from(score.0)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Named facts the scorer records about a listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    HasName,
    HasAddress,
    HasPhone,
    HasWebsite,
    HasHours,
    SufficientPhotos,
    SomePhotos,
    FewPhotos,
    ExcellentReviews,
    GoodReviews,
    AverageReviews,
    SomeReviews,
    DescriptionAssumed,
    SomeActivity,
}

/// A detected listing deficiency.
///
/// Declaration order is category order (phone, website, hours, photos,
/// reviews); the scorer emits issues in this order and frequency ties
/// break on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    MissingPhone,
    MissingWebsite,
    MissingHours,
    NoPhotos,
    FewPhotos,
    NoReviews,
    FewReviews,
}

impl Issue {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Issue::MissingPhone => "missing_phone",
            Issue::MissingWebsite => "missing_website",
            Issue::MissingHours => "missing_hours",
            Issue::NoPhotos => "no_photos",
            Issue::FewPhotos => "few_photos",
            Issue::NoReviews => "no_reviews",
            Issue::FewReviews => "few_reviews",
        }
    }

    /// Human-readable label without listing-specific counts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Issue::MissingPhone => "Missing phone number",
            Issue::MissingWebsite => "Missing website",
            Issue::MissingHours => "Missing business hours",
            Issue::NoPhotos => "No photos",
            Issue::FewPhotos => "Need more photos",
            Issue::NoReviews => "No reviews",
            Issue::FewReviews => "Need more reviews",
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A remediation action offered to the business, in priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Fix {
    AddHours,
    AddPhone,
    AddWebsite,
    AddPhotos,
    ImproveReviews,
}

impl Fix {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Fix::AddHours => "Add business hours",
            Fix::AddPhone => "Add phone number",
            Fix::AddWebsite => "Add website",
            Fix::AddPhotos => "Add more photos",
            Fix::ImproveReviews => "Improve review strategy",
        }
    }
}

impl std::fmt::Display for Fix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_new_accepts_bounds() {
        assert_eq!(Score::new(0).unwrap().value(), 0);
        assert_eq!(Score::new(100).unwrap().value(), 100);
    }

    #[test]
    fn score_new_rejects_above_100() {
        assert_eq!(
            Score::new(101),
            Err(ScoringError::ScoreOutOfRange { score: 101 })
        );
        assert_eq!(
            Score::new(1_000),
            Err(ScoringError::ScoreOutOfRange { score: 1_000 })
        );
    }

    #[test]
    fn score_clamped_saturates() {
        assert_eq!(Score::clamped(250).value(), 100);
        assert_eq!(Score::clamped(42).value(), 42);
    }

    #[test]
    fn score_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Score>("101").is_err());
        assert_eq!(serde_json::from_str::<Score>("55").unwrap().value(), 55);
    }

    #[test]
    fn symbols_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&Flag::SufficientPhotos).unwrap(),
            "\"sufficient_photos\""
        );
        assert_eq!(
            serde_json::to_string(&Issue::MissingHours).unwrap(),
            "\"missing_hours\""
        );
        assert_eq!(
            serde_json::to_string(&Fix::ImproveReviews).unwrap(),
            "\"improve_reviews\""
        );
    }

    #[test]
    fn issue_as_str_matches_serde_names() {
        for issue in [Issue::MissingPhone, Issue::FewReviews] {
            let json = serde_json::to_string(&issue).unwrap();
            assert_eq!(json.trim_matches('"'), issue.as_str());
        }
    }
}
