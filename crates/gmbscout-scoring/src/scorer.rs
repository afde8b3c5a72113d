//! Completeness rubric for a single directory listing.
//!
//! The directory API exposes no free-text description or posting activity,
//! so the description/activity category awards a flat nominal amount plus a
//! bonus when any review sample is present. Treat that category as coarse.

use std::collections::BTreeSet;

use gmbscout_core::BusinessRecord;
use serde::{Deserialize, Serialize};

use crate::types::{Flag, Issue, Score};

// ---------------------------------------------------------------------------
// Category maxima (must sum to exactly 100)
// ---------------------------------------------------------------------------

pub const W_NAME: u32 = 5;
pub const W_ADDRESS: u32 = 5;
pub const W_PHONE: u32 = 5;
pub const W_WEBSITE: u32 = 5;
pub const W_HOURS: u32 = 5;
pub const W_PHOTOS: u32 = 20;
pub const W_REVIEWS: u32 = 25;
/// Description and activity, neither observable through the directory API.
pub const W_DESCRIPTION_ACTIVITY: u32 = 30;

const _: () = assert!(
    W_NAME + W_ADDRESS + W_PHONE + W_WEBSITE + W_HOURS + W_PHOTOS + W_REVIEWS
        + W_DESCRIPTION_ACTIVITY
        == 100,
    "listing category weights must sum to exactly 100"
);

/// Flat award for the unobservable description.
pub const DESCRIPTION_ASSUMED_POINTS: u32 = 15;
/// Award when the listing carries any review sample.
pub const ACTIVITY_POINTS: u32 = 10;

const _: () = assert!(
    DESCRIPTION_ASSUMED_POINTS + ACTIVITY_POINTS <= W_DESCRIPTION_ACTIVITY,
    "description/activity awards must fit inside their category"
);

/// `(minimum photos, points, flag)`, best tier first.
const PHOTO_TIERS: &[(u32, u32, Flag)] = &[
    (10, 20, Flag::SufficientPhotos),
    (5, 15, Flag::SomePhotos),
    (1, 10, Flag::FewPhotos),
];

/// `(minimum rating, minimum review count, points, flag)`, best tier first.
const REVIEW_TIERS: &[(f64, u32, u32, Flag)] = &[
    (4.5, 20, 25, Flag::ExcellentReviews),
    (4.0, 10, 20, Flag::GoodReviews),
    (3.5, 5, 15, Flag::AverageReviews),
    (0.0, 1, 10, Flag::SomeReviews),
];

/// Below this many photos a "need more photos" issue is raised.
pub const FEW_PHOTOS_THRESHOLD: u32 = 8;
/// Below this many reviews a "need more reviews" issue is raised.
pub const FEW_REVIEWS_THRESHOLD: u32 = 10;

/// Scoring outcome for one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total_score: Score,
    pub category_flags: BTreeSet<Flag>,
    /// Deficiencies in category order.
    pub issues: Vec<Issue>,
    pub photo_count: u32,
    pub rating: f64,
    pub review_count: u32,
}

impl ScoreResult {
    #[must_use]
    pub fn has(&self, flag: Flag) -> bool {
        self.category_flags.contains(&flag)
    }

    /// Issue text as shown to the business, including current counts.
    #[must_use]
    pub fn issue_messages(&self) -> Vec<String> {
        self.issues
            .iter()
            .map(|issue| match issue {
                Issue::FewPhotos => {
                    format!("Need more photos ({} currently)", self.photo_count)
                }
                Issue::FewReviews => {
                    format!("Need more reviews ({} currently)", self.review_count)
                }
                other => other.label().to_string(),
            })
            .collect()
    }
}

/// Score a listing's completeness on the 0-100 rubric.
///
/// Absent fields contribute zero; this never fails. A listing with nothing
/// set scores [`DESCRIPTION_ASSUMED_POINTS`].
#[must_use]
pub fn score_listing(record: &BusinessRecord) -> ScoreResult {
    let mut points = 0u32;
    let mut flags = BTreeSet::new();
    let mut issues = Vec::new();

    if record.has_name() {
        points += W_NAME;
        flags.insert(Flag::HasName);
    }
    if record.has_address() {
        points += W_ADDRESS;
        flags.insert(Flag::HasAddress);
    }
    if record.has_phone() {
        points += W_PHONE;
        flags.insert(Flag::HasPhone);
    } else {
        issues.push(Issue::MissingPhone);
    }
    if record.has_website() {
        points += W_WEBSITE;
        flags.insert(Flag::HasWebsite);
    } else {
        issues.push(Issue::MissingWebsite);
    }
    if record.has_hours() {
        points += W_HOURS;
        flags.insert(Flag::HasHours);
    } else {
        issues.push(Issue::MissingHours);
    }

    let photo_count = record.photo_count;
    match PHOTO_TIERS.iter().find(|(min, _, _)| photo_count >= *min) {
        Some(&(_, award, flag)) => {
            points += award;
            flags.insert(flag);
        }
        None => issues.push(Issue::NoPhotos),
    }
    if photo_count < FEW_PHOTOS_THRESHOLD {
        issues.push(Issue::FewPhotos);
    }

    let rating = sanitize_rating(record.rating);
    let review_count = record.review_count;
    match REVIEW_TIERS
        .iter()
        .find(|(min_rating, min_count, _, _)| rating >= *min_rating && review_count >= *min_count)
    {
        Some(&(_, _, award, flag)) => {
            points += award;
            flags.insert(flag);
        }
        None => issues.push(Issue::NoReviews),
    }
    if review_count < FEW_REVIEWS_THRESHOLD {
        issues.push(Issue::FewReviews);
    }

    points += DESCRIPTION_ASSUMED_POINTS;
    flags.insert(Flag::DescriptionAssumed);
    if !record.reviews.is_empty() {
        points += ACTIVITY_POINTS;
        flags.insert(Flag::SomeActivity);
    }

    ScoreResult {
        total_score: Score::clamped(points),
        category_flags: flags,
        issues,
        photo_count,
        rating,
        review_count,
    }
}

/// Non-finite or negative ratings are treated as "no rating".
fn sanitize_rating(rating: f64) -> f64 {
    if rating.is_finite() {
        rating.clamp(0.0, 5.0)
    } else {
        0.0
    }
}
