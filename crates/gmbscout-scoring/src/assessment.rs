//! Per-listing assessment: identity, score, and classification together.

use gmbscout_core::BusinessRecord;
use serde::{Deserialize, Serialize};

use crate::aggregate::ScoreWindow;
use crate::classifier::{classify, Classification, ClassifierConfig};
use crate::scorer::{score_listing, ScoreResult};

/// Everything a report or outreach list needs about one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingAssessment {
    pub place_id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub maps_url: Option<String>,
    pub score: ScoreResult,
    pub classification: Classification,
    /// Rendered issue text, parallel to `score.issues`.
    pub issue_messages: Vec<String>,
}

/// Score and classify one listing.
#[must_use]
pub fn assess(record: &BusinessRecord, config: &ClassifierConfig) -> ListingAssessment {
    let score = score_listing(record);
    let classification = classify(&score, config);
    let issue_messages = score.issue_messages();
    ListingAssessment {
        place_id: record.place_id.clone(),
        name: record.display_name().to_string(),
        address: record.address.clone(),
        phone: record.phone.clone(),
        website: record.website.clone(),
        maps_url: record.maps_url.clone(),
        score,
        classification,
        issue_messages,
    }
}

/// Assess every record and keep those whose score falls inside `window`.
///
/// Results are ordered weakest listing first, ties broken by name then
/// place id, so the most urgent prospects lead the list.
#[must_use]
pub fn find_opportunities<'a, I>(
    records: I,
    config: &ClassifierConfig,
    window: ScoreWindow,
) -> Vec<ListingAssessment>
where
    I: IntoIterator<Item = &'a BusinessRecord>,
{
    let mut found: Vec<ListingAssessment> = records
        .into_iter()
        .map(|r| assess(r, config))
        .filter(|a| window.contains(a.score.total_score))
        .collect();
    found.sort_by(|a, b| {
        a.score
            .total_score
            .cmp(&b.score.total_score)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.place_id.cmp(&b.place_id))
    });
    tracing::debug!(
        found = found.len(),
        min = window.min(),
        max = window.max(),
        "listing opportunities within score window"
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::OpportunityTier;

    fn record(name: &str, photos: u32, reviews: u32, rating: f64) -> BusinessRecord {
        BusinessRecord {
            name: Some(name.to_string()),
            photo_count: photos,
            review_count: reviews,
            rating,
            ..Default::default()
        }
    }

    #[test]
    fn assess_carries_identity_and_messages() {
        let r = BusinessRecord {
            place_id: Some("pid-1".to_string()),
            phone: Some("030 1".to_string()),
            ..record("Friseur Klein", 2, 3, 4.2)
        };
        let a = assess(&r, &ClassifierConfig::default());
        assert_eq!(a.name, "Friseur Klein");
        assert_eq!(a.place_id.as_deref(), Some("pid-1"));
        assert_eq!(a.issue_messages.len(), a.score.issues.len());
        assert!(a
            .issue_messages
            .contains(&"Need more photos (2 currently)".to_string()));
    }

    #[test]
    fn find_opportunities_filters_and_sorts() {
        let records = vec![
            // 5 + 15 + 10 + 15 = 45
            record("B", 5, 3, 3.0),
            // 5 + 15 = 20 -> below window
            record("Z", 0, 0, 0.0),
            // 5 + 10 + 10 + 15 = 40
            record("A", 1, 1, 5.0),
            // 5 + 20 + 25 + 15 = 65
            record("C", 10, 30, 4.9),
        ];
        let window = ScoreWindow::new(30, 70).unwrap();
        let found = find_opportunities(&records, &ClassifierConfig::default(), window);
        let names: Vec<&str> = found.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(
            found[0].classification.opportunity_level,
            OpportunityTier::Medium
        );
        assert_eq!(found[2].classification.opportunity_level, OpportunityTier::Low);
    }

    #[test]
    fn find_opportunities_ties_break_by_name() {
        let records = vec![record("Zeta", 1, 1, 5.0), record("Alpha", 1, 1, 5.0)];
        let found = find_opportunities(
            &records,
            &ClassifierConfig::default(),
            ScoreWindow::default(),
        );
        assert_eq!(found[0].name, "Alpha");
        assert_eq!(found[1].name, "Zeta");
    }
}
