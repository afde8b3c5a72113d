//! Raw listing data as delivered by the directory-API collaborator.

use serde::{Deserialize, Serialize};

/// One business listing as retrieved from the directory API.
///
/// Every field is optional or defaulted: the scorer treats absence as a
/// zero contribution, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub hours: Option<OpeningHours>,
    #[serde(default)]
    pub photo_count: u32,
    /// Average star rating; `0.0` when the listing has no ratings.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    /// Small sample of recent reviews. Only its presence is used.
    #[serde(default)]
    pub reviews: Vec<ReviewSample>,
    /// Public listing URL, carried through for reports.
    #[serde(default)]
    pub maps_url: Option<String>,
}

impl BusinessRecord {
    #[must_use]
    pub fn has_name(&self) -> bool {
        is_present(self.name.as_deref())
    }

    #[must_use]
    pub fn has_address(&self) -> bool {
        is_present(self.address.as_deref())
    }

    #[must_use]
    pub fn has_phone(&self) -> bool {
        is_present(self.phone.as_deref())
    }

    #[must_use]
    pub fn has_website(&self) -> bool {
        is_present(self.website.as_deref())
    }

    /// Hours count as present only when the structure carries some content.
    #[must_use]
    pub fn has_hours(&self) -> bool {
        self.hours.as_ref().is_some_and(|h| !h.is_empty())
    }

    /// Display name for logs and reports.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown")
    }
}

/// Structured opening hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    /// Human-readable lines such as `"Monday: 9:00 AM – 6:00 PM"`.
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

impl OpeningHours {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open_now.is_none() && self.weekday_text.is_empty()
    }
}

/// A single review entry from the listing's review sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSample {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub text: Option<String>,
    /// Unix timestamp (seconds) of the review.
    #[serde(default)]
    pub time: Option<i64>,
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_has_nothing() {
        let record = BusinessRecord::default();
        assert!(!record.has_name());
        assert!(!record.has_address());
        assert!(!record.has_phone());
        assert!(!record.has_website());
        assert!(!record.has_hours());
        assert_eq!(record.display_name(), "Unknown");
    }

    #[test]
    fn whitespace_only_fields_count_as_absent() {
        let record = BusinessRecord {
            name: Some("   ".to_string()),
            phone: Some(String::new()),
            ..Default::default()
        };
        assert!(!record.has_name());
        assert!(!record.has_phone());
        assert_eq!(record.display_name(), "Unknown");
    }

    #[test]
    fn empty_hours_structure_counts_as_absent() {
        let record = BusinessRecord {
            hours: Some(OpeningHours::default()),
            ..Default::default()
        };
        assert!(!record.has_hours());

        let record = BusinessRecord {
            hours: Some(OpeningHours {
                open_now: Some(true),
                weekday_text: vec![],
            }),
            ..Default::default()
        };
        assert!(record.has_hours());
    }

    #[test]
    fn deserializes_sparse_json() {
        let record: BusinessRecord =
            serde_json::from_str(r#"{"name": "Cafe Lumen", "photo_count": 3}"#).unwrap();
        assert_eq!(record.display_name(), "Cafe Lumen");
        assert_eq!(record.photo_count, 3);
        assert!(record.reviews.is_empty());
        assert!((record.rating - 0.0).abs() < f64::EPSILON);
    }
}
