//! Mapping of Places API details into [`BusinessRecord`]s.

use gmbscout_core::{BusinessRecord, OpeningHours, ReviewSample};

use crate::types::{PlaceDetails, PlaceReview};

/// Trim a string and drop it if nothing is left.
fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn review_sample(review: &PlaceReview) -> ReviewSample {
    ReviewSample {
        author_name: non_blank(review.author_name.as_ref()),
        rating: review.rating,
        text: non_blank(review.text.as_ref()),
        time: review.time,
    }
}

/// Converts API details for `place_id` into a scoring input.
///
/// Absent or blank strings become `None`, a missing rating becomes `0.0`,
/// and photos are reduced to a count.
#[must_use]
pub fn normalize_details(place_id: &str, details: &PlaceDetails) -> BusinessRecord {
    let hours = details.opening_hours.as_ref().map(|h| OpeningHours {
        open_now: h.open_now,
        weekday_text: h.weekday_text.clone(),
    });

    BusinessRecord {
        place_id: Some(place_id.to_owned()),
        name: non_blank(details.name.as_ref()),
        address: non_blank(details.formatted_address.as_ref()),
        phone: non_blank(details.formatted_phone_number.as_ref()),
        website: non_blank(details.website.as_ref()),
        hours,
        photo_count: u32::try_from(details.photos.len()).unwrap_or(u32::MAX),
        rating: details.rating.unwrap_or(0.0),
        review_count: details.user_ratings_total.unwrap_or(0),
        reviews: details.reviews.iter().map(review_sample).collect(),
        maps_url: non_blank(details.url.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlaceOpeningHours, PlacePhoto};

    #[test]
    fn empty_details_produce_empty_record() {
        let record = normalize_details("pid", &PlaceDetails::default());
        assert_eq!(record.place_id.as_deref(), Some("pid"));
        assert!(!record.has_name());
        assert!(!record.has_hours());
        assert_eq!(record.photo_count, 0);
        assert!(record.rating.abs() < f64::EPSILON);
        assert_eq!(record.review_count, 0);
        assert!(record.reviews.is_empty());
    }

    #[test]
    fn full_details_map_every_field() {
        let details = PlaceDetails {
            name: Some("  Café Lindner ".to_string()),
            formatted_address: Some("Oranienstr. 1, Berlin".to_string()),
            formatted_phone_number: Some("030 1234567".to_string()),
            website: Some("https://lindner.example".to_string()),
            opening_hours: Some(PlaceOpeningHours {
                open_now: Some(true),
                weekday_text: vec!["Monday: 8:00 AM – 6:00 PM".to_string()],
            }),
            photos: vec![PlacePhoto::default(); 7],
            reviews: vec![PlaceReview {
                author_name: Some("Jo".to_string()),
                rating: Some(5),
                text: Some("Great".to_string()),
                time: Some(1_700_000_000),
            }],
            rating: Some(4.6),
            user_ratings_total: Some(212),
            url: Some("https://maps.example/?cid=1".to_string()),
        };
        let record = normalize_details("pid-9", &details);
        assert_eq!(record.name.as_deref(), Some("Café Lindner"));
        assert!(record.has_phone());
        assert!(record.has_website());
        assert!(record.has_hours());
        assert_eq!(record.photo_count, 7);
        assert!((record.rating - 4.6).abs() < f64::EPSILON);
        assert_eq!(record.review_count, 212);
        assert_eq!(record.reviews.len(), 1);
        assert_eq!(record.reviews[0].rating, Some(5));
        assert_eq!(record.maps_url.as_deref(), Some("https://maps.example/?cid=1"));
    }

    #[test]
    fn blank_strings_become_none() {
        let details = PlaceDetails {
            formatted_phone_number: Some("   ".to_string()),
            website: Some(String::new()),
            ..Default::default()
        };
        let record = normalize_details("pid", &details);
        assert!(record.phone.is_none());
        assert!(record.website.is_none());
    }

    #[test]
    fn empty_opening_hours_object_does_not_count() {
        let details = PlaceDetails {
            opening_hours: Some(PlaceOpeningHours::default()),
            ..Default::default()
        };
        let record = normalize_details("pid", &details);
        assert!(record.hours.is_some());
        assert!(!record.has_hours());
    }
}
