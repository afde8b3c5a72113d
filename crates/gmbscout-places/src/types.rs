//! Places API response types.
//!
//! Every response carries a top-level `status` string (`"OK"`,
//! `"ZERO_RESULTS"`, or an error code) and an optional `error_message`.
//! Only the fields the scoring pipeline reads are modelled.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// textsearch
// ---------------------------------------------------------------------------

/// Envelope for `textsearch/json`.
#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<PlaceSummary>,
}

/// One text-search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSummary {
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

// ---------------------------------------------------------------------------
// details
// ---------------------------------------------------------------------------

/// Envelope for `details/json`.
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

/// Listing details restricted to [`DETAILS_FIELDS`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<PlaceOpeningHours>,
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// Only counted; the reference is kept for completeness.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacePhoto {
    #[serde(default)]
    pub photo_reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceReview {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub text: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub time: Option<i64>,
}

/// Field mask sent with every details request.
pub const DETAILS_FIELDS: &str = "name,formatted_address,formatted_phone_number,website,\
opening_hours,photos,reviews,rating,user_ratings_total,url";
