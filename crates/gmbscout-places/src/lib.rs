//! Directory listing retrieval for gmbscout.
//!
//! A thin Places API client: text search, details lookup, retry with
//! back-off, and normalization into [`gmbscout_core::BusinessRecord`].

pub mod client;
pub mod error;
pub mod fetch;
pub mod normalize;
mod retry;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use fetch::{fetch_category_records, fetch_niche_records, FetchOptions};
pub use normalize::normalize_details;
pub use types::{PlaceDetails, PlaceSummary};
