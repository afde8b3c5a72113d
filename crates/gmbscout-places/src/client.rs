//! HTTP client for the Places text-search and details endpoints.
//!
//! Wraps `reqwest` with API key handling, envelope status checks, and
//! retry on transient failures. Only the first page of search results is
//! read; `next_page_token` is ignored.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{
    DetailsResponse, PlaceDetails, PlaceSummary, TextSearchResponse, DETAILS_FIELDS,
};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

const TEXT_SEARCH_PATH: &str = "textsearch/json";
const DETAILS_PATH: &str = "details/json";

/// Client for the Places API.
///
/// Use [`PlacesClient::new`] for production or
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`PlacesError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("gmbscout/0.1 (listing-audit)")
            .build()?;

        // Exactly one trailing slash, so endpoint paths join beneath it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            max_retries: 3,
            backoff_base_ms: 1_000,
        })
    }

    /// Overrides the retry policy. `max_retries = 0` disables retries.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Runs a text search such as `"bakery in Berlin, Germany"`.
    ///
    /// `ZERO_RESULTS` yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] for any status other than `OK`/`ZERO_RESULTS`.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn text_search(&self, query: &str) -> Result<Vec<PlaceSummary>, PlacesError> {
        let url = self.build_url(TEXT_SEARCH_PATH, &[("query", query)])?;
        let context = format!("textsearch(query={query})");
        let response: TextSearchResponse = self.get_with_retry(&url, &context).await?;

        match response.status.as_str() {
            "OK" => Ok(response.results),
            "ZERO_RESULTS" => Ok(Vec::new()),
            _ => Err(PlacesError::Api {
                status: response.status,
                message: response.error_message,
            }),
        }
    }

    /// Fetches listing details for one place.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] if the status is not `OK` or the envelope
    ///   carries no `result`.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.build_url(
            DETAILS_PATH,
            &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
        )?;
        let context = format!("details(place_id={place_id})");
        let response: DetailsResponse = self.get_with_retry(&url, &context).await?;

        if response.status != "OK" {
            return Err(PlacesError::Api {
                status: response.status,
                message: response.error_message,
            });
        }
        response.result.ok_or_else(|| PlacesError::Api {
            status: response.status,
            message: Some(format!("no result for place_id {place_id}")),
        })
    }

    /// Builds an endpoint URL with percent-encoded query parameters; the
    /// API key is always appended last.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// GETs `url` and decodes the envelope. Retries transient failures,
    /// including an `OVER_QUERY_LIMIT` status inside a 200 response.
    async fn get_with_retry<T>(&self, url: &Url, context: &str) -> Result<T, PlacesError>
    where
        T: DeserializeOwned,
    {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let body = self.request_json(url).await?;
            Self::check_quota(&body)?;
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: context.to_owned(),
                source: e,
            })
        })
        .await
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON.
    ///
    /// The URL is stripped from HTTP errors since it carries the API key.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let response = response
            .error_for_status()
            .map_err(reqwest::Error::without_url)?;
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }

    /// Surfaces `OVER_QUERY_LIMIT` early so the retry loop sees it.
    fn check_quota(body: &serde_json::Value) -> Result<(), PlacesError> {
        if body.get("status").and_then(serde_json::Value::as_str) == Some("OVER_QUERY_LIMIT") {
            let message = body
                .get("error_message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned);
            return Err(PlacesError::Api {
                status: "OVER_QUERY_LIMIT".to_owned(),
                message,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
