use thiserror::Error;

/// Errors returned by the Places API client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a `status` other than `OK` or `ZERO_RESULTS`.
    #[error("Places API error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: String,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl PlacesError {
    /// `true` when the API reported that the request quota is exhausted.
    #[must_use]
    pub fn is_over_query_limit(&self) -> bool {
        matches!(self, PlacesError::Api { status, .. } if status == "OVER_QUERY_LIMIT")
    }
}
