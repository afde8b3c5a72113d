//! Search-then-details retrieval for categories and whole niches.
//!
//! Every API call is followed by a fixed pause so a run stays under the
//! provider's per-second limits. Listings whose details lookup fails are
//! logged and dropped; they never reach scoring.

use std::collections::HashSet;
use std::time::Duration;

use gmbscout_core::{BusinessRecord, NicheConfig};

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::normalize::normalize_details;
use crate::types::PlaceSummary;

/// Limits for one niche retrieval.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Records kept per niche across all of its categories.
    pub sample_size: usize,
    /// Search hits looked up per category.
    pub max_per_category: usize,
    /// Pause after every API call.
    pub inter_request_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            sample_size: 30,
            max_per_category: 20,
            inter_request_delay: Duration::from_millis(500),
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Looks up details for up to `max_results` hits not already in `seen`,
/// recording each attempted id.
async fn fetch_details_for(
    client: &PlacesClient,
    hits: &[PlaceSummary],
    max_results: usize,
    delay: Duration,
    seen: &mut HashSet<String>,
) -> Vec<BusinessRecord> {
    let fresh: Vec<&PlaceSummary> = hits
        .iter()
        .filter(|hit| seen.insert(hit.place_id.clone()))
        .take(max_results)
        .collect();

    let mut records = Vec::with_capacity(fresh.len());
    for hit in fresh {
        match client.place_details(&hit.place_id).await {
            Ok(details) => records.push(normalize_details(&hit.place_id, &details)),
            Err(e) => {
                tracing::warn!(
                    place_id = %hit.place_id,
                    name = hit.name.as_deref().unwrap_or("unknown"),
                    error = %e,
                    "dropping listing after failed details lookup"
                );
            }
        }
        pause(delay).await;
    }
    records
}

/// Searches `query` and looks up details for up to `max_results` hits.
///
/// # Errors
///
/// Returns the search error if the text search itself fails. Failed
/// details lookups are skipped with a warning.
pub async fn fetch_category_records(
    client: &PlacesClient,
    query: &str,
    max_results: usize,
    delay: Duration,
) -> Result<Vec<BusinessRecord>, PlacesError> {
    let hits = client.text_search(query).await?;
    pause(delay).await;

    let mut seen = HashSet::new();
    let records = fetch_details_for(client, &hits, max_results, delay, &mut seen).await;
    tracing::debug!(query, found = hits.len(), kept = records.len(), "category fetched");
    Ok(records)
}

/// Share of the niche sample assigned to the category at `index`.
///
/// The sample is split evenly; the first `sample_size % categories`
/// categories take one extra listing each. Each share is capped at
/// `max_per_category`.
fn category_quota(options: &FetchOptions, categories: usize, index: usize) -> usize {
    if categories == 0 {
        return 0;
    }
    let base = options.sample_size / categories;
    let extra = usize::from(index < options.sample_size % categories);
    (base + extra).min(options.max_per_category)
}

/// Collects up to `options.sample_size` distinct listings for a niche,
/// spreading the sample across its categories.
///
/// Listings already seen under an earlier category are skipped before any
/// details lookup. A category whose search fails is logged and skipped, so
/// the result may be short or empty.
pub async fn fetch_niche_records(
    client: &PlacesClient,
    niche: &NicheConfig,
    location: &str,
    options: &FetchOptions,
) -> Vec<BusinessRecord> {
    let mut records: Vec<BusinessRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let category_count = niche.categories.len();

    for (index, category) in niche.categories.iter().enumerate() {
        let limit = category_quota(options, category_count, index);
        if limit == 0 {
            continue;
        }
        let query = NicheConfig::search_query(category, location);
        let hits = match client.text_search(&query).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(
                    niche = %niche.name,
                    category = %category,
                    error = %e,
                    "category search failed, skipping"
                );
                pause(options.inter_request_delay).await;
                continue;
            }
        };
        pause(options.inter_request_delay).await;

        let batch =
            fetch_details_for(client, &hits, limit, options.inter_request_delay, &mut seen).await;
        tracing::debug!(
            niche = %niche.name,
            category = %category,
            quota = limit,
            found = hits.len(),
            kept = batch.len(),
            "category fetched"
        );
        records.extend(batch);
    }

    tracing::info!(niche = %niche.name, records = records.len(), "niche fetched");
    records
}
