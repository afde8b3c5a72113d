//! Record sourcing for the CLI: JSON input files or live API retrieval,
//! plus JSON report output.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use futures::stream::{self, StreamExt};
use gmbscout_core::{AppConfig, BusinessRecord, NicheConfig, NichesFile};
use gmbscout_places::{fetch_niche_records, FetchOptions, PlacesClient};
use serde::Serialize;

/// Records grouped by niche name, in name order.
pub(crate) type RecordsByNiche = BTreeMap<String, Vec<BusinessRecord>>;

/// Read a JSON object mapping niche name to an array of records.
pub(crate) fn read_records_by_niche(path: &Path) -> anyhow::Result<RecordsByNiche> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON object of niche -> records", path.display()))
}

/// Read a JSON array of records.
pub(crate) fn read_record_list(path: &Path) -> anyhow::Result<Vec<BusinessRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of records", path.display()))
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write output file {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Keep only `niche` when given; unknown names are an error.
pub(crate) fn select_niche(
    mut records: RecordsByNiche,
    niche: Option<&str>,
) -> anyhow::Result<RecordsByNiche> {
    let Some(wanted) = niche else {
        return Ok(records);
    };
    let (name, list) = records
        .remove_entry(wanted)
        .ok_or_else(|| anyhow::anyhow!("niche '{wanted}' not found in input"))?;
    Ok(BTreeMap::from([(name, list)]))
}

fn niches_to_fetch<'a>(
    file: &'a NichesFile,
    niche: Option<&str>,
) -> anyhow::Result<Vec<&'a NicheConfig>> {
    match niche {
        Some(wanted) => file
            .find(wanted)
            .map(|n| vec![n])
            .ok_or_else(|| anyhow::anyhow!("niche '{wanted}' not found in niches config")),
        None => Ok(file.niches.iter().collect()),
    }
}

/// Fetch records for the configured niches from the Places API.
///
/// Niches are fetched concurrently up to `max_concurrent_niches`.
pub(crate) async fn fetch_records(
    config: &AppConfig,
    niche: Option<&str>,
) -> anyhow::Result<RecordsByNiche> {
    let api_key = config.places_api_key.as_deref().ok_or_else(|| {
        anyhow::anyhow!("GOOGLE_PLACES_API_KEY is not set; pass --input to work offline")
    })?;
    let niches_file = gmbscout_core::load_niches(&config.niches_path)?;
    let selected = niches_to_fetch(&niches_file, niche)?;

    let client = PlacesClient::new(api_key, config.request_timeout_secs)?
        .with_retry(config.max_retries, config.retry_backoff_base_ms);
    let options = FetchOptions {
        sample_size: config.sample_size,
        max_per_category: config.max_per_category,
        inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
    };
    let max_concurrent = config.max_concurrent_niches.max(1);

    tracing::info!(
        niches = selected.len(),
        location = %config.location,
        max_concurrent,
        "fetching listings"
    );

    let client = &client;
    let options = &options;
    let location = config.location.as_str();
    let fetched: Vec<(String, Vec<BusinessRecord>)> = stream::iter(selected)
        .map(|n| async move {
            let records = fetch_niche_records(client, n, location, options).await;
            (n.name.clone(), records)
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    for (name, records) in &fetched {
        if records.is_empty() {
            tracing::warn!(niche = %name, "no listings retrieved");
        }
    }

    Ok(fetched.into_iter().collect())
}

/// Records from `input` when given, otherwise from the API.
pub(crate) async fn load_records(
    config: &AppConfig,
    niche: Option<&str>,
    input: Option<&Path>,
) -> anyhow::Result<RecordsByNiche> {
    match input {
        Some(path) => select_niche(read_records_by_niche(path)?, niche),
        None => fetch_records(config, niche).await,
    }
}
