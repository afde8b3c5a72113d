//! `find`: listings whose score sits inside a window, weakest first.

use std::path::Path;

use gmbscout_core::AppConfig;
use gmbscout_scoring::{find_opportunities, ClassifierConfig, ListingAssessment, ScoreWindow};
use serde::Serialize;

use crate::records::{load_records, write_json, RecordsByNiche};

#[derive(Debug, Serialize)]
pub(crate) struct NicheOpportunities {
    pub niche: String,
    pub listings: Vec<ListingAssessment>,
}

/// CLI bounds override the configured window.
pub(crate) fn resolve_window(
    config: &AppConfig,
    min_score: Option<u8>,
    max_score: Option<u8>,
) -> anyhow::Result<ScoreWindow> {
    Ok(ScoreWindow::new(
        min_score.unwrap_or(config.window_min),
        max_score.unwrap_or(config.window_max),
    )?)
}

pub(crate) fn collect_opportunities(
    records: &RecordsByNiche,
    window: ScoreWindow,
) -> Vec<NicheOpportunities> {
    let classifier = ClassifierConfig::default();
    records
        .iter()
        .map(|(niche, list)| NicheOpportunities {
            niche: niche.clone(),
            listings: find_opportunities(list, &classifier, window),
        })
        .collect()
}

fn print_opportunities(found: &[NicheOpportunities], window: ScoreWindow) {
    for group in found {
        println!(
            "{} ({} listings scoring {}-{})",
            group.niche,
            group.listings.len(),
            window.min(),
            window.max()
        );
        for a in &group.listings {
            println!(
                "  {:>3}  {:<6} {:<28} {}",
                a.score.total_score,
                a.classification.opportunity_level,
                a.classification.package_label,
                a.name
            );
            if !a.issue_messages.is_empty() {
                println!("       issues: {}", a.issue_messages.join("; "));
            }
        }
    }
}

pub(crate) async fn run_find(
    config: &AppConfig,
    niche: Option<&str>,
    input: Option<&Path>,
    min_score: Option<u8>,
    max_score: Option<u8>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let window = resolve_window(config, min_score, max_score)?;
    let records = load_records(config, niche, input).await?;
    let found = collect_opportunities(&records, window);

    let total: usize = found.iter().map(|g| g.listings.len()).sum();
    tracing::info!(total, min = window.min(), max = window.max(), "opportunities found");

    print_opportunities(&found, window);
    if let Some(path) = output {
        write_json(path, &found)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use gmbscout_core::{BusinessRecord, Environment};

    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            env: Environment::Test,
            log_level: "info".to_string(),
            niches_path: "config/niches.yaml".into(),
            places_api_key: None,
            location: "Berlin, Germany".to_string(),
            sample_size: 30,
            max_per_category: 20,
            request_timeout_secs: 30,
            inter_request_delay_ms: 0,
            max_retries: 0,
            retry_backoff_base_ms: 0,
            max_concurrent_niches: 1,
            window_min: 30,
            window_max: 70,
        }
    }

    #[test]
    fn cli_bounds_override_configured_window() {
        let cfg = config();
        let w = resolve_window(&cfg, Some(10), None).unwrap();
        assert_eq!((w.min(), w.max()), (10, 70));
        assert!(resolve_window(&cfg, Some(80), Some(20)).is_err());
    }

    #[test]
    fn opportunities_grouped_per_niche() {
        let in_window = BusinessRecord {
            name: Some("Mid".to_string()),
            photo_count: 5,
            review_count: 3,
            rating: 3.0,
            ..Default::default()
        };
        let records = RecordsByNiche::from([
            ("retail".to_string(), vec![in_window, BusinessRecord::default()]),
            ("services".to_string(), vec![]),
        ]);
        let found = collect_opportunities(&records, ScoreWindow::default());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].niche, "retail");
        assert_eq!(found[0].listings.len(), 1);
        assert_eq!(found[0].listings[0].name, "Mid");
        assert!(found[1].listings.is_empty());
    }
}
