//! `analyze`: aggregate each niche, rank them, print a summary.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::Path;

use chrono::{DateTime, Utc};
use gmbscout_core::AppConfig;
use gmbscout_scoring::{
    aggregate_parallel, rank_niches, AggregateOptions, ClassifierConfig, Issue, NicheAggregate,
    NicheRanking, Package, PriceTable, ScoreWindow,
};
use serde::Serialize;

use crate::records::{load_records, write_json, RecordsByNiche};

/// JSON report written by `analyze --output`.
#[derive(Debug, Serialize)]
pub(crate) struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub aggregates: BTreeMap<String, NicheAggregate>,
    pub rankings: Vec<NicheRanking>,
}

pub(crate) fn aggregate_options(config: &AppConfig) -> anyhow::Result<AggregateOptions> {
    Ok(AggregateOptions {
        classifier: ClassifierConfig::default(),
        opportunity_window: ScoreWindow::new(config.window_min, config.window_max)?,
        ..AggregateOptions::default()
    })
}

pub(crate) fn build_report(
    records: &RecordsByNiche,
    options: &AggregateOptions,
) -> AnalysisReport {
    let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let aggregates: BTreeMap<String, NicheAggregate> = records
        .iter()
        .map(|(niche, list)| {
            let agg = aggregate_parallel(list, options, workers);
            tracing::info!(
                niche = %niche,
                total = agg.total_businesses,
                opportunities = agg.opportunities,
                revenue_potential = agg.revenue_potential,
                "niche aggregated"
            );
            (niche.clone(), agg)
        })
        .collect();
    let rankings = rank_niches(&aggregates);
    AnalysisReport {
        generated_at: Utc::now(),
        aggregates,
        rankings,
    }
}

/// One-line description of the tier thresholds and their packages.
fn tier_legend(classifier: &ClassifierConfig) -> String {
    let prices = classifier.prices();
    format!(
        "tiers: HIGH < {} -> {}, MEDIUM < {} -> {}, LOW -> {}",
        classifier.high_below(),
        prices.label(Package::Premium),
        classifier.medium_below(),
        prices.label(Package::Standard),
        prices.label(Package::Basic),
    )
}

fn package_mix(aggregate: &NicheAggregate, prices: &PriceTable) -> String {
    aggregate
        .package_counts()
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|&(package, count)| format!("{count} x {}", prices.label(package)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_summary(report: &AnalysisReport, classifier: &ClassifierConfig) {
    if report.rankings.is_empty() {
        println!("no niches with listings to rank");
        return;
    }
    println!(
        "{:<4} {:<20} {:>7} {:>6} {:>6} {:>5} {:>9} {:>6}  recommendation",
        "rank", "niche", "score", "total", "opps", "high", "revenue", "avg"
    );
    for r in &report.rankings {
        println!(
            "{:<4} {:<20} {:>7.1} {:>6} {:>6} {:>5} {:>8}€ {:>6.1}  {}",
            r.rank,
            r.niche,
            r.opportunity_score,
            r.total_businesses,
            r.opportunities,
            r.high_opportunity,
            r.revenue_potential,
            r.avg_score,
            r.recommendation
        );
    }
    if let Some(best) = report.rankings.first() {
        let issues: Vec<&str> = best.top_issues.iter().copied().map(Issue::label).collect();
        println!();
        println!(
            "best niche: {} ({:.1}% in opportunity window); top issues: {}",
            best.niche,
            best.opportunity_percentage,
            if issues.is_empty() {
                "none".to_string()
            } else {
                issues.join(", ")
            }
        );
        if let Some(aggregate) = report.aggregates.get(&best.niche) {
            println!("packages: {}", package_mix(aggregate, classifier.prices()));
        }
    }
    println!("{}", tier_legend(classifier));
}

pub(crate) async fn run_analyze(
    config: &AppConfig,
    niche: Option<&str>,
    input: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let options = aggregate_options(config)?;
    let records = load_records(config, niche, input).await?;
    let report = build_report(&records, &options);

    print_summary(&report, &options.classifier);
    if let Some(path) = output {
        write_json(path, &report)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use gmbscout_core::BusinessRecord;
    use gmbscout_scoring::Recommendation;

    use super::*;

    fn weak(name: &str) -> BusinessRecord {
        BusinessRecord {
            name: Some(name.to_string()),
            review_count: 3,
            rating: 3.0,
            ..Default::default()
        }
    }

    fn strong(name: &str) -> BusinessRecord {
        BusinessRecord {
            name: Some(name.to_string()),
            address: Some("Berlin".to_string()),
            phone: Some("030".to_string()),
            website: Some("https://x.example".to_string()),
            photo_count: 15,
            review_count: 40,
            rating: 4.8,
            ..Default::default()
        }
    }

    #[test]
    fn report_ranks_weaker_niche_first_and_skips_empty() {
        let records = RecordsByNiche::from([
            ("cafes".to_string(), vec![weak("a"), weak("b"), weak("c")]),
            ("lawyers".to_string(), vec![strong("x"), strong("y")]),
            ("plumbers".to_string(), vec![]),
        ]);
        let report = build_report(&records, &AggregateOptions::default());

        assert_eq!(report.aggregates.len(), 3);
        assert!(report.aggregates["plumbers"].is_empty());
        let ranked: Vec<&str> = report.rankings.iter().map(|r| r.niche.as_str()).collect();
        assert_eq!(ranked, vec!["cafes", "lawyers"]);
        assert_eq!(report.aggregates["cafes"].high_opportunity, 3);
        assert_eq!(report.rankings[1].recommendation, Recommendation::Saturated);
    }

    #[test]
    fn tier_legend_lists_thresholds_and_prices() {
        assert_eq!(
            tier_legend(&ClassifierConfig::default()),
            "tiers: HIGH < 40 -> Premium Package (€700), MEDIUM < 60 -> Standard Package (€400), \
             LOW -> Basic Package (€200)"
        );
    }

    #[test]
    fn package_mix_skips_unused_packages() {
        let records = RecordsByNiche::from([(
            "cafes".to_string(),
            vec![weak("a"), weak("b"), strong("x")],
        )]);
        let report = build_report(&records, &AggregateOptions::default());
        assert_eq!(
            package_mix(&report.aggregates["cafes"], &PriceTable::default()),
            "2 x Premium Package (€700), 1 x Basic Package (€200)"
        );
    }

    #[test]
    fn report_serializes_expected_top_level_keys() {
        let records = RecordsByNiche::from([("cafes".to_string(), vec![weak("a")])]);
        let report = build_report(&records, &AggregateOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        for key in ["generated_at", "aggregates", "rankings"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
