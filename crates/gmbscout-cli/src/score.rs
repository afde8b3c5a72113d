//! `score`: offline assessment of a JSON array of records.

use std::path::Path;

use gmbscout_scoring::{assess, ClassifierConfig, Fix, ListingAssessment};

use crate::records::{read_record_list, write_json};

pub(crate) fn run_score(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let records = read_record_list(input)?;
    let config = ClassifierConfig::default();
    let assessments: Vec<ListingAssessment> =
        records.iter().map(|r| assess(r, &config)).collect();
    tracing::info!(records = assessments.len(), "records scored");

    for a in &assessments {
        let fixes: Vec<&str> = a
            .classification
            .priority_fixes
            .iter()
            .copied()
            .map(Fix::label)
            .collect();
        println!(
            "{:>3}  {:<6} {:<28} {}",
            a.score.total_score,
            a.classification.opportunity_level,
            a.classification.package_label,
            a.name
        );
        if !fixes.is_empty() {
            println!("       fixes: {}", fixes.join(", "));
        }
    }

    if let Some(path) = output {
        write_json(path, &assessments)?;
    }
    Ok(())
}
