//! Classify one URL against the corpus.

use console::style;

use sitecheck::{Classifier, ComparisonVerdict, Config, RoutingPolicy};

use crate::cli::icons::{alert, arrow, success, warning};

pub async fn cmd_check(config: &Config, url: &str, json: bool) -> anyhow::Result<()> {
    let classifier = Classifier::from_config(config);

    if !json {
        let route = RoutingPolicy::from_config(&config.privacy).classify_host(url);
        eprintln!("{} Checking {}", arrow(), style(url).cyan());
        eprintln!("  {} Route: {}", arrow(), route);
        eprintln!("  {} Corpus: {}", arrow(), config.data_dir.display());
    }

    let report = classifier.classify(url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for hit in &report.suspicious {
        println!("{} {}. Content might be suspicious.", warning(), hit);
    }

    match &report.verdict {
        ComparisonVerdict::Identical { .. } => {
            println!("{} {}", alert(), style(report.verdict.describe()).red().bold());
        }
        ComparisonVerdict::Clean => {
            println!("{} {}", success(), report.verdict.describe());
        }
        ComparisonVerdict::NoContent => {
            println!("{} {}", warning(), report.verdict.describe());
        }
    }
    eprintln!(
        "  {} {} files scanned",
        arrow(),
        style(report.files_scanned).dim()
    );

    Ok(())
}
