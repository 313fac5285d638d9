//! Corpus inventory.

use std::path::Path;

use console::style;
use serde::Serialize;

use sitecheck::{Config, CorpusWalker, InventoryItem, TextExtractor};

use crate::cli::icons::{alert, success, warning};

#[derive(Serialize)]
struct ScanOutput<'a> {
    data_dir: &'a Path,
    has_data: bool,
    files: &'a [InventoryItem],
}

pub fn cmd_scan(config: &Config, json: bool) -> anyhow::Result<()> {
    let root = config.data_dir.as_path();
    if !root.is_dir() {
        anyhow::bail!("Data directory '{}' not found", root.display());
    }

    let extractor = TextExtractor::from_config(&config.extraction);
    let inventory = CorpusWalker::new(root, &extractor).inventory();

    if json {
        let output = ScanOutput {
            data_dir: root,
            has_data: inventory.has_data(),
            files: &inventory.items,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for item in &inventory.items {
        let name = item.path.strip_prefix(root).unwrap_or(&item.path);
        if item.has_text() {
            println!(
                "{} Data collected from {} {}",
                success(),
                name.display(),
                style(format!("({}, {} chars)", item.kind, item.chars)).dim()
            );
        } else {
            println!(
                "{} No text in {} {}",
                warning(),
                name.display(),
                style(format!("({})", item.kind)).dim()
            );
        }
    }

    if !inventory.has_data() {
        println!("{} No data found in {}", alert(), root.display());
    }

    Ok(())
}
