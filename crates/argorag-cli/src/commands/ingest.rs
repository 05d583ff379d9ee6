use anyhow::Result;
use argorag_core::config::AppConfig;
use argorag_ingest::depth::series_from_profile;
use argorag_ingest::{catalog, dataset, normalize, DatasetBuilder, DepthSeriesStore, MirrorFetcher};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

use crate::cli::IngestArgs;

pub async fn execute(args: IngestArgs, config: &AppConfig) -> Result<()> {
    let index_path = args.index_path.unwrap_or_else(|| config.ingest.index_path.clone());
    let entries = catalog::load_index(&index_path)?;

    let limit = args.limit.unwrap_or(entries.len()).min(entries.len());
    let entries = &entries[..limit];

    let fetcher = MirrorFetcher::new(&config.ingest)?;
    let builder = DatasetBuilder::new(&fetcher);

    let bar = ProgressBar::new(entries.len() as u64).with_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut records = Vec::new();
    let mut series = HashMap::new();
    let mut processed = 0usize;
    let mut skipped = 0usize;

    for entry in entries {
        bar.inc(1);
        if entry.file.is_empty() {
            continue;
        }
        bar.set_message(entry.file.clone());

        match builder.process_entry(entry).await {
            Ok(profile) => {
                records.extend(dataset::explode(entry, &profile));
                series.insert(entry.file.clone(), profile);
                processed += 1;
            }
            Err(error) => {
                tracing::warn!(file = %entry.file, %error, "skipping profile");
                skipped += 1;
            }
        }
    }
    bar.finish_and_clear();

    dataset::write_dataset(&records, &config.ingest.dataset_path)?;

    let normalized = normalize(&records);

    let depth_store = DepthSeriesStore::new(config.ingest.depth_dir.clone());
    let mut depth_files = 0usize;
    for profile in &normalized.profiles {
        if let Some(raw) = series.get(&profile.float_file) {
            depth_store.write(&series_from_profile(&profile.profile_id, raw))?;
            depth_files += 1;
        }
    }

    println!(
        "{} {} profiles processed, {} skipped",
        style("Ingested").green().bold(),
        processed,
        skipped
    );
    println!(
        "  {} rows -> {}",
        records.len(),
        config.ingest.dataset_path.display()
    );
    println!(
        "  {} unique profiles ({} rows dropped, {} duplicates), {} depth-series files -> {}",
        normalized.profiles.len(),
        normalized.dropped,
        normalized.duplicates,
        depth_files,
        config.ingest.depth_dir.display()
    );

    Ok(())
}
