use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::task;
use tracing::{info, warn};

use crate::{
    cli::create_progress_bar,
    config::ConvertConfig,
    error::StationError,
    pipeline::{normalise_station, StationReport},
    reading::{read_monthly_rows, StationFile},
    series::write_series,
};

use super::{list_files, print_failures, Failure};

#[derive(Debug)]
pub struct ConvertedStation {
    pub station: String,
    pub output: PathBuf,
    pub report: StationReport,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub converted: Vec<ConvertedStation>,
    pub failed: Vec<Failure>,
}

impl BatchSummary {
    pub fn print(&self) {
        let corrupted: usize = self.converted.iter().map(|c| c.report.corrupted).sum();
        let duplicates: usize = self.converted.iter().map(|c| c.report.duplicates).sum();
        let collisions: usize = self.converted.iter().map(|c| c.report.collisions).sum();

        println!(
            "Converted {} station(s): {} duplicate row(s) resolved, {} corrupted row(s) dropped, {} date collision(s)",
            self.converted.len(),
            duplicates,
            corrupted,
            collisions
        );
        for converted in &self.converted {
            let r = &converted.report;
            if r.corrupted + r.unparseable_anchors + r.collisions > 0 {
                println!(
                    "  {:<10} {} corrupted, {} undated, {} collisions, {} outside period, {} of {} rows kept",
                    converted.station,
                    r.corrupted,
                    r.unparseable_anchors,
                    r.collisions,
                    r.out_of_period,
                    r.rows_read - r.duplicates - r.corrupted - r.unparseable_anchors,
                    r.rows_read
                );
            }
        }
        print_failures(&self.failed);
    }
}

pub async fn convert(config: ConvertConfig) -> Result<BatchSummary> {
    fs::create_dir_all(&config.output_folder)
        .with_context(|| format!("creating {}", config.output_folder.display()))?;

    let files = list_files(&config.data_folder, None)?;
    let (stations, mut failed) = identify_stations(&files);
    info!(
        stations = stations.len(),
        start = %config.period.start(),
        end = %config.period.end(),
        "converting"
    );

    let pb = create_progress_bar(stations.len() as u64, "Converting stations".to_string());
    let config = Arc::new(config);

    let tasks: Vec<_> = stations
        .iter()
        .cloned()
        .map(|station| {
            let config = Arc::clone(&config);
            let pb = pb.clone();
            task::spawn_blocking(move || {
                let outcome = convert_station(&station, &config);
                pb.inc(1);
                outcome
            })
        })
        .collect();

    let mut summary = BatchSummary::default();
    for (station, result) in stations.iter().zip(join_all(tasks).await) {
        let outcome = result.map_err(|e| e.to_string()).and_then(|r| r.map_err(|e| e.to_string()));
        match outcome {
            Ok(converted) => summary.converted.push(converted),
            Err(reason) => {
                warn!(station = %station.id, %reason, "station skipped");
                failed.push(Failure {
                    name: station.id.clone(),
                    reason,
                });
            }
        }
    }
    pb.finish_with_message("Conversion complete");

    failed.sort();
    summary.failed = failed;

    Ok(summary)
}

/// Runs one station file through the pipeline and writes its CSV.
pub fn convert_station(
    station: &StationFile,
    config: &ConvertConfig,
) -> Result<ConvertedStation, StationError> {
    let rows = read_monthly_rows(&station.path, config.header_lines)?;
    let (series, report) = normalise_station(&station.id, &rows, &config.period);
    let output = write_series(&series, &config.output_folder)?;

    info!(
        station = %station.id,
        rows = report.rows_read,
        corrupted = report.corrupted,
        invalid_dates = report.invalid_dates,
        observed = report.observed_days,
        output = %output.display(),
        "converted"
    );

    Ok(ConvertedStation {
        station: station.id.clone(),
        output,
        report,
    })
}

// Two files for one station would race for the same output, so only the
// first by name is kept.
fn identify_stations(files: &[PathBuf]) -> (Vec<StationFile>, Vec<Failure>) {
    let mut stations = Vec::new();
    let mut failed = Vec::new();
    let mut seen = HashSet::new();

    for path in files {
        match StationFile::from_path(path) {
            Ok(station) if seen.insert(station.id.clone()) => stations.push(station),
            Ok(station) => failed.push(Failure {
                name: file_name(path),
                reason: format!("another file already provides station {}", station.id),
            }),
            Err(e) => failed.push(Failure {
                name: file_name(path),
                reason: e.to_string(),
            }),
        }
    }

    (stations, failed)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// -- Tests -------------------------------------------------------------------
