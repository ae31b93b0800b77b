use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::{
    cli::{create_progress_bar, ExportArgs},
    metadata::StationLookup,
    parquet::{save_discharge, DischargeTable, StationColumn},
    series::{read_series, Observation},
};

use super::{list_files, print_failures, Failure};

#[derive(Debug, Default)]
pub struct ExportSummary {
    pub exported: usize,
    pub failed: Vec<Failure>,
}

impl ExportSummary {
    pub fn print(&self, output: &Path) {
        println!(
            "Exported {} station(s) to `{}`",
            self.exported,
            output.display()
        );
        print_failures(&self.failed);
    }
}

pub async fn export(args: &ExportArgs) -> Result<ExportSummary> {
    let lookup = StationLookup::from_path(&args.metadata)?;
    if lookup.is_empty() {
        warn!(path = %args.metadata.display(), "station metadata has no usable rows");
    } else {
        info!(stations = lookup.len(), "loaded station metadata");
    }

    let files = list_files(&args.csv_folder, Some("csv"))?;
    let pb = create_progress_bar(files.len() as u64, "Reading station series".to_string());

    let mut series = Vec::new();
    let mut failed = Vec::new();
    for path in &files {
        let station = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        match read_series(path) {
            Ok(observations) => series.push((station, observations)),
            Err(e) => failed.push(Failure {
                name: station,
                reason: e.to_string(),
            }),
        }
        pb.inc(1);
    }
    pb.finish_with_message("Series read");

    let (table, skipped) = assemble(series, &lookup);
    failed.extend(skipped);
    for failure in &failed {
        warn!(station = %failure.name, reason = %failure.reason, "station not exported");
    }

    save_discharge(&table, &args.output)?;

    Ok(ExportSummary {
        exported: table.stations.len(),
        failed,
    })
}

/// Lines the stations up on the date axis of the first usable one. Stations
/// without coordinates or with a different axis are left out.
pub fn assemble(
    series: Vec<(String, Vec<Observation>)>,
    lookup: &StationLookup,
) -> (DischargeTable, Vec<Failure>) {
    let mut table = DischargeTable::default();
    let mut failed = Vec::new();
    let mut axis_set = false;

    for (station, observations) in series {
        let Some(coords) = lookup.get(&station) else {
            failed.push(Failure {
                name: station,
                reason: "no coordinates in station metadata".to_string(),
            });
            continue;
        };

        let dates: Vec<_> = observations.iter().map(|o| o.date).collect();
        if !axis_set {
            table.dates = dates;
            axis_set = true;
        } else if dates != table.dates {
            failed.push(Failure {
                name: station,
                reason: "date axis differs from the other stations".to_string(),
            });
            continue;
        }

        table.stations.push(StationColumn {
            station,
            coords,
            values: observations.iter().map(|o| o.value).collect(),
        });
    }

    (table, failed)
}

// -- Tests -------------------------------------------------------------------
