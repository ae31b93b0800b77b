use anyhow::Result;
use tracing::warn;

use crate::{
    cli::SummaryArgs,
    series::{format_value, read_series},
    summary::StationSummary,
};

use super::{list_files, print_failures, Failure};

#[derive(Debug, Default)]
pub struct SummaryReport {
    pub stations: Vec<(String, StationSummary)>,
    pub failed: Vec<Failure>,
}

impl SummaryReport {
    pub fn print(&self) {
        let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

        print!("{:<10} {:>7} {:>8}", "Station", "Days", "Complete");
        for month in months {
            print!(" {:>10}", month);
        }
        println!();

        for (station, summary) in &self.stations {
            print!(
                "{:<10} {:>7} {:>7.1}%",
                station,
                summary.days,
                summary.completeness()
            );
            for mean in summary.monthly_means {
                let cell = mean.map(|m| format_value((m * 10.0).round() / 10.0)).unwrap_or_default();
                print!(" {:>10}", cell);
            }
            println!();
        }

        print_failures(&self.failed);
    }
}

pub async fn summary(args: &SummaryArgs) -> Result<SummaryReport> {
    let files = list_files(&args.csv_folder, Some("csv"))?;
    let mut report = SummaryReport::default();

    for path in &files {
        let station = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        match read_series(path) {
            Ok(observations) => {
                let summary = StationSummary::new(&observations, args.from, args.to);
                report.stations.push((station, summary));
            }
            Err(e) => {
                warn!(station = %station, error = %e, "cannot summarise");
                report.failed.push(Failure {
                    name: station,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

// -- Tests -------------------------------------------------------------------
