//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::{command, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalise raw Hidroweb files into one daily CSV per station
    Convert(ConvertArgs),
    /// Download raw station archives from Hidroweb
    Download(DownloadArgs),
    /// Combine per-station CSVs into a single parquet file
    Export(ExportArgs),
    /// Report completeness and monthly averages per station
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Folder holding the raw `vazoes_*.txt` files
    #[arg(long, env = "HIDROWEB_DATA_FOLDER")]
    pub data_folder: PathBuf,
    /// Folder the per-station CSV files are written to
    #[arg(long, env = "HIDROWEB_OUTPUT_FOLDER")]
    pub output_folder: PathBuf,
    /// First day of the output calendar (YYYY-MM-DD)
    #[arg(long, env = "HIDROWEB_START_DATE")]
    pub start_date: NaiveDate,
    /// Last day of the output calendar, inclusive (YYYY-MM-DD)
    #[arg(long, env = "HIDROWEB_END_DATE")]
    pub end_date: NaiveDate,
    /// Preamble lines before the column header row
    #[arg(long, env = "HIDROWEB_HEADER_LINES", default_value_t = 13)]
    pub header_lines: usize,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Text file with one gage code per line
    #[arg(long)]
    pub gage_list: PathBuf,
    /// Folder the downloaded archives are saved to
    #[arg(long)]
    pub output_folder: PathBuf,
    /// Pause between requests, in seconds
    #[arg(long, default_value_t = 2.5)]
    pub delay_secs: f64,
    /// Attempts per gage before giving up
    #[arg(long, default_value_t = 3)]
    pub retries: u32,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Folder holding the per-station CSV files
    #[arg(long)]
    pub csv_folder: PathBuf,
    /// CSV with station id, latitude and longitude columns
    #[arg(long)]
    pub metadata: PathBuf,
    /// Parquet file to create
    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Folder holding the per-station CSV files
    #[arg(long)]
    pub csv_folder: PathBuf,
    /// Only consider days on or after this date
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Only consider days on or before this date
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

    ProgressBar::new(size).with_message(message).with_style(style)
}
