use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use crate::{
    cli::{create_progress_bar, create_spinner, DownloadArgs},
    download::{archive_path, backoff, download_archive, open_session, parse_gage_list},
};

use super::{print_failures, Failure};

#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub failed: Vec<Failure>,
}

impl DownloadSummary {
    pub fn print(&self) {
        println!("Downloaded {} archive(s)", self.downloaded);
        print_failures(&self.failed);
    }
}

pub async fn download(args: &DownloadArgs) -> Result<DownloadSummary> {
    let gage_list = fs::read_to_string(&args.gage_list)
        .with_context(|| format!("reading gage list {}", args.gage_list.display()))?;
    let gages = parse_gage_list(&gage_list);
    fs::create_dir_all(&args.output_folder)?;

    let delay = Duration::from_secs_f64(args.delay_secs.max(0.0));

    let spinner = create_spinner("Opening Hidroweb session...".to_string());
    let client = open_session().await?;
    spinner.finish_with_message("Session open");

    let pb = create_progress_bar(gages.len() as u64, "Downloading archives...".to_string());
    let mut summary = DownloadSummary::default();

    for gage in &gages {
        match fetch_with_retry(&client, gage, &args.output_folder, delay, args.retries).await {
            Ok(()) => {
                info!(gage = %gage, "downloaded");
                summary.downloaded += 1;
            }
            Err(e) => {
                warn!(gage = %gage, error = %e, "download failed");
                summary.failed.push(Failure {
                    name: gage.clone(),
                    reason: e.to_string(),
                });
            }
        }
        pb.inc(1);
        tokio::time::sleep(delay).await;
    }
    pb.finish_with_message("Archives downloaded");

    // Gages to retry in a later run.
    let failed: Vec<&str> = summary.failed.iter().map(|f| f.name.as_str()).collect();
    fs::write(args.output_folder.join("failed.txt"), failed.join("\n"))?;

    Ok(summary)
}

async fn fetch_with_retry(
    client: &Client,
    gage: &str,
    output_folder: &Path,
    delay: Duration,
    retries: u32,
) -> Result<()> {
    let file_path = archive_path(output_folder, gage);
    let attempts = retries.max(1);
    let mut attempt = 1;

    loop {
        match download_archive(client, gage, &file_path).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < attempts => {
                warn!(gage, attempt, error = %e, "retrying");
                tokio::time::sleep(backoff(delay, attempt)).await;
                attempt += 1;
            }
            Err(e) => {
                // Do not leave a partial archive behind.
                let _ = fs::remove_file(&file_path);
                return Err(e);
            }
        }
    }
}
