//! Fetches raw station archives from Hidroweb.
//!
//! The server only answers archive requests inside a session, so a client
//! with a cookie store first visits the series page and then reuses the
//! session cookie for every gage.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Error, Result};
use futures::StreamExt;
use reqwest::Client;

const SESSION_URL: &str = "https://www.snirh.gov.br/hidroweb/serieshistoricas";
const ARCHIVE_URL: &str =
    "https://www.snirh.gov.br/hidroweb/rest/api/documento/convencionais?tipo=2&documentos=";

/// Opens a session with the server.
pub async fn open_session() -> Result<Client, Error> {
    let client = Client::builder().cookie_store(true).build()?;

    let response = client.get(SESSION_URL).send().await?;
    if !response.status().is_success() {
        return Err(anyhow!("Failed to open session: {}", response.status()));
    }

    Ok(client)
}

pub fn archive_url(gage: &str) -> String {
    format!("{}{}", ARCHIVE_URL, gage)
}

/// Archives are named after the gage with an `f` in front.
pub fn archive_path(output_folder: &Path, gage: &str) -> PathBuf {
    output_folder.join(format!("f{}.zip", gage))
}

/// Streams the archive for `gage` into `file_path`.
pub async fn download_archive(client: &Client, gage: &str, file_path: &Path) -> Result<(), Error> {
    let response = client.get(archive_url(gage)).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("Failed to download gage {}: {}", gage, response.status()));
    }

    let mut file = File::create(file_path)?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| anyhow!("Error reading chunk: {}", e))?;
        file.write_all(&chunk)?;
    }

    Ok(())
}

/// Delay before retry number `attempt` (1-based): the base delay doubled
/// for every previous failure.
pub fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

/// Gage codes, one per line. Blank lines are ignored.
pub fn parse_gage_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_archive_url() {
        assert_eq!(
            archive_url("10100000"),
            "https://www.snirh.gov.br/hidroweb/rest/api/documento/convencionais?tipo=2&documentos=10100000"
        );
    }

    #[test]
    fn should_prefix_archive_name() {
        assert_eq!(
            archive_path(Path::new("data"), "10100000"),
            PathBuf::from("data/f10100000.zip")
        );
    }

    #[test]
    fn should_double_delay_per_attempt() {
        let base = Duration::from_millis(2500);

        assert_eq!(backoff(base, 1), Duration::from_millis(2500));
        assert_eq!(backoff(base, 2), Duration::from_millis(5000));
        assert_eq!(backoff(base, 3), Duration::from_millis(10000));
    }

    #[test]
    fn should_parse_gage_list() {
        let gages = parse_gage_list("10100000\n\n  10200000 \r\n10500000");
        assert_eq!(gages, vec!["10100000", "10200000", "10500000"]);
    }
}
