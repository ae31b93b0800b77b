pub mod convert;
pub mod download;
pub mod export;
pub mod summary;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

pub use convert::convert;
pub use download::download;
pub use export::export;
pub use summary::summary;

/// A station that could not be processed, and why.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Failure {
    pub name: String,
    pub reason: String,
}

/// Regular files in `folder`, optionally restricted to one extension, sorted
/// by name so batches run in a stable order.
pub fn list_files(folder: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(folder).with_context(|| format!("reading {}", folder.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(extension) = extension {
            let matches = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case(extension))
                .unwrap_or(false);
            if !matches {
                continue;
            }
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Prints the stations that were skipped.
pub fn print_failures(failures: &[Failure]) {
    if failures.is_empty() {
        return;
    }
    println!("{} station(s) skipped:", failures.len());
    for failure in failures {
        println!("  {:<24} {}", failure.name, failure.reason);
    }
}

// -- Tests -------------------------------------------------------------------
