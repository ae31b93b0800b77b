//! Errors that abort the processing of a single station.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StationError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: file ends before the column header row (expected {header_lines} header lines)")]
    MissingHeader { path: PathBuf, header_lines: usize },
    #[error("{path}: column header has {got} fields, expected at least {expected}")]
    ShortHeader {
        path: PathBuf,
        expected: usize,
        got: usize,
    },
    #[error("cannot derive a station id from file name `{0}`")]
    BadFileName(String),
    #[error("{path}: malformed record: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

impl StationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StationError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        StationError::Csv {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("start date {start} is after end date {end}")]
pub struct InvertedPeriod {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}
