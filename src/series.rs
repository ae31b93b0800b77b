//! Normalised daily series and their `Date,Q` CSV form.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::StationError;

/// One day of a station's series. `value` is `None` when nothing was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub station: String,
    pub observations: Vec<Observation>,
}

impl NormalizedSeries {
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.station)
    }
}

#[derive(Debug, Deserialize)]
struct SeriesRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Q")]
    value: Option<f64>,
}

/// Writes `<folder>/<station>.csv` and returns its path.
pub fn write_series(series: &NormalizedSeries, folder: &Path) -> Result<PathBuf, StationError> {
    let path = folder.join(series.file_name());
    let mut writer = csv::Writer::from_path(&path).map_err(|e| StationError::csv(&path, e))?;

    writer
        .write_record(["Date", "Q"])
        .map_err(|e| StationError::csv(&path, e))?;
    for observation in &series.observations {
        writer
            .write_record([
                observation.date.format("%Y-%m-%d").to_string(),
                observation.value.map(format_value).unwrap_or_default(),
            ])
            .map_err(|e| StationError::csv(&path, e))?;
    }
    writer.flush().map_err(|e| StationError::io(&path, e))?;

    Ok(path)
}

/// Reads a series written by [`write_series`].
pub fn read_series(path: &Path) -> Result<Vec<Observation>, StationError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| StationError::csv(path, e))?;

    reader
        .deserialize::<SeriesRow>()
        .map(|row| {
            row.map(|row| Observation {
                date: row.date,
                value: row.value,
            })
            .map_err(|e| StationError::csv(path, e))
        })
        .collect()
}

/// Whole numbers keep one decimal (`5.0`), everything else uses the shortest
/// representation that round-trips.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// -- Tests ----------------------------------------------------------------------------
