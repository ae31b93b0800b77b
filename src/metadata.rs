//! Station coordinates lookup.
//!
//! The lookup file is a CSV whose first column holds the gage code and which
//! has `latitude` and `longitude` columns somewhere after it, as in the CABra
//! gage information table. Other columns are ignored.

use std::{collections::HashMap, path::Path};

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Default)]
pub struct StationLookup {
    coords: HashMap<String, Coordinates>,
}

impl StationLookup {
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("opening station metadata {}", path.display()))?;

        let headers = reader.headers()?.clone();
        let lat_col = column(&headers, "latitude")?;
        let lon_col = column(&headers, "longitude")?;

        let mut coords = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let id = match record.get(0) {
                Some(id) if !id.trim().is_empty() => id,
                _ => continue,
            };
            let latitude = record.get(lat_col).and_then(|s| s.trim().parse().ok());
            let longitude = record.get(lon_col).and_then(|s| s.trim().parse().ok());
            if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
                coords.insert(
                    normalise_id(id),
                    Coordinates {
                        latitude,
                        longitude,
                    },
                );
            }
        }

        Ok(StationLookup { coords })
    }

    /// Gage codes are compared as numbers, so `01000000` and `1000000` match.
    pub fn get(&self, station: &str) -> Option<Coordinates> {
        self.coords.get(&normalise_id(station)).copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("station metadata has no `{}` column", name))
}

fn normalise_id(id: &str) -> String {
    let id = id.trim();
    let stripped = id.trim_start_matches('0');
    if stripped.is_empty() && !id.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

// -- Tests -------------------------------------------------------------------
