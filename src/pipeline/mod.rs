//! The per-station normalisation pipeline.
//!
//! Each stage takes an immutable collection and returns a new one:
//! resolve duplicates, drop corrupted blocks, reshape wide-to-long,
//! reconstruct dates, normalise onto the calendar.

pub mod calendar;
pub mod filter;
pub mod reconstruct;
pub mod resolve;
pub mod reshape;

use tracing::{debug, warn};

pub use calendar::Period;

use crate::{reading::RawMonthlyRow, series::NormalizedSeries};

/// What happened to a station's rows on the way through the pipeline.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StationReport {
    pub rows_read: usize,
    pub duplicates: usize,
    pub corrupted: usize,
    pub unparseable_anchors: usize,
    pub invalid_dates: usize,
    pub out_of_period: usize,
    pub collisions: usize,
    pub observed_days: usize,
}

pub fn normalise_station(
    station: &str,
    rows: &[RawMonthlyRow],
    period: &Period,
) -> (NormalizedSeries, StationReport) {
    let resolved = resolve::resolve_duplicates(rows);
    let filtered = filter::drop_corrupted(&resolved.rows);
    let slots = reshape::reshape(&filtered.blocks);
    let reconstructed = reconstruct::reconstruct_dates(&slots);
    let normalised = calendar::normalise(&reconstructed.observations, period);

    if !normalised.collisions.is_empty() {
        warn!(
            station,
            count = normalised.collisions.len(),
            first = %normalised.collisions[0],
            "more than one observation for the same date, kept the first"
        );
    }

    let observed_days = normalised
        .observations
        .iter()
        .filter(|o| o.value.is_some())
        .count();

    let report = StationReport {
        rows_read: rows.len(),
        duplicates: resolved.duplicates,
        corrupted: filtered.corrupted,
        unparseable_anchors: filtered.unparseable,
        invalid_dates: reconstructed.invalid,
        out_of_period: normalised.out_of_period,
        collisions: normalised.collisions.len(),
        observed_days,
    };
    debug!(station, ?report, "normalised");

    let series = NormalizedSeries {
        station: station.to_string(),
        observations: normalised.observations,
    };

    (series, report)
}

// -- Tests ----------------------------------------------------------------------------
