//! Aligns observations onto the fixed daily calendar shared by every station.

use std::collections::{btree_map::Entry, BTreeMap};

use chrono::NaiveDate;

use crate::{error::InvertedPeriod, series::Observation};

/// Inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvertedPeriod> {
        if start > end {
            return Err(InvertedPeriod { start, end });
        }
        Ok(Period { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the period, both ends included.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// The canonical calendar, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[derive(Debug, Default)]
pub struct Normalised {
    pub observations: Vec<Observation>,
    pub out_of_period: usize,
    /// Dates that more than one observation claimed. The first one was kept.
    pub collisions: Vec<NaiveDate>,
}

/// Builds one observation per calendar day of `period`, missing where nothing
/// was observed. Applying it to its own output changes nothing.
pub fn normalise(observations: &[Observation], period: &Period) -> Normalised {
    let mut by_date: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
    let mut out_of_period = 0;
    let mut collisions = Vec::new();

    for observation in observations {
        if !period.contains(observation.date) {
            out_of_period += 1;
            continue;
        }
        match by_date.entry(observation.date) {
            Entry::Vacant(slot) => {
                slot.insert(observation.value);
            }
            Entry::Occupied(_) => collisions.push(observation.date),
        }
    }

    let observations = period
        .days()
        .map(|date| Observation {
            date,
            value: by_date.get(&date).copied().flatten(),
        })
        .collect();

    Normalised {
        observations,
        out_of_period,
        collisions,
    }
}

// -- Tests ----------------------------------------------------------------------------
