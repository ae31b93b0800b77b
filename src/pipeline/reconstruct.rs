//! Turns month + day-of-month slots into calendar dates.

use chrono::{Datelike, NaiveDate};

use super::reshape::DaySlot;
use crate::series::Observation;

impl DaySlot {
    /// The calendar date of this slot, or `None` for days past the month end.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.month.year(), self.month.month(), self.day)
    }
}

#[derive(Debug, Default)]
pub struct Reconstructed {
    pub observations: Vec<Observation>,
    /// Slots such as 31 April or 30 February.
    pub invalid: usize,
}

pub fn reconstruct_dates(slots: &[DaySlot]) -> Reconstructed {
    let mut observations = Vec::with_capacity(slots.len());
    let mut invalid = 0;

    for slot in slots {
        match slot.date() {
            Some(date) => observations.push(Observation {
                date,
                value: slot.value,
            }),
            None => invalid += 1,
        }
    }

    // Stable, so equal dates keep their slot order.
    observations.sort_by_key(|o| o.date);

    Reconstructed {
        observations,
        invalid,
    }
}

// -- Tests ----------------------------------------------------------------------------
