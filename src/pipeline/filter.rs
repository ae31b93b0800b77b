//! Drops the duplicated month blocks some files carry.
//!
//! Those blocks are stamped with a day other than the first (`31/03/2021`
//! instead of `01/03/2021`) and must be discarded whole.

use chrono::{Datelike, NaiveDate};

use super::resolve::MonthRow;
use crate::reading::DAYS_PER_ROW;

/// A month row whose anchor is known to be the first of its month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBlock {
    pub month: NaiveDate,
    pub values: [Option<f64>; DAYS_PER_ROW],
}

#[derive(Debug, Default)]
pub struct Filtered {
    pub blocks: Vec<MonthBlock>,
    /// Rows anchored on a day other than the first.
    pub corrupted: usize,
    /// Rows whose anchor cell could not be read as a date.
    pub unparseable: usize,
}

pub fn drop_corrupted(rows: &[MonthRow]) -> Filtered {
    let mut filtered = Filtered::default();

    for row in rows {
        match row.anchor {
            Some(month) if month.day() == 1 => filtered.blocks.push(MonthBlock {
                month,
                values: row.values,
            }),
            Some(_) => filtered.corrupted += 1,
            None => filtered.unparseable += 1,
        }
    }

    filtered
}

// -- Tests ----------------------------------------------------------------------------
