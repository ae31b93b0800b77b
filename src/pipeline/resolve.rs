//! Collapses competing rows for the same month into one.

use std::collections::{btree_map::Entry, BTreeMap};

use chrono::NaiveDate;

use crate::reading::{RawMonthlyRow, DAYS_PER_ROW};

/// A month row once the quality flag has served its purpose.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRow {
    pub anchor: Option<NaiveDate>,
    pub values: [Option<f64>; DAYS_PER_ROW],
}

#[derive(Debug, Default)]
pub struct Resolved {
    pub rows: Vec<MonthRow>,
    pub duplicates: usize,
}

/// Keeps one row per verbatim anchor: the one with the highest quality flag.
/// On equal flags the row seen first in the file wins.
pub fn resolve_duplicates(rows: &[RawMonthlyRow]) -> Resolved {
    let mut best: BTreeMap<Option<NaiveDate>, &RawMonthlyRow> = BTreeMap::new();

    for row in rows {
        match best.entry(row.anchor) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(mut slot) => {
                if row.quality > slot.get().quality {
                    slot.insert(row);
                }
            }
        }
    }

    let duplicates = rows.len() - best.len();
    let rows = best
        .into_values()
        .map(|row| MonthRow {
            anchor: row.anchor,
            values: row.values,
        })
        .collect();

    Resolved { rows, duplicates }
}

// -- Tests ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    fn row(quality: Option<u8>, anchor: (i32, u32, u32), value: f64) -> RawMonthlyRow {
        RawMonthlyRow {
            quality,
            anchor: NaiveDate::from_ymd_opt(anchor.0, anchor.1, anchor.2),
            values: [Some(value); DAYS_PER_ROW],
        }
    }

    #[test]
    fn should_prefer_final_over_provisional() {
        let rows = vec![
            row(Some(1), (2021, 3, 1), 5.0),
            row(Some(2), (2021, 3, 1), 7.0),
        ];

        let resolved = resolve_duplicates(&rows);

        assert_eq!(resolved.rows.len(), 1);
        assert_eq!(resolved.duplicates, 1);
        assert_eq!(resolved.rows[0].values[0], Some(7.0));
    }

    #[test]
    fn should_prefer_final_regardless_of_file_order() {
        let rows = vec![
            row(Some(2), (2021, 3, 1), 7.0),
            row(Some(1), (2021, 3, 1), 5.0),
        ];

        let resolved = resolve_duplicates(&rows);

        assert_eq!(resolved.rows[0].values[0], Some(7.0));
    }

    #[test]
    fn should_keep_first_on_equal_flags() {
        let rows = vec![
            row(Some(1), (2021, 3, 1), 5.0),
            row(Some(1), (2021, 3, 1), 6.0),
        ];

        let resolved = resolve_duplicates(&rows);

        assert_eq!(resolved.rows[0].values[0], Some(5.0));
    }

    #[test]
    fn should_rank_unreadable_flag_lowest() {
        let rows = vec![row(None, (2021, 3, 1), 5.0), row(Some(1), (2021, 3, 1), 6.0)];

        let resolved = resolve_duplicates(&rows);

        assert_eq!(resolved.rows[0].values[0], Some(6.0));
    }

    #[test]
    fn should_not_merge_different_anchors_in_same_month() {
        let rows = vec![
            row(Some(1), (2021, 3, 1), 5.0),
            row(Some(2), (2021, 3, 31), 9.0),
            row(Some(1), (2021, 2, 1), 1.0),
        ];

        let resolved = resolve_duplicates(&rows);

        assert_eq!(resolved.rows.len(), 3);
        assert_eq!(resolved.duplicates, 0);
        assert_eq!(resolved.rows[0].anchor, NaiveDate::from_ymd_opt(2021, 2, 1));
    }
}
