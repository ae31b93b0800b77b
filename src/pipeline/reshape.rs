//! Wide-to-long expansion of month blocks.

use chrono::NaiveDate;

use super::filter::MonthBlock;

/// One positional value of a month block. `day` may exceed the month length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySlot {
    pub month: NaiveDate,
    pub day: u32,
    pub value: Option<f64>,
}

pub fn reshape(blocks: &[MonthBlock]) -> Vec<DaySlot> {
    blocks
        .iter()
        .flat_map(|block| {
            block.values.iter().enumerate().map(move |(i, value)| DaySlot {
                month: block.month,
                day: i as u32 + 1,
                value: *value,
            })
        })
        .collect()
}

// -- Tests ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::reading::DAYS_PER_ROW;

    use super::*;

    #[test]
    fn should_expand_every_slot() {
        let mut values = [None; DAYS_PER_ROW];
        values[0] = Some(1.0);
        values[30] = Some(31.0);
        let blocks = vec![
            MonthBlock {
                month: NaiveDate::from_ymd_opt(2021, 4, 1).unwrap(),
                values,
            },
            MonthBlock {
                month: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
                values: [None; DAYS_PER_ROW],
            },
        ];

        let slots = reshape(&blocks);

        assert_eq!(slots.len(), 62);
        assert_eq!(slots[0].day, 1);
        assert_eq!(slots[0].value, Some(1.0));
        // April 31 is still present at this stage
        assert_eq!(slots[30].day, 31);
        assert_eq!(slots[30].value, Some(31.0));
        assert_eq!(slots[31].month, NaiveDate::from_ymd_opt(2021, 5, 1).unwrap());
    }
}
