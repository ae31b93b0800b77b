//! Completeness and monthly averages of a normalised series.

use chrono::{Datelike, NaiveDate};

use crate::series::Observation;

#[derive(Debug, Clone, PartialEq)]
pub struct StationSummary {
    pub days: usize,
    pub observed: usize,
    /// Mean of the observed values per calendar month, January first.
    pub monthly_means: [Option<f64>; 12],
}

impl StationSummary {
    /// Summarises the observations dated within `from..=to` (either end open).
    pub fn new(observations: &[Observation], from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let mut days = 0;
        let mut sums = [0.0; 12];
        let mut counts = [0usize; 12];

        let in_window = observations.iter().filter(|o| {
            from.map_or(true, |from| o.date >= from) && to.map_or(true, |to| o.date <= to)
        });
        for observation in in_window {
            days += 1;
            if let Some(value) = observation.value {
                let month = observation.date.month0() as usize;
                sums[month] += value;
                counts[month] += 1;
            }
        }

        let mut monthly_means = [None; 12];
        for month in 0..12 {
            if counts[month] > 0 {
                monthly_means[month] = Some(sums[month] / counts[month] as f64);
            }
        }

        StationSummary {
            days,
            observed: counts.iter().sum(),
            monthly_means,
        }
    }

    pub fn completeness(&self) -> f64 {
        if self.days == 0 {
            return 0.0;
        }
        100.0 * self.observed as f64 / self.days as f64
    }
}

// -- Tests ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    fn fixture() -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2000, 1, 30).unwrap();
        let values = [Some(1.0), Some(3.0), None, Some(10.0)];
        start
            .iter_days()
            .zip(values)
            .map(|(date, value)| Observation { date, value })
            .collect()
    }

    #[test]
    fn should_average_per_month_ignoring_missing() {
        let s = StationSummary::new(&fixture(), None, None);

        assert_eq!(s.days, 4);
        assert_eq!(s.observed, 3);
        assert_eq!(s.completeness(), 75.0);
        assert_eq!(s.monthly_means[0], Some(2.0));
        assert_eq!(s.monthly_means[1], Some(10.0));
        assert_eq!(s.monthly_means[2], None);
    }

    #[test]
    fn should_restrict_to_window() {
        let from = NaiveDate::from_ymd_opt(2000, 2, 1);

        let s = StationSummary::new(&fixture(), from, None);

        assert_eq!(s.days, 2);
        assert_eq!(s.monthly_means[0], None);
        assert_eq!(s.completeness(), 50.0);
    }

    #[test]
    fn should_report_zero_completeness_for_empty_window() {
        let to = NaiveDate::from_ymd_opt(1999, 1, 1);

        let s = StationSummary::new(&fixture(), None, to);

        assert_eq!(s.days, 0);
        assert_eq!(s.completeness(), 0.0);
    }
}
