//! Temporal gap filling for required variables.

use crate::types::fused_day::{FusedDay, FusedValue};
use crate::types::quality::FusionMethod;
use crate::types::variable::StandardVariable;
use log::debug;
use std::collections::BTreeSet;

/// Linearly interpolates short runs of unavailable values between two observed days.
///
/// `days` must be sorted by date. A run is filled when the calendar distance between
/// its two bounding observations leaves at most `max_gap_days` days in between. Runs
/// touching either end of the series, and longer runs, stay unavailable. Returns the
/// number of values filled.
pub fn fill_gaps(
    days: &mut [FusedDay],
    variables: &BTreeSet<StandardVariable>,
    max_gap_days: u32,
) -> usize {
    let mut filled = 0;
    for &variable in variables {
        let mut previous: Option<(usize, f64)> = None;
        for idx in 0..days.len() {
            let Some(value) = observed(&days[idx], variable) else {
                continue;
            };
            if let Some((prev_idx, prev_value)) = previous {
                if idx > prev_idx + 1 {
                    filled += interpolate_run(days, variable, prev_idx, idx, prev_value, value, max_gap_days);
                }
            }
            previous = Some((idx, value));
        }
    }
    filled
}

/// A value usable as an interpolation anchor.
fn observed(day: &FusedDay, variable: StandardVariable) -> Option<f64> {
    match day.method(variable) {
        FusionMethod::SingleSource | FusionMethod::WeightedMean => day.value(variable),
        FusionMethod::Interpolated | FusionMethod::Unavailable => None,
    }
}

fn interpolate_run(
    days: &mut [FusedDay],
    variable: StandardVariable,
    start: usize,
    end: usize,
    start_value: f64,
    end_value: f64,
    max_gap_days: u32,
) -> usize {
    let start_date = days[start].date;
    let span = (days[end].date - start_date).num_days();
    if span - 1 > i64::from(max_gap_days) {
        return 0;
    }

    let mut filled = 0;
    for day in &mut days[start + 1..end] {
        if day.method(variable) != FusionMethod::Unavailable {
            continue;
        }
        let offset = (day.date - start_date).num_days() as f64;
        let value = start_value + (end_value - start_value) * offset / span as f64;
        debug!("Interpolated {} on {}: {:.3}", variable, day.date, value);
        day.set(variable, FusedValue::interpolated(value));
        filled += 1;
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::quality::SourceId;
    use chrono::{Days, NaiveDate};

    fn series(values: &[Option<f64>]) -> Vec<FusedDay> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut day = FusedDay::empty(start + Days::new(i as u64));
                if let Some(v) = v {
                    day.set(
                        StandardVariable::TempMax,
                        FusedValue::single(*v, SourceId::new("nasa_power")),
                    );
                }
                day
            })
            .collect()
    }

    fn required() -> BTreeSet<StandardVariable> {
        BTreeSet::from([StandardVariable::TempMax])
    }

    #[test]
    fn single_day_gap_is_interpolated() {
        let mut days = series(&[Some(20.0), None, Some(24.0)]);
        assert_eq!(fill_gaps(&mut days, &required(), 2), 1);
        assert_eq!(days[1].value(StandardVariable::TempMax), Some(22.0));
        assert_eq!(days[1].method(StandardVariable::TempMax), FusionMethod::Interpolated);
    }

    #[test]
    fn two_day_gap_is_interpolated() {
        let mut days = series(&[Some(10.0), None, None, Some(16.0)]);
        assert_eq!(fill_gaps(&mut days, &required(), 2), 2);
        assert_eq!(days[1].value(StandardVariable::TempMax), Some(12.0));
        assert_eq!(days[2].value(StandardVariable::TempMax), Some(14.0));
    }

    #[test]
    fn three_day_gap_stays_unavailable() {
        let mut days = series(&[Some(10.0), None, None, None, Some(18.0)]);
        assert_eq!(fill_gaps(&mut days, &required(), 2), 0);
        for day in &days[1..4] {
            assert_eq!(day.method(StandardVariable::TempMax), FusionMethod::Unavailable);
            assert_eq!(day.value(StandardVariable::TempMax), None);
        }
    }

    #[test]
    fn edges_are_never_extrapolated() {
        let mut days = series(&[None, Some(10.0), Some(12.0), None]);
        assert_eq!(fill_gaps(&mut days, &required(), 2), 0);
        assert_eq!(days[0].method(StandardVariable::TempMax), FusionMethod::Unavailable);
        assert_eq!(days[3].method(StandardVariable::TempMax), FusionMethod::Unavailable);
    }

    #[test]
    fn variables_outside_the_set_are_untouched() {
        let mut days = series(&[Some(20.0), None, Some(24.0)]);
        let only_humidity = BTreeSet::from([StandardVariable::HumidityMean]);
        assert_eq!(fill_gaps(&mut days, &only_humidity, 2), 0);
        assert_eq!(days[1].method(StandardVariable::TempMax), FusionMethod::Unavailable);
    }
}
