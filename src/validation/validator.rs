//! Applies the physical-limit tables to harmonized values.
//!
//! Out-of-range readings are discarded, never clipped.

use crate::eto::solar::{day_of_year, extraterrestrial_radiation};
use crate::types::climate_day::ClimateDay;
use crate::types::quality::QualityFlag;
use crate::types::variable::StandardVariable;
use crate::validation::limits::PhysicalLimits;
use log::warn;

#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: PhysicalLimits,
}

impl Validator {
    pub fn new(limits: PhysicalLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &PhysicalLimits {
        &self.limits
    }

    /// Checks one value against its variable's interval.
    ///
    /// * `None` → `(None, Missing)`
    /// * inside `[min, max]` → `(Some(v), Ok)`, value unchanged
    /// * outside, or not finite → `(None, OutOfRange)`
    pub fn validate(&self, variable: StandardVariable, value: Option<f64>) -> (Option<f64>, QualityFlag) {
        let Some(v) = value else {
            return (None, QualityFlag::Missing);
        };
        let inside = v.is_finite()
            && self
                .limits
                .interval(variable)
                .map_or(true, |interval| interval.contains(v));
        if inside {
            (Some(v), QualityFlag::Ok)
        } else {
            (None, QualityFlag::OutOfRange)
        }
    }

    /// Cross-field check: a day whose maximum temperature is below its minimum has
    /// both fields demoted to out-of-range.
    ///
    /// Returns `true` when the day was modified.
    pub fn check_temperature_order(&self, day: &mut ClimateDay) -> bool {
        let (Some(max), Some(min)) = (
            day.value(StandardVariable::TempMax),
            day.value(StandardVariable::TempMin),
        ) else {
            return false;
        };
        if max >= min {
            return false;
        }
        warn!(
            "{} on {}: temp_max {} < temp_min {}, discarding both",
            day.source, day.date, max, min
        );
        day.set(StandardVariable::TempMax, None, QualityFlag::OutOfRange);
        day.set(StandardVariable::TempMin, None, QualityFlag::OutOfRange);
        true
    }

    /// Cross-field check against extraterrestrial radiation Ra at `latitude` on the day's date:
    /// solar radiation must satisfy `0.03·Ra ≤ Rs < Ra`. Only runs when the limits enable it,
    /// and is skipped where Ra is zero (polar night).
    ///
    /// Returns `true` when the value was discarded.
    pub fn check_solar_radiation(&self, day: &mut ClimateDay, latitude: f64) -> bool {
        if !self.limits.extraterrestrial_bound() {
            return false;
        }
        let Some(rs) = day.value(StandardVariable::SolarRadiation) else {
            return false;
        };
        let ra = extraterrestrial_radiation(latitude, day_of_year(day.date));
        if ra <= 0.0 || (0.03 * ra <= rs && rs < ra) {
            return false;
        }
        warn!(
            "{} on {}: solar radiation {:.2} outside [{:.2}, {:.2}) given Ra, discarded",
            day.source,
            day.date,
            rs,
            0.03 * ra,
            ra
        );
        day.set(StandardVariable::SolarRadiation, None, QualityFlag::OutOfRange);
        true
    }
}
