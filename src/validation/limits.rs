//! Physical-limit tables, one closed interval per standard variable.

use crate::types::variable::StandardVariable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Named limit sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitProfile {
    /// World-wide bounds based on records and physical limits.
    #[default]
    Global,
    /// Stricter bounds from the Brazilian gridded dataset (Xavier et al. 2016, 2022).
    Brazil,
}

/// Per-variable acceptable ranges. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalLimits {
    intervals: BTreeMap<StandardVariable, Interval>,
    /// Also require `0.03·Ra ≤ Rs < Ra` for solar radiation.
    extraterrestrial_bound: bool,
}

impl PhysicalLimits {
    pub fn for_profile(profile: LimitProfile) -> Self {
        use StandardVariable as V;

        let (temp, wind, precip, solar, pressure) = match profile {
            LimitProfile::Global => (
                Interval::new(-70.0, 55.0),
                Interval::new(0.0, 75.0),
                Interval::new(0.0, 2000.0),
                Interval::new(0.0, 45.0),
                Interval::new(30.0, 110.0),
            ),
            LimitProfile::Brazil => (
                Interval::new(-30.0, 50.0),
                Interval::new(0.0, 100.0),
                Interval::new(0.0, 450.0),
                Interval::new(0.0, 40.0),
                Interval::new(90.0, 110.0),
            ),
        };

        let intervals = BTreeMap::from([
            (V::TempMax, temp),
            (V::TempMin, temp),
            (V::TempMean, temp),
            (V::Dewpoint, temp),
            (V::HumidityMean, Interval::new(0.0, 100.0)),
            (V::WindSpeed2m, wind),
            (V::SolarRadiation, solar),
            (V::Precipitation, precip),
            (V::Pressure, pressure),
            (V::ProviderEto, Interval::new(0.0, 25.0)),
        ]);
        Self {
            intervals,
            extraterrestrial_bound: profile == LimitProfile::Brazil,
        }
    }

    /// Replaces the interval of one variable.
    pub fn with_override(mut self, variable: StandardVariable, interval: Interval) -> Self {
        self.intervals.insert(variable, interval);
        self
    }

    /// Turns the solar-radiation bound by extraterrestrial radiation on or off.
    pub fn with_extraterrestrial_bound(mut self, enabled: bool) -> Self {
        self.extraterrestrial_bound = enabled;
        self
    }

    pub fn interval(&self, variable: StandardVariable) -> Option<Interval> {
        self.intervals.get(&variable).copied()
    }

    pub fn extraterrestrial_bound(&self) -> bool {
        self.extraterrestrial_bound
    }
}

impl Default for PhysicalLimits {
    fn default() -> Self {
        Self::for_profile(LimitProfile::Global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variable_has_a_valid_interval() {
        for profile in [LimitProfile::Global, LimitProfile::Brazil] {
            let limits = PhysicalLimits::for_profile(profile);
            for variable in StandardVariable::ALL {
                let interval = limits.interval(variable).unwrap();
                assert!(interval.is_valid(), "{variable} in {profile:?}");
            }
        }
    }

    #[test]
    fn brazil_is_stricter_for_temperature() {
        let global = PhysicalLimits::for_profile(LimitProfile::Global);
        let brazil = PhysicalLimits::for_profile(LimitProfile::Brazil);
        let t = StandardVariable::TempMax;
        assert!(global.interval(t).unwrap().contains(52.0));
        assert!(!brazil.interval(t).unwrap().contains(52.0));
    }

    #[test]
    fn only_brazil_bounds_radiation_by_ra() {
        assert!(!PhysicalLimits::for_profile(LimitProfile::Global).extraterrestrial_bound());
        assert!(PhysicalLimits::for_profile(LimitProfile::Brazil).extraterrestrial_bound());
        assert!(PhysicalLimits::default()
            .with_extraterrestrial_bound(true)
            .extraterrestrial_bound());
    }

    #[test]
    fn overrides_replace_the_interval() {
        let limits = PhysicalLimits::default()
            .with_override(StandardVariable::WindSpeed2m, Interval::new(0.0, 40.0));
        assert_eq!(
            limits.interval(StandardVariable::WindSpeed2m),
            Some(Interval::new(0.0, 40.0))
        );
    }
}
