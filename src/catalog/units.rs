//! Native provider units and their conversion into the canonical unit set.
//!
//! All conversion happens here, at harmonization time. Nothing downstream of the
//! catalog ever sees a non-canonical unit.

use crate::types::variable::Unit;
use serde::{Deserialize, Serialize};

/// Height (m) at which FAO-56 expects wind speed.
pub const STANDARD_WIND_HEIGHT_M: f64 = 2.0;

/// A unit as delivered by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Percent,
    /// Relative humidity as a 0..1 ratio.
    Fraction,
    MegajoulesPerSquareMeter,
    WattHoursPerSquareMeter,
    JoulesPerSquareMeter,
    Millimeters,
    Kilopascal,
    Hectopascal,
    Pascal,
}

impl NativeUnit {
    /// The canonical unit this native unit converts into.
    pub fn canonical(self) -> Unit {
        match self {
            NativeUnit::Celsius | NativeUnit::Fahrenheit | NativeUnit::Kelvin => Unit::Celsius,
            NativeUnit::MetersPerSecond
            | NativeUnit::KilometersPerHour
            | NativeUnit::MilesPerHour => Unit::MetersPerSecond,
            NativeUnit::Percent | NativeUnit::Fraction => Unit::Percent,
            NativeUnit::MegajoulesPerSquareMeter
            | NativeUnit::WattHoursPerSquareMeter
            | NativeUnit::JoulesPerSquareMeter => Unit::MegajoulesPerSquareMeterDay,
            NativeUnit::Millimeters => Unit::MillimetersPerDay,
            NativeUnit::Kilopascal | NativeUnit::Hectopascal | NativeUnit::Pascal => {
                Unit::Kilopascal
            }
        }
    }

    /// Converts a native value into the canonical unit.
    pub fn to_canonical(self, value: f64) -> f64 {
        match self {
            NativeUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            NativeUnit::Kelvin => value - 273.15,
            NativeUnit::KilometersPerHour => value / 3.6,
            NativeUnit::MilesPerHour => value * 0.44704,
            NativeUnit::Fraction => value * 100.0,
            NativeUnit::WattHoursPerSquareMeter => value * 0.0036,
            NativeUnit::JoulesPerSquareMeter => value / 1_000_000.0,
            NativeUnit::Hectopascal => value / 10.0,
            NativeUnit::Pascal => value / 1000.0,
            NativeUnit::Celsius
            | NativeUnit::MetersPerSecond
            | NativeUnit::Percent
            | NativeUnit::MegajoulesPerSquareMeter
            | NativeUnit::Millimeters
            | NativeUnit::Kilopascal => value,
        }
    }
}

/// Converts wind speed measured at `height_m` to the 2 m standard height
/// (FAO-56 Eq. 47, logarithmic wind profile).
pub fn wind_to_2m(speed: f64, height_m: f64) -> f64 {
    if (height_m - STANDARD_WIND_HEIGHT_M).abs() < f64::EPSILON {
        return speed;
    }
    speed * 4.87 / (67.8 * height_m - 5.42).ln()
}
