//! Defines the closed set of standard variables every provider field is harmonized into,
//! together with the canonical unit each one is expressed in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A harmonized daily weather variable.
///
/// Provider-specific field names never travel past the harmonization boundary; from
/// that point on every value is keyed by one of these variants. The derived `Ord`
/// gives the fixed iteration order used everywhere determinism matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardVariable {
    /// Daily maximum air temperature at 2 m (°C).
    TempMax,
    /// Daily minimum air temperature at 2 m (°C).
    TempMin,
    /// Daily mean air temperature at 2 m (°C).
    TempMean,
    /// Daily mean relative humidity at 2 m (%).
    HumidityMean,
    /// Daily mean dewpoint temperature (°C).
    Dewpoint,
    /// Daily mean wind speed at 2 m (m/s).
    #[serde(rename = "wind_speed_2m")]
    WindSpeed2m,
    /// Daily incoming shortwave radiation sum (MJ/m²/day).
    SolarRadiation,
    /// Daily precipitation total (mm/day).
    Precipitation,
    /// Mean surface pressure (kPa).
    Pressure,
    /// Reference evapotranspiration as precomputed by the provider (mm/day).
    ProviderEto,
}

impl StandardVariable {
    /// Every standard variable, in canonical order.
    pub const ALL: [StandardVariable; 10] = [
        StandardVariable::TempMax,
        StandardVariable::TempMin,
        StandardVariable::TempMean,
        StandardVariable::HumidityMean,
        StandardVariable::Dewpoint,
        StandardVariable::WindSpeed2m,
        StandardVariable::SolarRadiation,
        StandardVariable::Precipitation,
        StandardVariable::Pressure,
        StandardVariable::ProviderEto,
    ];

    /// The standard name used in configuration files and exported frames.
    pub fn name(self) -> &'static str {
        match self {
            StandardVariable::TempMax => "temp_max",
            StandardVariable::TempMin => "temp_min",
            StandardVariable::TempMean => "temp_mean",
            StandardVariable::HumidityMean => "humidity_mean",
            StandardVariable::Dewpoint => "dewpoint",
            StandardVariable::WindSpeed2m => "wind_speed_2m",
            StandardVariable::SolarRadiation => "solar_radiation",
            StandardVariable::Precipitation => "precipitation",
            StandardVariable::Pressure => "pressure",
            StandardVariable::ProviderEto => "provider_eto",
        }
    }

    /// The unit every value of this variable is stored in after harmonization.
    pub fn canonical_unit(self) -> Unit {
        match self {
            StandardVariable::TempMax
            | StandardVariable::TempMin
            | StandardVariable::TempMean
            | StandardVariable::Dewpoint => Unit::Celsius,
            StandardVariable::HumidityMean => Unit::Percent,
            StandardVariable::WindSpeed2m => Unit::MetersPerSecond,
            StandardVariable::SolarRadiation => Unit::MegajoulesPerSquareMeterDay,
            StandardVariable::Precipitation | StandardVariable::ProviderEto => {
                Unit::MillimetersPerDay
            }
            StandardVariable::Pressure => Unit::Kilopascal,
        }
    }

    /// Looks a variable up by its standard name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }
}

impl fmt::Display for StandardVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The canonical unit set. Every `ClimateDay` value is in one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Celsius,
    MetersPerSecond,
    Percent,
    MegajoulesPerSquareMeterDay,
    MillimetersPerDay,
    Kilopascal,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::MetersPerSecond => "m/s",
            Unit::Percent => "%",
            Unit::MegajoulesPerSquareMeterDay => "MJ/m²/day",
            Unit::MillimetersPerDay => "mm/day",
            Unit::Kilopascal => "kPa",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
