//! The static mapping from `(source, native field name)` to standard variable,
//! canonical unit and ETo relevance.

use crate::catalog::error::CatalogError;
use crate::catalog::units::{wind_to_2m, NativeUnit, STANDARD_WIND_HEIGHT_M};
use crate::types::quality::SourceId;
use crate::types::variable::{StandardVariable, Unit};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One row of the catalog, as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub source: SourceId,
    pub native_name: String,
    pub variable: StandardVariable,
    pub unit: NativeUnit,
    #[serde(default)]
    pub required_for_eto: bool,
    /// The source does not measure this variable directly (model proxy, derived product).
    #[serde(default)]
    pub proxy: bool,
    /// Measurement height in meters, only meaningful for wind speed.
    #[serde(default)]
    pub height_m: Option<f64>,
}

impl CatalogEntry {
    pub fn new(
        source: &str,
        native_name: &str,
        variable: StandardVariable,
        unit: NativeUnit,
        required_for_eto: bool,
    ) -> Self {
        Self {
            source: SourceId::new(source),
            native_name: native_name.to_string(),
            variable,
            unit,
            required_for_eto,
            proxy: false,
            height_m: None,
        }
    }

    fn at_height(mut self, height_m: f64) -> Self {
        self.height_m = Some(height_m);
        self
    }

    fn as_proxy(mut self) -> Self {
        self.proxy = true;
        self
    }
}

/// Result of resolving a native field through the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standardized<'a> {
    pub variable: StandardVariable,
    pub unit: Unit,
    pub required_for_eto: bool,
    entry: &'a CatalogEntry,
}

impl Standardized<'_> {
    /// Converts a native value into the canonical unit (including wind-height correction).
    pub fn convert(&self, native_value: f64) -> f64 {
        let value = self.entry.unit.to_canonical(native_value);
        match (self.variable, self.entry.height_m) {
            (StandardVariable::WindSpeed2m, Some(height)) => wind_to_2m(value, height),
            _ => value,
        }
    }

    /// Whether the converted value is a proxy rather than a direct measurement.
    pub fn is_derived(&self) -> bool {
        self.entry.proxy
            || self
                .entry
                .height_m
                .is_some_and(|h| (h - STANDARD_WIND_HEIGHT_M).abs() > f64::EPSILON)
    }
}

/// Immutable lookup table, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct VariableCatalog {
    entries: BTreeMap<(SourceId, String), CatalogEntry>,
}

impl VariableCatalog {
    /// Builds the catalog, rejecting duplicates and unit mismatches.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateEntry`] if a `(source, native name)` pair appears twice,
    /// or [`CatalogError::IncompatibleUnit`] if an entry's unit does not convert into
    /// its variable's canonical unit.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            if entry.unit.canonical() != entry.variable.canonical_unit() {
                return Err(CatalogError::IncompatibleUnit {
                    variable: entry.variable,
                    unit: entry.unit,
                });
            }
            let key = (entry.source.clone(), entry.native_name.clone());
            if map.contains_key(&key) {
                return Err(CatalogError::DuplicateEntry {
                    source_id: entry.source,
                    name: entry.native_name,
                });
            }
            map.insert(key, entry);
        }
        Ok(Self { entries: map })
    }

    /// Resolves a native field name for a source.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownVariable`] when the pair is not in the catalog.
    pub fn standardize(
        &self,
        source: &SourceId,
        native_name: &str,
    ) -> Result<Standardized<'_>, CatalogError> {
        // BTreeMap lookups need an owned key; catalogs are small.
        let key = (source.clone(), native_name.to_string());
        self.entries
            .get(&key)
            .map(|entry| Standardized {
                variable: entry.variable,
                unit: entry.variable.canonical_unit(),
                required_for_eto: entry.required_for_eto,
                entry,
            })
            .ok_or_else(|| CatalogError::UnknownVariable {
                source_id: source.clone(),
                name: native_name.to_string(),
            })
    }

    /// Every standard variable flagged as required for ETo by at least one entry.
    pub fn required_variables(&self) -> BTreeSet<StandardVariable> {
        self.entries
            .values()
            .filter(|e| e.required_for_eto)
            .map(|e| e.variable)
            .collect()
    }

    pub fn sources(&self) -> BTreeSet<SourceId> {
        self.entries.keys().map(|(s, _)| s.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// The built-in table for the supported providers.
    pub fn builtin_entries() -> Vec<CatalogEntry> {
        use NativeUnit as U;
        use StandardVariable as V;

        let mut entries = vec![
            // --- NASA POWER ---
            CatalogEntry::new("nasa_power", "T2M_MAX", V::TempMax, U::Celsius, true),
            CatalogEntry::new("nasa_power", "T2M_MIN", V::TempMin, U::Celsius, true),
            CatalogEntry::new("nasa_power", "T2M", V::TempMean, U::Celsius, true),
            CatalogEntry::new("nasa_power", "RH2M", V::HumidityMean, U::Percent, true),
            CatalogEntry::new("nasa_power", "WS2M", V::WindSpeed2m, U::MetersPerSecond, true)
                .at_height(2.0),
            CatalogEntry::new(
                "nasa_power",
                "ALLSKY_SFC_SW_DWN",
                V::SolarRadiation,
                U::MegajoulesPerSquareMeter,
                true,
            ),
            CatalogEntry::new("nasa_power", "PRECTOTCORR", V::Precipitation, U::Millimeters, false),
            // --- MET Norway Locationforecast ---
            CatalogEntry::new("met_norway", "air_temperature_max", V::TempMax, U::Celsius, true),
            CatalogEntry::new("met_norway", "air_temperature_min", V::TempMin, U::Celsius, true),
            CatalogEntry::new("met_norway", "air_temperature_mean", V::TempMean, U::Celsius, true),
            CatalogEntry::new(
                "met_norway",
                "relative_humidity_mean",
                V::HumidityMean,
                U::Percent,
                true,
            ),
            CatalogEntry::new("met_norway", "wind_speed", V::WindSpeed2m, U::MetersPerSecond, true)
                .at_height(10.0),
            CatalogEntry::new("met_norway", "precipitation_sum", V::Precipitation, U::Millimeters, false),
            // --- NWS Forecast (hourly values aggregated by the adapter) ---
            CatalogEntry::new("nws_forecast", "temperature", V::TempMean, U::Fahrenheit, true),
            CatalogEntry::new("nws_forecast", "temperature_max", V::TempMax, U::Fahrenheit, true),
            CatalogEntry::new("nws_forecast", "temperature_min", V::TempMin, U::Fahrenheit, true),
            CatalogEntry::new("nws_forecast", "dewpoint", V::Dewpoint, U::Celsius, false),
            CatalogEntry::new("nws_forecast", "relativeHumidity", V::HumidityMean, U::Percent, true),
            CatalogEntry::new("nws_forecast", "windSpeed", V::WindSpeed2m, U::MilesPerHour, true)
                .at_height(10.0),
            CatalogEntry::new(
                "nws_forecast",
                "quantitativePrecipitation",
                V::Precipitation,
                U::Millimeters,
                false,
            ),
            // --- NWS Stations ---
            CatalogEntry::new("nws_stations", "temperature", V::TempMean, U::Celsius, true),
            CatalogEntry::new("nws_stations", "maxTemperature", V::TempMax, U::Celsius, true),
            CatalogEntry::new("nws_stations", "minTemperature", V::TempMin, U::Celsius, true),
            CatalogEntry::new("nws_stations", "dewpoint", V::Dewpoint, U::Celsius, false),
            CatalogEntry::new("nws_stations", "relativeHumidity", V::HumidityMean, U::Percent, true),
            CatalogEntry::new("nws_stations", "windSpeed", V::WindSpeed2m, U::KilometersPerHour, true)
                .at_height(10.0),
            CatalogEntry::new("nws_stations", "barometricPressure", V::Pressure, U::Pascal, false),
            CatalogEntry::new(
                "nws_stations",
                "precipitationLast24Hours",
                V::Precipitation,
                U::Millimeters,
                false,
            ),
        ];

        // Open-Meteo archive and forecast share one schema.
        for source in ["openmeteo_archive", "openmeteo_forecast"] {
            entries.extend([
                CatalogEntry::new(source, "temperature_2m_max", V::TempMax, U::Celsius, true),
                CatalogEntry::new(source, "temperature_2m_min", V::TempMin, U::Celsius, true),
                CatalogEntry::new(source, "temperature_2m_mean", V::TempMean, U::Celsius, true),
                CatalogEntry::new(source, "relative_humidity_2m_mean", V::HumidityMean, U::Percent, true),
                CatalogEntry::new(source, "wind_speed_10m_mean", V::WindSpeed2m, U::MetersPerSecond, true)
                    .at_height(10.0),
                CatalogEntry::new(
                    source,
                    "shortwave_radiation_sum",
                    V::SolarRadiation,
                    U::MegajoulesPerSquareMeter,
                    true,
                ),
                CatalogEntry::new(source, "precipitation_sum", V::Precipitation, U::Millimeters, false),
                CatalogEntry::new(
                    source,
                    "et0_fao_evapotranspiration",
                    V::ProviderEto,
                    U::Millimeters,
                    false,
                )
                .as_proxy(),
            ]);
        }

        entries
    }
}
