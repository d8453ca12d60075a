//! Turns a provider's raw record into a validated [`ClimateDay`].

use crate::catalog::variable_catalog::VariableCatalog;
use crate::eto::psychrometrics::relative_humidity_from_dewpoint;
use crate::types::climate_day::ClimateDay;
use crate::types::quality::QualityFlag;
use crate::types::raw_record::RawDailyRecord;
use crate::types::variable::StandardVariable;
use crate::validation::validator::Validator;
use log::{debug, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// How far dewpoint may exceed air temperature and still count as rounding (°C).
const DEWPOINT_EXCESS_TOLERANCE: f64 = 0.5;

/// Resolves native fields through the catalog and validates every resolved value.
///
/// Unmapped native fields are dropped. Their number is tracked across all calls
/// (see [`Harmonizer::unmapped_fields`]) for observability; nothing is stored per record.
#[derive(Debug)]
pub struct Harmonizer {
    catalog: Arc<VariableCatalog>,
    validator: Arc<Validator>,
    unmapped: AtomicUsize,
}

impl Harmonizer {
    pub fn new(catalog: Arc<VariableCatalog>, validator: Arc<Validator>) -> Self {
        Self {
            catalog,
            validator,
            unmapped: AtomicUsize::new(0),
        }
    }

    /// Harmonizes one record.
    pub fn harmonize(&self, raw: &RawDailyRecord) -> ClimateDay {
        let (day, unmapped) = self.harmonize_counted(raw);
        self.unmapped.fetch_add(unmapped, Ordering::Relaxed);
        day
    }

    /// Harmonizes a batch, returning the days and the number of fields dropped in this batch.
    pub fn harmonize_all(&self, raws: &[RawDailyRecord]) -> (Vec<ClimateDay>, usize) {
        let mut total = 0;
        let days = raws
            .iter()
            .map(|raw| {
                let (day, unmapped) = self.harmonize_counted(raw);
                total += unmapped;
                day
            })
            .collect();
        self.unmapped.fetch_add(total, Ordering::Relaxed);
        (days, total)
    }

    /// Total number of native fields dropped because the catalog did not know them.
    pub fn unmapped_fields(&self) -> usize {
        self.unmapped.load(Ordering::Relaxed)
    }

    fn harmonize_counted(&self, raw: &RawDailyRecord) -> (ClimateDay, usize) {
        let mut day = ClimateDay::new(raw.date, raw.source.clone());
        let mut unmapped = 0;

        for (native_name, native_value) in &raw.values {
            let resolved = match self.catalog.standardize(&raw.source, native_name) {
                Ok(resolved) => resolved,
                Err(e) => {
                    debug!("Dropping field: {e}");
                    unmapped += 1;
                    continue;
                }
            };

            // Two native fields can map onto one variable; keep the first usable one.
            if day.value(resolved.variable).is_some() {
                continue;
            }

            let converted = native_value.map(|v| resolved.convert(v));
            let (accepted, flag) = self.validator.validate(resolved.variable, converted);
            if flag == QualityFlag::OutOfRange {
                warn!(
                    "{} on {}: {} = {:?} ({}) outside physical limits, discarded",
                    raw.source, raw.date, native_name, native_value, resolved.variable
                );
            }
            day.set(resolved.variable, accepted, flag);
            if resolved.is_derived() {
                day.mark_derived(resolved.variable);
            }
        }

        self.derive_humidity(&mut day);
        self.validator.check_temperature_order(&mut day);
        self.validator.check_solar_radiation(&mut day, raw.latitude);
        (day, unmapped)
    }

    /// Fills mean relative humidity from dewpoint and mean temperature when the
    /// source reports no usable humidity of its own.
    ///
    /// Supersaturation within [`DEWPOINT_EXCESS_TOLERANCE`] is clipped to 100 %; beyond it
    /// the reading is inconsistent and the humidity stays unknown.
    fn derive_humidity(&self, day: &mut ClimateDay) {
        if day.value(StandardVariable::HumidityMean).is_some() {
            return;
        }
        let (Some(dewpoint), Some(temp_mean)) = (
            day.value(StandardVariable::Dewpoint),
            day.value(StandardVariable::TempMean),
        ) else {
            return;
        };

        let rh = relative_humidity_from_dewpoint(dewpoint, temp_mean);
        let (value, flag) = if rh > 100.0 && dewpoint - temp_mean <= DEWPOINT_EXCESS_TOLERANCE {
            (Some(100.0), QualityFlag::Clipped)
        } else if rh > 100.0 {
            warn!(
                "{} on {}: dewpoint {} far above temperature {}, no humidity derived",
                day.source, day.date, dewpoint, temp_mean
            );
            (None, QualityFlag::OutOfRange)
        } else {
            self.validator
                .validate(StandardVariable::HumidityMean, Some(rh))
        };
        day.set(StandardVariable::HumidityMean, value, flag);
        day.mark_derived(StandardVariable::HumidityMean);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::variable_catalog::VariableCatalog;
    use crate::validation::limits::{LimitProfile, PhysicalLimits};
    use chrono::NaiveDate;

    fn harmonizer() -> Harmonizer {
        let catalog = VariableCatalog::new(VariableCatalog::builtin_entries()).unwrap();
        Harmonizer::new(Arc::new(catalog), Arc::new(Validator::default()))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    #[test]
    fn maps_and_converts_known_fields() {
        let raw = RawDailyRecord::new("nws_forecast", date(), 39.74, -104.99)
            .with("temperature", Some(68.0))
            .with("windSpeed", Some(10.0));
        let day = harmonizer().harmonize(&raw);

        assert!((day.value(StandardVariable::TempMean).unwrap() - 20.0).abs() < 1e-9);
        let wind = day.value(StandardVariable::WindSpeed2m).unwrap();
        assert!((wind - 10.0 * 0.44704 * 0.748).abs() < 0.01);
        assert!(day.is_derived(StandardVariable::WindSpeed2m));
        assert!(!day.is_derived(StandardVariable::TempMean));
    }

    #[test]
    fn unknown_fields_are_dropped_and_counted() {
        let harmonizer = harmonizer();
        let raw = RawDailyRecord::new("openmeteo_archive", date(), 0.0, 0.0)
            .with("temperature_2m_max", Some(25.0))
            .with("relative_humidity_2m_max", Some(90.0))
            .with("cloud_cover", Some(40.0));
        let day = harmonizer.harmonize(&raw);

        assert_eq!(day.variables().count(), 1);
        assert_eq!(harmonizer.unmapped_fields(), 2);

        let (_, batch) = harmonizer.harmonize_all(&[raw.clone(), raw]);
        assert_eq!(batch, 4);
        assert_eq!(harmonizer.unmapped_fields(), 6);
    }

    #[test]
    fn every_value_key_has_a_flag() {
        let raw = RawDailyRecord::new("nasa_power", date(), -15.78, -47.93)
            .with("T2M_MAX", Some(31.0))
            .with("T2M_MIN", None)
            .with("RH2M", Some(140.0));
        let day = harmonizer().harmonize(&raw);

        for variable in day.variables() {
            assert!(day.flag(variable).is_some());
        }
        assert_eq!(day.flag(StandardVariable::TempMin), Some(QualityFlag::Missing));
        assert_eq!(day.flag(StandardVariable::HumidityMean), Some(QualityFlag::OutOfRange));
        assert_eq!(day.value(StandardVariable::HumidityMean), None);
        assert_eq!(day.value(StandardVariable::TempMax), Some(31.0));
    }

    #[test]
    fn humidity_is_derived_from_dewpoint() {
        let raw = RawDailyRecord::new("nws_stations", date(), 39.74, -104.99)
            .with("temperature", Some(25.0))
            .with("dewpoint", Some(10.0));
        let day = harmonizer().harmonize(&raw);

        let rh = day.value(StandardVariable::HumidityMean).unwrap();
        assert!(rh > 35.0 && rh < 45.0, "rh was {rh}");
        assert_eq!(day.flag(StandardVariable::HumidityMean), Some(QualityFlag::Ok));
        assert!(day.is_derived(StandardVariable::HumidityMean));
    }

    #[test]
    fn supersaturated_dewpoint_is_clipped() {
        let raw = RawDailyRecord::new("nws_stations", date(), 39.74, -104.99)
            .with("temperature", Some(12.0))
            .with("dewpoint", Some(12.4));
        let day = harmonizer().harmonize(&raw);
        assert_eq!(day.value(StandardVariable::HumidityMean), Some(100.0));
        assert_eq!(day.flag(StandardVariable::HumidityMean), Some(QualityFlag::Clipped));
    }

    #[test]
    fn dewpoint_far_above_temperature_is_rejected() {
        let raw = RawDailyRecord::new("nws_stations", date(), 39.74, -104.99)
            .with("temperature", Some(5.0))
            .with("dewpoint", Some(30.0));
        let day = harmonizer().harmonize(&raw);
        assert_eq!(day.value(StandardVariable::HumidityMean), None);
        assert_eq!(day.flag(StandardVariable::HumidityMean), Some(QualityFlag::OutOfRange));
    }

    #[test]
    fn measured_humidity_wins_over_dewpoint() {
        let raw = RawDailyRecord::new("nws_stations", date(), 39.74, -104.99)
            .with("temperature", Some(25.0))
            .with("dewpoint", Some(10.0))
            .with("relativeHumidity", Some(55.0));
        let day = harmonizer().harmonize(&raw);
        assert_eq!(day.value(StandardVariable::HumidityMean), Some(55.0));
        assert!(!day.is_derived(StandardVariable::HumidityMean));
    }

    #[test]
    fn brazil_profile_rejects_radiation_above_ra() {
        let catalog = VariableCatalog::new(VariableCatalog::builtin_entries()).unwrap();
        let limits = PhysicalLimits::for_profile(LimitProfile::Brazil);
        let brazil = Harmonizer::new(Arc::new(catalog), Arc::new(Validator::new(limits)));
        // Ra at 15.78°S in mid July is about 25 MJ/m²/day.
        let raw = RawDailyRecord::new("nasa_power", date(), -15.78, -47.93)
            .with("ALLSKY_SFC_SW_DWN", Some(30.0));
        let day = brazil.harmonize(&raw);
        assert_eq!(day.value(StandardVariable::SolarRadiation), None);
        assert_eq!(day.flag(StandardVariable::SolarRadiation), Some(QualityFlag::OutOfRange));

        // The global profile only applies its fixed interval.
        let day = harmonizer().harmonize(&raw);
        assert_eq!(day.value(StandardVariable::SolarRadiation), Some(30.0));
    }

    #[test]
    fn inverted_temperatures_are_discarded() {
        let raw = RawDailyRecord::new("nasa_power", date(), -15.78, -47.93)
            .with("T2M_MAX", Some(12.0))
            .with("T2M_MIN", Some(20.0));
        let day = harmonizer().harmonize(&raw);
        assert_eq!(day.value(StandardVariable::TempMax), None);
        assert_eq!(day.value(StandardVariable::TempMin), None);
    }
}
