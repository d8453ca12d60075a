//! Two-tier ETo computation for one fused day.

use crate::eto::error::EtoError;
use crate::eto::hargreaves::hargreaves_samani;
use crate::eto::penman_monteith::{penman_monteith, PenmanMonteithInputs};
use crate::eto::solar::day_of_year;
use crate::types::bitflags::eto::EtoFlags;
use crate::types::eto_result::{EToResult, EtoMethod};
use crate::types::fused_day::FusedDay;
use crate::types::location::LocationContext;
use crate::types::quality::FusionMethod;
use crate::types::variable::StandardVariable;
use log::warn;

/// Variables Penman-Monteith needs from the fused day. Elevation comes from the location.
pub const REQUIRED_INPUTS: [StandardVariable; 6] = [
    StandardVariable::TempMax,
    StandardVariable::TempMin,
    StandardVariable::TempMean,
    StandardVariable::HumidityMean,
    StandardVariable::WindSpeed2m,
    StandardVariable::SolarRadiation,
];

/// Selects Penman-Monteith when every input is available, Hargreaves-Samani when
/// only the temperatures are, and fails the day otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct EtoCalculator;

impl EtoCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Computes ETo for `fused` at `location`.
    ///
    /// # Errors
    ///
    /// * [`EtoError::MissingElevation`] when the location has no elevation.
    /// * [`EtoError::InsufficientData`] when maximum or minimum temperature is unavailable.
    /// * [`EtoError::NonFiniteResult`] when the formula does not yield a finite number.
    pub fn compute(&self, fused: &FusedDay, location: &LocationContext) -> Result<EToResult, EtoError> {
        let elevation = location.elevation.ok_or(EtoError::MissingElevation {
            latitude: location.latitude,
            longitude: location.longitude,
        })?;

        let mut flags = EtoFlags::NONE;
        let (Some(temp_max), Some(temp_min)) = (
            fused.value(StandardVariable::TempMax),
            fused.value(StandardVariable::TempMin),
        ) else {
            return Err(EtoError::InsufficientData {
                date: fused.date,
                missing: REQUIRED_INPUTS
                    .into_iter()
                    .filter(|v| fused.value(*v).is_none())
                    .collect(),
            });
        };
        let temp_mean = match fused.value(StandardVariable::TempMean) {
            Some(t) => t,
            None => {
                flags |= EtoFlags::ESTIMATED;
                (temp_max + temp_min) / 2.0
            }
        };

        let humidity = fused.value(StandardVariable::HumidityMean);
        let wind = fused.value(StandardVariable::WindSpeed2m);
        let radiation = fused.value(StandardVariable::SolarRadiation);
        let doy = day_of_year(fused.date);

        let (raw, method) = match (humidity, wind, radiation) {
            (Some(humidity_mean), Some(wind_speed_2m), Some(solar_radiation)) => {
                let inputs = PenmanMonteithInputs {
                    temp_max,
                    temp_min,
                    temp_mean,
                    humidity_mean,
                    wind_speed_2m,
                    solar_radiation,
                    elevation,
                    latitude: location.latitude,
                    day_of_year: doy,
                };
                (penman_monteith(&inputs), EtoMethod::PenmanMonteithFao56)
            }
            _ => {
                flags.set(EtoFlags::MISSING_HUMIDITY, humidity.is_none());
                flags.set(EtoFlags::MISSING_WIND, wind.is_none());
                flags.set(EtoFlags::MISSING_RADIATION, radiation.is_none());
                let raw = hargreaves_samani(temp_max, temp_min, temp_mean, location.latitude, doy);
                (raw, EtoMethod::HargreavesSamani)
            }
        };
        flags |= input_provenance(fused, method);

        if !raw.is_finite() {
            return Err(EtoError::NonFiniteResult {
                date: fused.date,
                method,
            });
        }
        let eto_mm_per_day = if raw < 0.0 {
            warn!(
                "{} on {}: negative ETo {:.3} mm/day clamped to 0",
                method, fused.date, raw
            );
            flags |= EtoFlags::NON_PHYSICAL_CLAMPED;
            0.0
        } else {
            raw
        };

        Ok(EToResult {
            date: fused.date,
            eto_mm_per_day,
            method,
            flags,
        })
    }
}

/// `FUSED` and `INTERPOLATED` flags for the inputs a method actually used.
fn input_provenance(fused: &FusedDay, method: EtoMethod) -> EtoFlags {
    let used: &[StandardVariable] = match method {
        EtoMethod::PenmanMonteithFao56 => &REQUIRED_INPUTS,
        EtoMethod::HargreavesSamani => &REQUIRED_INPUTS[..3],
    };
    used.iter().fold(EtoFlags::NONE, |flags, v| match fused.method(*v) {
        FusionMethod::WeightedMean => flags | EtoFlags::FUSED,
        FusionMethod::Interpolated => flags | EtoFlags::INTERPOLATED,
        FusionMethod::SingleSource | FusionMethod::Unavailable => flags,
    })
}

/// Lifecycle of one day's ETo computation. Terminal states never change.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EtoDayState {
    #[default]
    Pending,
    PenmanMonteithComputed(EToResult),
    HargreavesComputed(EToResult),
    Failed(EtoError),
}

impl EtoDayState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EtoDayState::Pending)
    }

    /// Moves a pending day into its terminal state. Terminal states are returned as they are.
    pub fn resolve(self, calculator: &EtoCalculator, fused: &FusedDay, location: &LocationContext) -> Self {
        if self.is_terminal() {
            return self;
        }
        match calculator.compute(fused, location) {
            Ok(result) => match result.method {
                EtoMethod::PenmanMonteithFao56 => EtoDayState::PenmanMonteithComputed(result),
                EtoMethod::HargreavesSamani => EtoDayState::HargreavesComputed(result),
            },
            Err(e) => EtoDayState::Failed(e),
        }
    }

    pub fn result(&self) -> Option<&EToResult> {
        match self {
            EtoDayState::PenmanMonteithComputed(r) | EtoDayState::HargreavesComputed(r) => Some(r),
            EtoDayState::Pending | EtoDayState::Failed(_) => None,
        }
    }

    /// The outcome of a terminal state; `None` while pending.
    pub fn into_result(self) -> Option<Result<EToResult, EtoError>> {
        match self {
            EtoDayState::Pending => None,
            EtoDayState::PenmanMonteithComputed(r) | EtoDayState::HargreavesComputed(r) => Some(Ok(r)),
            EtoDayState::Failed(e) => Some(Err(e)),
        }
    }
}
