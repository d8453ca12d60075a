//! FAO-56 Penman-Monteith reference evapotranspiration for daily time steps.

use crate::eto::psychrometrics::{
    psychrometric_constant, saturation_vapour_pressure, vapour_pressure_slope,
};
use crate::eto::solar::{clear_sky_radiation, extraterrestrial_radiation};

/// Stefan-Boltzmann constant, MJ K⁻⁴ m⁻² day⁻¹.
pub const STEFAN_BOLTZMANN: f64 = 4.903e-9;

/// Grass reference albedo.
pub const ALBEDO: f64 = 0.23;

/// Daily inputs, all in canonical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenmanMonteithInputs {
    pub temp_max: f64,
    pub temp_min: f64,
    pub temp_mean: f64,
    /// Percent.
    pub humidity_mean: f64,
    /// Wind speed at 2 m, m/s. Used as given, calm days included.
    pub wind_speed_2m: f64,
    /// Incoming shortwave radiation, MJ m⁻² day⁻¹.
    pub solar_radiation: f64,
    pub elevation: f64,
    pub latitude: f64,
    pub day_of_year: u32,
}

/// Net longwave radiation Rnl (Eq. 39).
pub fn net_longwave_radiation(temp_max: f64, temp_min: f64, ea: f64, rs: f64, rso: f64) -> f64 {
    let tmax_k = temp_max + 273.16;
    let tmin_k = temp_min + 273.16;
    let relative_shortwave = if rso > 0.0 { (rs / rso).min(1.0) } else { 1.0 };
    STEFAN_BOLTZMANN
        * (tmax_k.powi(4) + tmin_k.powi(4))
        / 2.0
        * (0.34 - 0.14 * ea.max(0.0).sqrt())
        * (1.35 * relative_shortwave - 0.35)
}

/// Raw ETo in mm/day (Eq. 6). Can be slightly negative under extreme inputs.
pub fn penman_monteith(inputs: &PenmanMonteithInputs) -> f64 {
    let es = (saturation_vapour_pressure(inputs.temp_max)
        + saturation_vapour_pressure(inputs.temp_min))
        / 2.0;
    let ea = inputs.humidity_mean.clamp(0.0, 100.0) / 100.0 * es;
    let delta = vapour_pressure_slope(inputs.temp_mean);
    let gamma = psychrometric_constant(inputs.elevation);

    let ra = extraterrestrial_radiation(inputs.latitude, inputs.day_of_year);
    let rso = clear_sky_radiation(ra, inputs.elevation);
    let rns = (1.0 - ALBEDO) * inputs.solar_radiation;
    let rnl = net_longwave_radiation(inputs.temp_max, inputs.temp_min, ea, inputs.solar_radiation, rso);
    let rn = rns - rnl;
    // Daily steps: soil heat flux G is negligible.
    let g = 0.0;

    let u2 = inputs.wind_speed_2m;
    let numerator =
        0.408 * delta * (rn - g) + gamma * 900.0 / (inputs.temp_mean + 273.0) * u2 * (es - ea);
    let denominator = delta + gamma * (1.0 + 0.34 * u2);
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brasilia_winter() -> PenmanMonteithInputs {
        PenmanMonteithInputs {
            temp_max: 30.0,
            temp_min: 18.0,
            temp_mean: 24.0,
            humidity_mean: 60.0,
            wind_speed_2m: 2.0,
            solar_radiation: 20.0,
            elevation: 500.0,
            latitude: -15.78,
            day_of_year: 150,
        }
    }

    #[test]
    fn typical_day_is_plausible() {
        let eto = penman_monteith(&brasilia_winter());
        assert!(eto > 3.5 && eto < 5.0, "eto was {eto}");
    }

    #[test]
    fn drier_and_windier_means_more_demand() {
        let base = penman_monteith(&brasilia_winter());
        let dry = penman_monteith(&PenmanMonteithInputs {
            humidity_mean: 30.0,
            ..brasilia_winter()
        });
        let windy = penman_monteith(&PenmanMonteithInputs {
            wind_speed_2m: 5.0,
            ..brasilia_winter()
        });
        assert!(dry > base);
        assert!(windy > base);
    }

    #[test]
    fn calm_wind_is_not_floored() {
        let calm = penman_monteith(&PenmanMonteithInputs {
            wind_speed_2m: 0.0,
            ..brasilia_winter()
        });
        let light = penman_monteith(&PenmanMonteithInputs {
            wind_speed_2m: 0.5,
            ..brasilia_winter()
        });
        assert!(calm < light);
    }

    #[test]
    fn cold_dark_saturated_day_goes_negative() {
        let eto = penman_monteith(&PenmanMonteithInputs {
            temp_max: -5.0,
            temp_min: -15.0,
            temp_mean: -10.0,
            humidity_mean: 100.0,
            wind_speed_2m: 1.0,
            solar_radiation: 0.5,
            elevation: 10.0,
            latitude: 68.0,
            day_of_year: 355,
        });
        assert!(eto < 0.0, "eto was {eto}");
    }
}
