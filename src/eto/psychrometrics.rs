//! FAO-56 chapter 3 atmospheric parameters.

/// Saturation vapour pressure at `t` °C, kPa (Eq. 11).
pub fn saturation_vapour_pressure(t: f64) -> f64 {
    0.6108 * (17.27 * t / (t + 237.3)).exp()
}

/// Slope of the saturation vapour pressure curve at `t` °C, kPa/°C (Eq. 13).
pub fn vapour_pressure_slope(t: f64) -> f64 {
    4098.0 * saturation_vapour_pressure(t) / (t + 237.3).powi(2)
}

/// Atmospheric pressure at `elevation` meters, kPa (Eq. 7).
pub fn atmospheric_pressure(elevation: f64) -> f64 {
    101.3 * ((293.0 - 0.0065 * elevation) / 293.0).powf(5.26)
}

/// Psychrometric constant at `elevation` meters, kPa/°C (Eq. 8).
pub fn psychrometric_constant(elevation: f64) -> f64 {
    0.000665 * atmospheric_pressure(elevation)
}

/// Mean relative humidity (%) implied by a dewpoint and an air temperature.
pub fn relative_humidity_from_dewpoint(dewpoint: f64, temperature: f64) -> f64 {
    100.0 * saturation_vapour_pressure(dewpoint) / saturation_vapour_pressure(temperature)
}
