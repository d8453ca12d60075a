//! Solar geometry (FAO-56 chapter 3, Eqs. 21-25 and 37).

use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

/// Solar constant, MJ m⁻² min⁻¹.
pub const SOLAR_CONSTANT: f64 = 0.0820;

pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Inverse relative Earth-Sun distance (Eq. 23).
pub fn inverse_relative_distance(doy: u32) -> f64 {
    1.0 + 0.033 * (2.0 * PI / 365.0 * f64::from(doy)).cos()
}

/// Solar declination in radians (Eq. 24).
pub fn solar_declination(doy: u32) -> f64 {
    0.409 * (2.0 * PI / 365.0 * f64::from(doy) - 1.39).sin()
}

/// Sunset hour angle in radians (Eq. 25).
///
/// The argument is held in `[-1, 1]` so polar day and polar night yield π and 0.
pub fn sunset_hour_angle(latitude_rad: f64, declination: f64) -> f64 {
    (-latitude_rad.tan() * declination.tan()).clamp(-1.0, 1.0).acos()
}

/// Daily extraterrestrial radiation Ra, MJ m⁻² day⁻¹ (Eq. 21).
pub fn extraterrestrial_radiation(latitude_deg: f64, doy: u32) -> f64 {
    let phi = latitude_deg.to_radians();
    let dr = inverse_relative_distance(doy);
    let delta = solar_declination(doy);
    let ws = sunset_hour_angle(phi, delta);

    let ra = 24.0 * 60.0 / PI
        * SOLAR_CONSTANT
        * dr
        * (ws * phi.sin() * delta.sin() + phi.cos() * delta.cos() * ws.sin());
    ra.max(0.0)
}

/// Clear-sky solar radiation Rso, MJ m⁻² day⁻¹ (Eq. 37).
pub fn clear_sky_radiation(ra: f64, elevation: f64) -> f64 {
    (0.75 + 2e-5 * elevation) * ra
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraterrestrial_radiation_reference_value() {
        // FAO-56 Example 8: 20°S, 3 September
        let doy = day_of_year(NaiveDate::from_ymd_opt(2015, 9, 3).unwrap());
        assert_eq!(doy, 246);
        assert!((extraterrestrial_radiation(-20.0, doy) - 32.2).abs() < 0.1);
    }

    #[test]
    fn polar_night_has_no_radiation() {
        // 80°N around the winter solstice
        assert_eq!(extraterrestrial_radiation(80.0, 355), 0.0);
        assert!(extraterrestrial_radiation(80.0, 172) > 40.0);
    }

    #[test]
    fn clear_sky_grows_with_elevation() {
        assert!((clear_sky_radiation(30.0, 0.0) - 22.5).abs() < 1e-9);
        assert!(clear_sky_radiation(30.0, 1000.0) > clear_sky_radiation(30.0, 0.0));
    }
}
