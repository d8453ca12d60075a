//! Hargreaves-Samani temperature-based ETo (FAO-56 Eq. 52).

use crate::eto::solar::extraterrestrial_radiation;

/// Converts MJ m⁻² day⁻¹ into mm/day of evaporated water.
const RADIATION_TO_EVAPORATION: f64 = 0.408;

/// Raw ETo in mm/day from temperatures and the date's extraterrestrial radiation.
pub fn hargreaves_samani(temp_max: f64, temp_min: f64, temp_mean: f64, latitude: f64, doy: u32) -> f64 {
    let ra = extraterrestrial_radiation(latitude, doy);
    let range = (temp_max - temp_min).max(0.0);
    0.0023 * (temp_mean + 17.8) * range.sqrt() * RADIATION_TO_EVAPORATION * ra
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_for_a_warm_day() {
        let eto = hargreaves_samani(30.0, 18.0, 24.0, -15.78, 150);
        assert!(eto > 3.0 && eto < 4.5, "eto was {eto}");
    }

    #[test]
    fn very_cold_mean_goes_negative() {
        assert!(hargreaves_samani(-20.0, -30.0, -25.0, 45.0, 172) < 0.0);
    }

    #[test]
    fn no_range_means_no_evaporation() {
        assert_eq!(hargreaves_samani(20.0, 20.0, 20.0, 0.0, 80), 0.0);
    }
}
