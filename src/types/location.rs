use crate::error::EngineError;
use bon::bon;
use serde::{Deserialize, Serialize};

/// Lowest land surface (Dead Sea shore, about −430 m) with some margin.
const MIN_ELEVATION_M: f64 = -500.0;
/// Above the highest summit (8849 m).
const MAX_ELEVATION_M: f64 = 9000.0;

/// Where a fusion run takes place. Supplied once per run, never mutated.
///
/// # Examples
///
/// ```
/// use climate_eto::LocationContext;
///
/// let brasilia = LocationContext::builder()
///     .latitude(-15.78)
///     .longitude(-47.93)
///     .elevation(1172.0)
///     .build()
///     .unwrap();
/// assert_eq!(brasilia.elevation, Some(1172.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    /// Degrees, −90..=90.
    pub latitude: f64,
    /// Degrees, −180..=180.
    pub longitude: f64,
    /// Meters above sea level. `None` while an elevation lookup is pending.
    pub elevation: Option<f64>,
    /// IANA timezone name, informational only.
    pub timezone: Option<String>,
}

#[bon]
impl LocationContext {
    /// Creates a location, rejecting coordinates and elevations outside the valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLatitude`], [`EngineError::InvalidLongitude`] or
    /// [`EngineError::InvalidElevation`].
    #[builder]
    pub fn new(
        latitude: f64,
        longitude: f64,
        elevation: Option<f64>,
        timezone: Option<String>,
    ) -> Result<Self, EngineError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(EngineError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(EngineError::InvalidLongitude(longitude));
        }
        if let Some(elevation) = elevation {
            check_elevation(elevation)?;
        }
        Ok(Self {
            latitude,
            longitude,
            elevation,
            timezone,
        })
    }

    /// Returns a copy of this location with the elevation filled in.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidElevation`] for a non-finite or implausible elevation.
    pub fn with_elevation(&self, elevation: f64) -> Result<Self, EngineError> {
        check_elevation(elevation)?;
        Ok(Self {
            elevation: Some(elevation),
            ..self.clone()
        })
    }
}

fn check_elevation(elevation: f64) -> Result<(), EngineError> {
    if (MIN_ELEVATION_M..=MAX_ELEVATION_M).contains(&elevation) {
        Ok(())
    } else {
        Err(EngineError::InvalidElevation(elevation))
    }
}
