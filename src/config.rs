//! Engine configuration: catalog, limits, reliability table and fusion parameters.
//!
//! Built once at startup and shared read-only by every worker.

use crate::catalog::error::CatalogError;
use crate::catalog::variable_catalog::{CatalogEntry, VariableCatalog};
use crate::fusion::fusion_engine::FusionConfig;
use crate::fusion::reliability::ReliabilityTable;
use crate::types::quality::SourceId;
use crate::types::variable::StandardVariable;
use crate::validation::limits::{Interval, LimitProfile, PhysicalLimits};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_DIR_NAME: &str = "climate_eto";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Reliability weight {weight} for '{source_id}' is outside [0, 1]")]
    InvalidWeight { source_id: SourceId, weight: f64 },

    #[error("Limit interval for {variable} is invalid: [{min}, {max}]")]
    InvalidInterval {
        variable: StandardVariable,
        min: f64,
        max: f64,
    },

    #[error("derived_weight_factor {0} is outside (0, 1]")]
    InvalidDerivedWeightFactor(f64),

    #[error("max_source_distance_km {0} must be positive")]
    InvalidDistance(f64),

    #[error("Invalid catalog")]
    Catalog(#[from] CatalogError),
}

/// Which limit table to use, plus per-variable replacements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default)]
    pub profile: LimitProfile,
    #[serde(default)]
    pub overrides: BTreeMap<StandardVariable, Interval>,
    /// Forces the `0.03·Ra ≤ Rs < Ra` radiation check on or off. Defaults to the profile's choice.
    #[serde(default)]
    pub extraterrestrial_bound: Option<bool>,
}

impl LimitsConfig {
    pub fn build(&self) -> PhysicalLimits {
        let limits = self
            .overrides
            .iter()
            .fold(PhysicalLimits::for_profile(self.profile), |limits, (v, i)| {
                limits.with_override(*v, *i)
            });
        match self.extraterrestrial_bound {
            Some(enabled) => limits.with_extraterrestrial_bound(enabled),
            None => limits,
        }
    }
}

/// Everything the engine needs besides the data itself.
///
/// Every field has a default, so a config file only needs the parts it changes:
///
/// ```
/// use climate_eto::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(
///     r#"{ "limits": { "profile": "brazil" }, "max_source_distance_km": 25.0 }"#,
/// ).unwrap();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.fusion.max_gap_days, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "VariableCatalog::builtin_entries")]
    pub catalog: Vec<CatalogEntry>,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub reliability: ReliabilityTable,
    #[serde(default)]
    pub fusion: FusionConfig,
    /// Raw records located farther than this from the requested location are rejected.
    #[serde(default)]
    pub max_source_distance_km: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog: VariableCatalog::builtin_entries(),
            limits: LimitsConfig::default(),
            reliability: ReliabilityTable::default(),
            fusion: FusionConfig::default(),
            max_source_distance_km: None,
        }
    }
}

impl EngineConfig {
    /// Default location of the user configuration file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] if the file cannot be loaded,
    /// and any error of [`EngineConfig::validate`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        info!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Loads the user configuration file when present, else the built-in defaults.
    ///
    /// # Errors
    ///
    /// Fails only when a file exists but is unreadable or invalid.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_path(path),
            _ => {
                debug!("No configuration file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Checks weights, intervals, fusion parameters and the catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((source_id, weight)) = self.reliability.invalid_weights().into_iter().next() {
            return Err(ConfigError::InvalidWeight { source_id, weight });
        }
        for (variable, interval) in &self.limits.overrides {
            if !interval.is_valid() {
                return Err(ConfigError::InvalidInterval {
                    variable: *variable,
                    min: interval.min,
                    max: interval.max,
                });
            }
        }
        let factor = self.fusion.derived_weight_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(ConfigError::InvalidDerivedWeightFactor(factor));
        }
        if let Some(km) = self.max_source_distance_km {
            if !(km > 0.0) {
                return Err(ConfigError::InvalidDistance(km));
            }
        }
        VariableCatalog::new(self.catalog.iter().cloned())?;
        Ok(())
    }
}
