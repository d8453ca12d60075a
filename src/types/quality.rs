//! Per-field quality flags, fusion method tags and the provider identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Describes how a harmonized value was obtained or why it is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    /// Value inside its physical interval, kept unchanged.
    Ok,
    /// The provider delivered no value.
    Missing,
    /// The provider value violated a physical bound (or a cross-field check) and was discarded.
    OutOfRange,
    /// The value was pulled onto the nearest bound. Only produced for derived values.
    Clipped,
}

impl QualityFlag {
    /// Whether a value carrying this flag is usable downstream.
    pub fn has_value(self) -> bool {
        matches!(self, QualityFlag::Ok | QualityFlag::Clipped)
    }
}

/// How a fused value came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    SingleSource,
    WeightedMean,
    Interpolated,
    Unavailable,
}

impl FusionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            FusionMethod::SingleSource => "single_source",
            FusionMethod::WeightedMean => "weighted_mean",
            FusionMethod::Interpolated => "interpolated",
            FusionMethod::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier of a weather data provider (e.g. `"nasa_power"`).
///
/// Ordered lexicographically; the reliability table layers a configurable priority
/// order on top of that.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
