//! The single best-estimate day produced by fusing every available source.

use crate::types::quality::{FusionMethod, SourceId};
use crate::types::variable::StandardVariable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fused value for one variable on one date.
///
/// `value` is `None` exactly when `method` is [`FusionMethod::Unavailable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedValue {
    pub value: Option<f64>,
    pub method: FusionMethod,
    /// Contributing sources, most trusted first. Empty for interpolated and unavailable values.
    pub sources: Vec<SourceId>,
}

impl FusedValue {
    pub fn unavailable() -> Self {
        Self {
            value: None,
            method: FusionMethod::Unavailable,
            sources: Vec::new(),
        }
    }

    pub fn single(value: f64, source: SourceId) -> Self {
        Self {
            value: Some(value),
            method: FusionMethod::SingleSource,
            sources: vec![source],
        }
    }

    pub fn weighted(value: f64, sources: Vec<SourceId>) -> Self {
        Self {
            value: Some(value),
            method: FusionMethod::WeightedMean,
            sources,
        }
    }

    pub fn interpolated(value: f64) -> Self {
        Self {
            value: Some(value),
            method: FusionMethod::Interpolated,
            sources: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.method != FusionMethod::Unavailable
    }
}

/// One date's fused record. Holds an entry for every [`StandardVariable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedDay {
    pub date: NaiveDate,
    pub values: BTreeMap<StandardVariable, FusedValue>,
}

impl FusedDay {
    /// A day on which nothing is known yet.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            values: StandardVariable::ALL
                .into_iter()
                .map(|v| (v, FusedValue::unavailable()))
                .collect(),
        }
    }

    pub fn get(&self, variable: StandardVariable) -> Option<&FusedValue> {
        self.values.get(&variable)
    }

    pub fn value(&self, variable: StandardVariable) -> Option<f64> {
        self.values.get(&variable).and_then(|v| v.value)
    }

    pub fn method(&self, variable: StandardVariable) -> FusionMethod {
        self.values
            .get(&variable)
            .map(|v| v.method)
            .unwrap_or(FusionMethod::Unavailable)
    }

    pub fn set(&mut self, variable: StandardVariable, value: FusedValue) {
        self.values.insert(variable, value);
    }
}
