use crate::types::quality::SourceId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One provider's daily record exactly as its adapter produced it.
///
/// Keys are the provider's native field names, values are in the provider's native
/// units. Records are ephemeral: they live for a single fusion pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDailyRecord {
    pub source: SourceId,
    pub date: NaiveDate,
    pub values: BTreeMap<String, Option<f64>>, // native name -> native value
    pub latitude: f64,
    pub longitude: f64,
}

impl RawDailyRecord {
    pub fn new(source: impl Into<SourceId>, date: NaiveDate, latitude: f64, longitude: f64) -> Self {
        Self {
            source: source.into(),
            date,
            values: BTreeMap::new(),
            latitude,
            longitude,
        }
    }

    /// Adds a native field, consuming and returning the record for chaining.
    pub fn with(mut self, native_name: &str, value: Option<f64>) -> Self {
        self.values.insert(native_name.to_string(), value);
        self
    }
}
