//! The harmonized, validated single-source daily record.

use crate::types::quality::{QualityFlag, SourceId};
use crate::types::variable::StandardVariable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One source's day after harmonization and validation.
///
/// Every key of `values` has a matching entry in `flags`. Values flagged
/// [`QualityFlag::Missing`] or [`QualityFlag::OutOfRange`] are stored as `None`;
/// nothing out of range is ever kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateDay {
    pub date: NaiveDate,
    pub source: SourceId,
    values: BTreeMap<StandardVariable, Option<f64>>,
    flags: BTreeMap<StandardVariable, QualityFlag>,
    derived: BTreeSet<StandardVariable>,
}

impl ClimateDay {
    pub fn new(date: NaiveDate, source: SourceId) -> Self {
        Self {
            date,
            source,
            values: BTreeMap::new(),
            flags: BTreeMap::new(),
            derived: BTreeSet::new(),
        }
    }

    /// Stores a validated value together with its flag.
    pub fn set(&mut self, variable: StandardVariable, value: Option<f64>, flag: QualityFlag) {
        let value = if flag.has_value() { value } else { None };
        self.values.insert(variable, value);
        self.flags.insert(variable, flag);
    }

    /// Marks a variable as derived or proxy (not measured directly by the source).
    pub fn mark_derived(&mut self, variable: StandardVariable) {
        self.derived.insert(variable);
    }

    /// The usable value for `variable`, if any.
    pub fn value(&self, variable: StandardVariable) -> Option<f64> {
        self.values.get(&variable).copied().flatten()
    }

    pub fn flag(&self, variable: StandardVariable) -> Option<QualityFlag> {
        self.flags.get(&variable).copied()
    }

    pub fn is_derived(&self, variable: StandardVariable) -> bool {
        self.derived.contains(&variable)
    }

    /// Whether the source reported the variable at all (with or without a usable value).
    pub fn contains(&self, variable: StandardVariable) -> bool {
        self.values.contains_key(&variable)
    }

    pub fn variables(&self) -> impl Iterator<Item = StandardVariable> + '_ {
        self.values.keys().copied()
    }

    pub fn flags(&self) -> &BTreeMap<StandardVariable, QualityFlag> {
        &self.flags
    }
}
