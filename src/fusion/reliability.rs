//! Static per-source trust weights and the deterministic tie-break order.

use crate::types::quality::SourceId;
use crate::types::variable::StandardVariable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight given to sources that have no entry in the table.
pub const DEFAULT_FALLBACK_WEIGHT: f64 = 0.1;

/// Trust configuration for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReliability {
    /// Base weight in `[0, 1]`.
    pub weight: f64,
    /// Per-variable overrides of `weight`.
    #[serde(default)]
    pub variable_weights: BTreeMap<StandardVariable, f64>,
    /// Known historical bias per variable, in the variable's canonical unit.
    /// Only the magnitude is used, to break ties between equal weights.
    #[serde(default)]
    pub historical_bias: BTreeMap<StandardVariable, f64>,
}

impl SourceReliability {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            variable_weights: BTreeMap::new(),
            historical_bias: BTreeMap::new(),
        }
    }

    pub fn with_variable_weight(mut self, variable: StandardVariable, weight: f64) -> Self {
        self.variable_weights.insert(variable, weight);
        self
    }

    pub fn with_bias(mut self, variable: StandardVariable, bias: f64) -> Self {
        self.historical_bias.insert(variable, bias);
        self
    }
}

/// The full reliability table. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityTable {
    #[serde(default)]
    pub sources: BTreeMap<SourceId, SourceReliability>,
    /// Tie-break order, most preferred first. Sources not listed rank after all listed ones.
    #[serde(default)]
    pub priority: Vec<SourceId>,
    #[serde(default = "default_fallback_weight")]
    pub fallback_weight: f64,
}

fn default_fallback_weight() -> f64 {
    DEFAULT_FALLBACK_WEIGHT
}

impl ReliabilityTable {
    pub fn new(priority: Vec<SourceId>) -> Self {
        Self {
            sources: BTreeMap::new(),
            priority,
            fallback_weight: DEFAULT_FALLBACK_WEIGHT,
        }
    }

    pub fn with_source(mut self, source: impl Into<SourceId>, reliability: SourceReliability) -> Self {
        self.sources.insert(source.into(), reliability);
        self
    }

    /// Weight of `source` for `variable`: variable override, then source weight,
    /// then the fallback weight for unknown sources.
    pub fn weight(&self, source: &SourceId, variable: StandardVariable) -> f64 {
        match self.sources.get(source) {
            Some(rel) => rel.variable_weights.get(&variable).copied().unwrap_or(rel.weight),
            None => self.fallback_weight,
        }
    }

    /// Absolute historical bias, if known.
    pub fn bias(&self, source: &SourceId, variable: StandardVariable) -> Option<f64> {
        self.sources
            .get(source)
            .and_then(|rel| rel.historical_bias.get(&variable))
            .map(|b| b.abs())
    }

    /// Position in the priority order; unlisted sources share the last rank.
    pub fn rank(&self, source: &SourceId) -> usize {
        self.priority
            .iter()
            .position(|s| s == source)
            .unwrap_or(self.priority.len())
    }

    /// Every weight that lies outside `[0, 1]`, as `(source, weight)`.
    pub fn invalid_weights(&self) -> Vec<(SourceId, f64)> {
        let mut invalid = Vec::new();
        let in_range = |w: f64| (0.0..=1.0).contains(&w);
        for (source, rel) in &self.sources {
            if !in_range(rel.weight) {
                invalid.push((source.clone(), rel.weight));
            }
            for w in rel.variable_weights.values() {
                if !in_range(*w) {
                    invalid.push((source.clone(), *w));
                }
            }
        }
        if !in_range(self.fallback_weight) {
            invalid.push((SourceId::new("<fallback>"), self.fallback_weight));
        }
        invalid
    }
}

impl Default for ReliabilityTable {
    /// Weights follow the inverse of each provider's priority class.
    fn default() -> Self {
        let priority = [
            "openmeteo_archive",
            "openmeteo_forecast",
            "nasa_power",
            "nws_stations",
            "nws_forecast",
            "met_norway",
        ]
        .into_iter()
        .map(SourceId::new)
        .collect();

        ReliabilityTable::new(priority)
            .with_source("openmeteo_archive", SourceReliability::new(1.0))
            .with_source("openmeteo_forecast", SourceReliability::new(1.0))
            .with_source("nasa_power", SourceReliability::new(0.5))
            .with_source("nws_stations", SourceReliability::new(1.0 / 3.0))
            .with_source("nws_forecast", SourceReliability::new(1.0 / 3.0))
            .with_source("met_norway", SourceReliability::new(0.25))
    }
}
