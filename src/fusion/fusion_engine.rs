//! Merges per-source [`ClimateDay`]s into one [`FusedDay`] per date.

use crate::fusion::gap_fill::fill_gaps;
use crate::fusion::reliability::ReliabilityTable;
use crate::types::climate_day::ClimateDay;
use crate::types::fused_day::{FusedDay, FusedValue};
use crate::types::quality::SourceId;
use crate::types::variable::StandardVariable;
use chrono::{Days, NaiveDate};
use log::{debug, warn};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Tunables of the fusion step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Longest run of missing days that is still interpolated.
    #[serde(default = "default_max_gap_days")]
    pub max_gap_days: u32,
    /// Multiplier applied to the weight of derived or proxy values.
    #[serde(default = "default_derived_weight_factor")]
    pub derived_weight_factor: f64,
}

fn default_max_gap_days() -> u32 {
    2
}

fn default_derived_weight_factor() -> f64 {
    0.5
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            max_gap_days: default_max_gap_days(),
            derived_weight_factor: default_derived_weight_factor(),
        }
    }
}

/// One source's usable value for one variable, with its sort key.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    source: &'a SourceId,
    value: f64,
    weight: f64,
    bias: Option<f64>,
    rank: usize,
}

impl Candidate<'_> {
    /// Heaviest first; ties go to the smaller known bias, then to the priority order.
    /// Source id and value close the order so that it is total.
    fn preference(&self, other: &Self) -> Ordering {
        let key = |c: &Self| {
            (
                Reverse(OrderedFloat(c.weight)),
                c.bias.is_none(),
                OrderedFloat(c.bias.unwrap_or(0.0)),
                c.rank,
            )
        };
        key(self)
            .cmp(&key(other))
            .then_with(|| self.source.cmp(other.source))
            .then_with(|| OrderedFloat(self.value).cmp(&OrderedFloat(other.value)))
    }
}

/// Reliability-weighted fusion of overlapping sources.
///
/// The output depends only on the set of input days, never on their order.
#[derive(Debug, Clone)]
pub struct FusionEngine {
    reliability: Arc<ReliabilityTable>,
    required: BTreeSet<StandardVariable>,
    config: FusionConfig,
}

impl FusionEngine {
    /// `required` lists the variables that are gap-filled across dates.
    pub fn new(
        reliability: Arc<ReliabilityTable>,
        required: BTreeSet<StandardVariable>,
        config: FusionConfig,
    ) -> Self {
        Self {
            reliability,
            required,
            config,
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn reliability(&self) -> &ReliabilityTable {
        &self.reliability
    }

    /// Fuses every source's day for a single date. Days with another date are ignored.
    pub fn fuse_day(&self, date: NaiveDate, days: &[ClimateDay]) -> FusedDay {
        let same_date: Vec<&ClimateDay> = days.iter().filter(|d| d.date == date).collect();
        let mut fused = self.fuse_refs(date, &same_date);
        discard_inverted_temperatures(&mut fused);
        fused
    }

    /// Fuses a whole series and fills short gaps in the required variables.
    ///
    /// The result covers every calendar day from the earliest to the latest input date,
    /// in ascending order. Dates without any input start out fully unavailable.
    /// A day whose fused maximum temperature ends up below its minimum loses both.
    pub fn fuse_series(&self, days: &[ClimateDay]) -> Vec<FusedDay> {
        let mut by_date: BTreeMap<NaiveDate, Vec<&ClimateDay>> = BTreeMap::new();
        for day in days {
            by_date.entry(day.date).or_default().push(day);
        }
        let (Some(&first), Some(&last)) = (by_date.keys().next(), by_date.keys().next_back()) else {
            return Vec::new();
        };

        let mut fused = Vec::new();
        let mut date = first;
        while date <= last {
            let sources = by_date.get(&date).map(Vec::as_slice).unwrap_or_default();
            fused.push(self.fuse_refs(date, sources));
            match date.checked_add_days(Days::new(1)) {
                Some(next) => date = next,
                None => break,
            }
        }

        let filled = fill_gaps(&mut fused, &self.required, self.config.max_gap_days);
        if filled > 0 {
            debug!("Gap filling interpolated {filled} values between {first} and {last}");
        }
        for day in &mut fused {
            discard_inverted_temperatures(day);
        }
        fused
    }

    fn fuse_refs(&self, date: NaiveDate, days: &[&ClimateDay]) -> FusedDay {
        let mut fused = FusedDay::empty(date);
        for variable in StandardVariable::ALL {
            fused.set(variable, self.fuse_variable(variable, days));
        }
        fused
    }

    fn fuse_variable(&self, variable: StandardVariable, days: &[&ClimateDay]) -> FusedValue {
        let mut candidates = self.candidates(variable, days);
        match candidates.len() {
            0 => FusedValue::unavailable(),
            1 => FusedValue::single(candidates[0].value, candidates[0].source.clone()),
            _ => {
                candidates.sort_by(|a, b| a.preference(b));
                let value = weighted_mean(&candidates);
                let sources = candidates.iter().map(|c| c.source.clone()).collect();
                FusedValue::weighted(value, sources)
            }
        }
    }

    /// Usable values for `variable`, at most one per source.
    fn candidates<'a>(&self, variable: StandardVariable, days: &[&'a ClimateDay]) -> Vec<Candidate<'a>> {
        let mut per_source: BTreeMap<&SourceId, Candidate<'a>> = BTreeMap::new();
        for day in days {
            let Some(value) = day.value(variable) else {
                continue;
            };
            let mut weight = self.reliability.weight(&day.source, variable);
            if day.is_derived(variable) {
                weight *= self.config.derived_weight_factor;
            }
            let candidate = Candidate {
                source: &day.source,
                value,
                weight,
                bias: self.reliability.bias(&day.source, variable),
                rank: self.reliability.rank(&day.source),
            };
            // A source that delivered the same date twice keeps its preferred reading.
            match per_source.get(&day.source) {
                Some(kept) if kept.preference(&candidate) != Ordering::Greater => {}
                _ => {
                    per_source.insert(&day.source, candidate);
                }
            }
        }
        per_source.into_values().collect()
    }
}

/// Marks both temperature extremes unavailable when max < min after fusion or gap filling.
fn discard_inverted_temperatures(day: &mut FusedDay) {
    let (Some(max), Some(min)) = (
        day.value(StandardVariable::TempMax),
        day.value(StandardVariable::TempMin),
    ) else {
        return;
    };
    if max < min {
        warn!(
            "Fused day {}: temp_max {} < temp_min {}, discarding both",
            day.date, max, min
        );
        day.set(StandardVariable::TempMax, FusedValue::unavailable());
        day.set(StandardVariable::TempMin, FusedValue::unavailable());
    }
}

/// `Σ(wᵢ·vᵢ) / Σwᵢ` over candidates already in sort order.
///
/// Falls back to the first candidate when every weight is zero. The result is held
/// inside the range of the inputs so rounding can never leave the physical limits.
fn weighted_mean(candidates: &[Candidate<'_>]) -> f64 {
    let (weighted_sum, weight_sum) = candidates
        .iter()
        .fold((0.0, 0.0), |(s, w), c| (s + c.weight * c.value, w + c.weight));
    if weight_sum <= 0.0 {
        return candidates[0].value;
    }

    let (lo, hi) = candidates
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.value), hi.max(c.value))
        });
    (weighted_sum / weight_sum).clamp(lo, hi)
}
