//! Main entry point: harmonize → validate → fuse → compute, per location.

use crate::adapter::{AdapterError, ElevationLookup, SourceAdapter};
use crate::catalog::variable_catalog::VariableCatalog;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::eto::calculator::{EtoCalculator, EtoDayState};
use crate::eto::error::EtoError;
use crate::fusion::fusion_engine::FusionEngine;
use crate::harmonize::harmonizer::Harmonizer;
use crate::types::eto_result::EToResult;
use crate::types::fused_day::FusedDay;
use crate::types::location::LocationContext;
use crate::types::raw_record::RawDailyRecord;
use crate::validation::validator::Validator;
use bon::bon;
use chrono::NaiveDate;
use haversine::{distance, Location as HaversineLocation, Units};
use log::{info, warn};
use std::sync::Arc;

/// The terminal ETo state of one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    pub date: NaiveDate,
    pub state: EtoDayState,
}

impl DayOutcome {
    pub fn result(&self) -> Option<&EToResult> {
        self.state.result()
    }

    pub fn error(&self) -> Option<&EtoError> {
        match &self.state {
            EtoDayState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Everything one pipeline run produced for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub location: LocationContext,
    /// One fused day per calendar date in the input range, ascending.
    pub fused: Vec<FusedDay>,
    /// ETo outcome per fused day, same order.
    pub days: Vec<DayOutcome>,
    /// Native fields the catalog did not know, dropped during harmonization.
    pub unmapped_fields: usize,
    /// Raw records discarded because their coordinates were too far from the location.
    pub rejected_records: usize,
}

impl PipelineOutput {
    pub fn results(&self) -> impl Iterator<Item = &EToResult> {
        self.days.iter().filter_map(DayOutcome::result)
    }

    pub fn failures(&self) -> impl Iterator<Item = (NaiveDate, &EtoError)> {
        self.days.iter().filter_map(|d| d.error().map(|e| (d.date, e)))
    }
}

/// Records gathered from a set of adapters, plus the per-source failures.
#[derive(Debug, Clone, Default)]
pub struct Gathered {
    pub records: Vec<RawDailyRecord>,
    pub errors: Vec<AdapterError>,
}

/// One location's work in a batch.
#[derive(Debug, Clone)]
pub struct LocationJob {
    pub location: LocationContext,
    pub records: Vec<RawDailyRecord>,
}

/// The fusion and ETo engine.
///
/// Holds the catalog, limits and reliability table, built once and shared read-only.
/// Cloning is cheap and every clone shares the same tables.
///
/// # Examples
///
/// ```
/// use climate_eto::{ClimateEngine, LocationContext, RawDailyRecord};
/// use chrono::NaiveDate;
///
/// let engine = ClimateEngine::builder().build()?;
/// let location = LocationContext::builder()
///     .latitude(-15.78)
///     .longitude(-47.93)
///     .elevation(1172.0)
///     .build()?;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 30).unwrap();
/// let record = RawDailyRecord::new("nasa_power", date, -15.78, -47.93)
///     .with("T2M_MAX", Some(28.1))
///     .with("T2M_MIN", Some(14.9))
///     .with("T2M", Some(21.0));
///
/// let output = engine.run(&location, &[record]);
/// let eto = output.results().next().unwrap();
/// assert_eq!(eto.method.as_str(), "hargreaves_samani");
/// # Ok::<(), climate_eto::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClimateEngine {
    config: Arc<EngineConfig>,
    catalog: Arc<VariableCatalog>,
    harmonizer: Arc<Harmonizer>,
    fusion: Arc<FusionEngine>,
    calculator: EtoCalculator,
}

#[bon]
impl ClimateEngine {
    /// Builds the engine from a configuration, [`EngineConfig::default`] if none is given.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration does not validate, or
    /// [`EngineError::Catalog`] if its catalog entries conflict.
    #[builder]
    pub fn new(#[builder(default)] config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let catalog = Arc::new(VariableCatalog::new(config.catalog.iter().cloned())?);
        let validator = Arc::new(Validator::new(config.limits.build()));
        let harmonizer = Arc::new(Harmonizer::new(Arc::clone(&catalog), validator));
        let fusion = Arc::new(FusionEngine::new(
            Arc::new(config.reliability.clone()),
            catalog.required_variables(),
            config.fusion,
        ));
        Ok(Self {
            config: Arc::new(config),
            catalog,
            harmonizer,
            fusion,
            calculator: EtoCalculator::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    /// Unmapped fields seen by this engine and all its clones since construction.
    pub fn total_unmapped_fields(&self) -> usize {
        self.harmonizer.unmapped_fields()
    }

    /// Runs the full pipeline for one location.
    ///
    /// Never fails as a whole: field problems become quality flags and day problems
    /// become [`EtoDayState::Failed`] outcomes.
    pub fn run(&self, location: &LocationContext, records: &[RawDailyRecord]) -> PipelineOutput {
        let (accepted, rejected_records) = self.gate_by_distance(location, records);
        let (harmonized, unmapped_fields) = self.harmonizer.harmonize_all(&accepted);
        let fused = self.fusion.fuse_series(&harmonized);

        let days: Vec<DayOutcome> = fused
            .iter()
            .map(|day| {
                let state = EtoDayState::Pending.resolve(&self.calculator, day, location);
                if let EtoDayState::Failed(e) = &state {
                    warn!("No ETo for {}: {e}", day.date);
                }
                DayOutcome {
                    date: day.date,
                    state,
                }
            })
            .collect();

        let penman = days
            .iter()
            .filter(|d| matches!(d.state, EtoDayState::PenmanMonteithComputed(_)))
            .count();
        let hargreaves = days
            .iter()
            .filter(|d| matches!(d.state, EtoDayState::HargreavesComputed(_)))
            .count();
        info!(
            "({}, {}): {} days, {} Penman-Monteith, {} Hargreaves-Samani, {} failed; {} unmapped fields, {} records rejected",
            location.latitude,
            location.longitude,
            days.len(),
            penman,
            hargreaves,
            days.len() - penman - hargreaves,
            unmapped_fields,
            rejected_records
        );

        PipelineOutput {
            location: location.clone(),
            fused,
            days,
            unmapped_fields,
            rejected_records,
        }
    }

    /// Fetches `start..=end` from every adapter. A failing adapter is logged and
    /// reported in [`Gathered::errors`]; the others still contribute.
    pub fn gather(
        &self,
        adapters: &[Arc<dyn SourceAdapter>],
        location: &LocationContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Gathered {
        let mut gathered = Gathered::default();
        for adapter in adapters {
            match adapter.fetch_daily(location.latitude, location.longitude, start, end) {
                Ok(records) => gathered.records.extend(records),
                Err(e) => {
                    warn!("Skipping {}: {e}", adapter.source());
                    gathered.errors.push(e);
                }
            }
        }
        gathered
    }

    /// Fills a missing elevation through `lookup`. A location that already has one is returned as is,
    /// and so is one whose lookup result fails validation.
    pub fn resolve_location(&self, location: &LocationContext, lookup: &dyn ElevationLookup) -> LocationContext {
        if location.elevation.is_some() {
            return location.clone();
        }
        match lookup.get_elevation(location.latitude, location.longitude) {
            Some(elevation) => match location.with_elevation(elevation) {
                Ok(resolved) => resolved,
                Err(e) => {
                    warn!("Ignoring elevation lookup result: {e}");
                    location.clone()
                }
            },
            None => {
                warn!(
                    "Elevation lookup found nothing for ({}, {})",
                    location.latitude, location.longitude
                );
                location.clone()
            }
        }
    }

    /// Resolves elevation, gathers from every adapter and runs the pipeline.
    pub fn run_with_sources(
        &self,
        location: &LocationContext,
        adapters: &[Arc<dyn SourceAdapter>],
        lookup: &dyn ElevationLookup,
        start: NaiveDate,
        end: NaiveDate,
    ) -> (PipelineOutput, Vec<AdapterError>) {
        let location = self.resolve_location(location, lookup);
        let gathered = self.gather(adapters, &location, start, end);
        (self.run(&location, &gathered.records), gathered.errors)
    }

    /// Runs independent locations on tokio's blocking pool. Outputs keep job order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskJoin`] if a worker panicked.
    pub async fn run_batch(&self, jobs: Vec<LocationJob>) -> Result<Vec<PipelineOutput>, EngineError> {
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let engine = self.clone();
                tokio::task::spawn_blocking(move || engine.run(&job.location, &job.records))
            })
            .collect();

        let mut outputs = Vec::with_capacity(handles.len());
        for handle in handles {
            outputs.push(handle.await?);
        }
        Ok(outputs)
    }

    fn gate_by_distance(
        &self,
        location: &LocationContext,
        records: &[RawDailyRecord],
    ) -> (Vec<RawDailyRecord>, usize) {
        let Some(max_km) = self.config.max_source_distance_km else {
            return (records.to_vec(), 0);
        };

        let mut rejected = 0;
        let accepted = records
            .iter()
            .filter(|record| {
                let dist_km = distance(
                    HaversineLocation {
                        latitude: location.latitude,
                        longitude: location.longitude,
                    },
                    HaversineLocation {
                        latitude: record.latitude,
                        longitude: record.longitude,
                    },
                    Units::Kilometers,
                );
                if dist_km <= max_km {
                    true
                } else {
                    warn!(
                        "Rejecting {} record for {}: {:.1} km away (limit {:.1} km)",
                        record.source, record.date, dist_km, max_km
                    );
                    rejected += 1;
                    false
                }
            })
            .cloned()
            .collect();
        (accepted, rejected)
    }
}
