mod adapter;
mod catalog;
mod config;
mod engine;
mod error;
mod eto;
mod frames;
mod fusion;
mod harmonize;
mod types;
mod validation;

pub use error::EngineError;
pub use engine::*;

pub use adapter::{AdapterError, ElevationLookup, MemoryAdapter, SourceAdapter};
pub use config::{ConfigError, EngineConfig, LimitsConfig};
pub use frames::{eto_frame, filter_dates, fused_frame};

pub use catalog::error::CatalogError;
pub use catalog::units::{wind_to_2m, NativeUnit};
pub use catalog::variable_catalog::{CatalogEntry, Standardized, VariableCatalog};

pub use validation::limits::{Interval, LimitProfile, PhysicalLimits};
pub use validation::validator::Validator;

pub use harmonize::harmonizer::Harmonizer;

pub use fusion::fusion_engine::{FusionConfig, FusionEngine};
pub use fusion::gap_fill::fill_gaps;
pub use fusion::reliability::{ReliabilityTable, SourceReliability};

pub use eto::calculator::{EtoCalculator, EtoDayState, REQUIRED_INPUTS};
pub use eto::error::EtoError;
pub use eto::hargreaves::hargreaves_samani;
pub use eto::penman_monteith::{penman_monteith, PenmanMonteithInputs};
pub use eto::psychrometrics::*;
pub use eto::solar::{day_of_year, extraterrestrial_radiation};

pub use types::bitflags::eto::EtoFlags;
pub use types::climate_day::ClimateDay;
pub use types::eto_result::{EToResult, EtoMethod};
pub use types::fused_day::{FusedDay, FusedValue};
pub use types::location::LocationContext;
pub use types::quality::{FusionMethod, QualityFlag, SourceId};
pub use types::raw_record::RawDailyRecord;
pub use types::variable::{StandardVariable, Unit};
