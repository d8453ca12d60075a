//! Interfaces to the collaborators that supply raw data and elevations.
//!
//! Network access lives outside this crate. Implementations wrap a provider API,
//! a database or a file of previously fetched records.

use crate::types::quality::SourceId;
use crate::types::raw_record::RawDailyRecord;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors a [`SourceAdapter`] reports.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    #[error("{source_id} does not cover location ({latitude}, {longitude})")]
    Coverage {
        source_id: SourceId,
        latitude: f64,
        longitude: f64,
    },

    #[error("{source_id} cannot serve {start} to {end}: outside its supported horizon")]
    DateRange {
        source_id: SourceId,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("{source_id} failed: {message}")]
    Provider { source_id: SourceId, message: String },
}

impl AdapterError {
    pub fn source_id(&self) -> &SourceId {
        match self {
            AdapterError::Coverage { source_id, .. }
            | AdapterError::DateRange { source_id, .. }
            | AdapterError::Provider { source_id, .. } => source_id,
        }
    }

    /// The request lies outside what this provider can ever serve, so another source may succeed.
    pub fn is_retryable_elsewhere(&self) -> bool {
        matches!(self, AdapterError::Coverage { .. } | AdapterError::DateRange { .. })
    }

    /// The provider itself failed; retrying the same source later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AdapterError::Provider { .. })
    }
}

/// A provider of daily records in its native field names and units.
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> SourceId;

    /// Records for every available date in `start..=end`.
    fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawDailyRecord>, AdapterError>;
}

/// Resolves the ground elevation of a coordinate, in meters.
pub trait ElevationLookup: Send + Sync {
    fn get_elevation(&self, latitude: f64, longitude: f64) -> Option<f64>;
}

impl<F> ElevationLookup for F
where
    F: Fn(f64, f64) -> Option<f64> + Send + Sync,
{
    fn get_elevation(&self, latitude: f64, longitude: f64) -> Option<f64> {
        self(latitude, longitude)
    }
}

/// Replays records that were fetched earlier.
///
/// Serves only the dates it holds; a request entirely outside them is a
/// [`AdapterError::DateRange`].
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    source: SourceId,
    records: Vec<RawDailyRecord>,
}

impl MemoryAdapter {
    pub fn new(source: impl Into<SourceId>, records: Vec<RawDailyRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }
}

impl SourceAdapter for MemoryAdapter {
    fn source(&self) -> SourceId {
        self.source.clone()
    }

    fn fetch_daily(
        &self,
        _latitude: f64,
        _longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawDailyRecord>, AdapterError> {
        let records: Vec<RawDailyRecord> = self
            .records
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .cloned()
            .collect();
        if records.is_empty() && !self.records.is_empty() {
            return Err(AdapterError::DateRange {
                source_id: self.source.clone(),
                start,
                end,
            });
        }
        Ok(records)
    }
}
