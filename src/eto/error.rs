use crate::types::eto_result::EtoMethod;
use crate::types::variable::StandardVariable;
use chrono::NaiveDate;
use thiserror::Error;

/// Why a day has no ETo value. Affects only that day.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EtoError {
    #[error("insufficient data on {date}: neither Penman-Monteith nor Hargreaves-Samani can run (missing {missing:?})")]
    InsufficientData {
        date: NaiveDate,
        missing: Vec<StandardVariable>,
    },

    #[error("no elevation known for location ({latitude}, {longitude})")]
    MissingElevation { latitude: f64, longitude: f64 },

    #[error("{method} produced a non-finite value on {date}")]
    NonFiniteResult { date: NaiveDate, method: EtoMethod },
}
