use crate::types::bitflags::eto::EtoFlags;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which formula produced an ETo value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtoMethod {
    PenmanMonteithFao56,
    HargreavesSamani,
}

impl EtoMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            EtoMethod::PenmanMonteithFao56 => "penman_monteith_fao56",
            EtoMethod::HargreavesSamani => "hargreaves_samani",
        }
    }
}

impl fmt::Display for EtoMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference evapotranspiration for one date. Never mutated once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EToResult {
    pub date: NaiveDate,
    /// Always ≥ 0.
    pub eto_mm_per_day: f64,
    pub method: EtoMethod,
    pub flags: EtoFlags,
}

impl EToResult {
    pub fn flag_names(&self) -> Vec<&'static str> {
        self.flags.names()
    }
}
