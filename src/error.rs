use crate::adapter::AdapterError;
use crate::catalog::error::CatalogError;
use crate::config::ConfigError;
use crate::eto::error::EtoError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Eto(#[from] EtoError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("Elevation {0} m is outside [-500, 9000]")]
    InvalidElevation(f64),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed building DataFrame")]
    Frame(#[from] PolarsError),
}
