use crate::catalog::units::NativeUnit;
use crate::types::quality::SourceId;
use crate::types::variable::StandardVariable;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// The (source, native name) pair has no catalog entry. Recoverable: the field is dropped.
    #[error("Unknown variable '{name}' for source '{source_id}'")]
    UnknownVariable { source_id: SourceId, name: String },

    #[error("Duplicate catalog entry for source '{source_id}', variable '{name}'")]
    DuplicateEntry { source_id: SourceId, name: String },

    #[error("Native unit {unit:?} cannot be converted into the unit of '{variable}'")]
    IncompatibleUnit {
        variable: StandardVariable,
        unit: NativeUnit,
    },
}
