// File: crates/chart-geometry/src/error.rs
// Summary: Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::series::ValueShape;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("item '{id}' references parent '{parent}' which has not been indexed")]
    MalformedHierarchy { id: String, parent: String },

    #[error("item '{id}' appears more than once")]
    DuplicateItem { id: String },

    #[error("item '{id}' has invalid weight {weight}")]
    InvalidWeight { id: String, weight: f64 },

    #[error("unknown series group '{name}'")]
    UnknownGroup { name: String },

    #[error("unknown series '{name}' in group '{group}'")]
    UnknownSeries { group: String, name: String },

    #[error("series group '{group}' holds {expected:?} values, got {found:?}")]
    ShapeMismatch { group: String, expected: ValueShape, found: ValueShape },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GeometryError>;
