use thiserror::Error;

use crate::core::models::table::TableError;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Coordinate sets differ in size: expected {expected} points, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Coordinate set is empty")]
    EmptyCoordinates,

    #[error("Principal axis index {0} is out of range (expected 0, 1 or 2)")]
    InvalidAxis(usize),

    #[error("Cannot align an empty sequence")]
    EmptySequence,

    #[error("Found {0} chain segments, more than there are chain identifiers")]
    TooManyChains(usize),

    #[error("Matrix decomposition failed: {0}")]
    Decomposition(&'static str),

    #[error("Atom table error: {0}")]
    Table(#[from] TableError),
}
