//! Error types for record decoding.
//!
//! Malformed input is the only failure the aggregation pipeline knows
//! about; everything else (IO, network, config) is reported through
//! `anyhow` at the application layer.

use thiserror::Error;

/// A funding document or one of its records has the wrong shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecordError {
    /// The document root is not a JSON array
    #[error("funding data must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },

    /// An array element is not a JSON object
    #[error("record {index} is not an object (found {found})")]
    NotAnObject { index: usize, found: &'static str },

    /// A required field is absent or null
    #[error("record {index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// A required field has the wrong type
    #[error("record {index} has invalid `{field}`: expected {expected}")]
    InvalidField {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

impl MalformedRecordError {
    /// Position of the offending record, when the error concerns one.
    pub fn index(&self) -> Option<usize> {
        match self {
            MalformedRecordError::NotAnArray { .. } => None,
            MalformedRecordError::NotAnObject { index, .. }
            | MalformedRecordError::MissingField { index, .. }
            | MalformedRecordError::InvalidField { index, .. } => Some(*index),
        }
    }
}
