//! Result and Error types for vrtools-params

use crate::value::Dimension;

/// Type alias for `Result<T, params::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `vrtools-params` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Line could not be interpreted as a parameter definition
    #[error("failed to parse line {line}: \"{content}\"")]
    ParseError { line: usize, content: String },

    /// Characters before the colon are not a known type
    #[error("unknown parameter type \"{kind}\" for {name}")]
    UnknownType { name: String, kind: String },

    /// Unit is not recognised for a dimensioned value
    #[error("unknown unit \"{unit}\" for {name}")]
    UnknownUnit { name: String, unit: String },

    /// Declared vector length does not agree with the values given
    #[error("{name} declares {expected} values but {found} were found")]
    VectorLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Parameter was requested but never defined
    #[error("parameter {0} has not been defined")]
    MissingParameter(String),

    /// Parameter exists but holds a different type of value
    #[error("parameter {name} is {found}, expected {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Dimensioned parameter has the wrong physical dimension
    #[error("parameter {name} has dimension {found:?}, expected {expected:?}")]
    WrongDimension {
        name: String,
        expected: Dimension,
        found: Dimension,
    },
}
