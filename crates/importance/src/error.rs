//! Result and Error types for the importance module

/// Type alias for `Result<T, importance::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `vrtools-importance`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to deserialise or serialise a byte stream
    #[error("failed to deserialise byte stream")]
    UnableToDeserialise(#[from] Box<bincode::ErrorKind>),

    /// Every axis needs at least one bin
    #[error("number of {axis} bins must be at least 1")]
    ZeroBins { axis: char },

    /// Product of the bin counts is too large to address
    #[error("{nx}x{ny}x{nz} bins is too many cells for one importance map")]
    TooManyCells { nx: usize, ny: usize, nz: usize },

    /// Importance values must be finite and strictly positive
    #[error("invalid importance {value} at index {index}")]
    InvalidImportance { index: usize, value: f64 },

    /// Fewer values than voxels
    #[error("importance map is truncated (expected {expected} values, found {found})")]
    Truncated { expected: usize, found: usize },

    /// More data than voxels
    #[error("importance map has data beyond the expected {expected} values")]
    TrailingData { expected: usize },

    /// Values given directly do not fill the grid
    #[error("expected {expected} importance values, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}
