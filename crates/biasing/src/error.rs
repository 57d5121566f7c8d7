//! Result and Error types for the biasing module

/// Type alias for `Result<T, biasing::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `vrtools-biasing`
///
/// Every variant is a configuration error. Problems met while tracks are
/// being transported are recovered locally and never surface here.
pub enum Error {
    /// Parameter lookup or parsing failure
    #[error(transparent)]
    ParameterError(#[from] vrtools_params::Error),

    /// Importance map loading or validation failure
    #[error(transparent)]
    ImportanceError(#[from] vrtools_importance::Error),

    /// Type of a `Vr/<name>/Type` parameter is not recognised
    #[error("{parameter} refers to an unknown biasing type \"{kind}\"")]
    UnknownBiasingType { parameter: String, kind: String },

    /// Two parameters that may not be used together were both defined
    #[error("{first} is incompatible with {second}")]
    IncompatibleParameters { first: String, second: String },

    /// One of a set of alternative parameters is required
    #[error("one of {first} or {second} must be defined")]
    MissingAlternative { first: String, second: String },

    /// Paired parameter vectors have different lengths
    #[error("{parameter} has {found} elements but must match the {expected} of {reference}")]
    VectorLengthMismatch {
        parameter: String,
        expected: usize,
        reference: String,
        found: usize,
    },

    /// Particle name could not be resolved to a species
    #[error("{parameter} has unknown particle name \"{name}\"")]
    UnknownParticle { parameter: String, name: String },

    /// Region is not part of the geometry
    #[error("{parameter} refers to region \"{name}\" which does not exist")]
    UnknownRegion { parameter: String, name: String },

    /// Volume is not part of the geometry
    #[error("{parameter} refers to volume \"{name}\" which does not exist")]
    UnknownVolume { parameter: String, name: String },

    /// Component is not part of the geometry
    #[error("{parameter} refers to component \"{name}\" which does not exist")]
    UnknownComponent { parameter: String, name: String },

    /// Numeric parameter is out of its allowed range
    #[error("{parameter} = {value} is invalid, must be {requirement}")]
    InvalidValue {
        parameter: String,
        value: f64,
        requirement: &'static str,
    },

    /// String parameter is not one of the accepted options
    #[error("{parameter} = \"{value}\" is not one of {options}")]
    InvalidOption {
        parameter: String,
        value: String,
        options: &'static str,
    },

    /// Bin counts of a voxelised volume cannot describe an importance grid
    #[error("Ge/{volume}/XBins, YBins and ZBins do not describe a usable grid")]
    InvalidGrid {
        volume: String,
        #[source]
        source: vrtools_importance::Error,
    },

    /// Importance sampling biases exactly one volume
    #[error("{parameter} must name exactly one volume, found {found}")]
    SingleVolumeRequired { parameter: String, found: usize },

    /// More than one policy of the same kind was configured
    #[error("policies \"{first}\" and \"{second}\" are both of kind {kind}")]
    DuplicatePolicy {
        kind: &'static str,
        first: String,
        second: String,
    },

    /// Transport kernel refused a run-scope directive
    #[error("run-scope directive for \"{policy}\" was rejected: {reason}")]
    RunScopeRejected { policy: String, reason: String },
}
