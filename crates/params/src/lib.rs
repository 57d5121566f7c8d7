//! Flat key/value parameter files
//!
//! Biasing policies are configured from plain text files of typed parameter
//! definitions, one per line:
//!
//! ```text
//! s:Vr/Importance/Type                       = "AutomaticImportanceSampling"
//! sv:Vr/Importance/ApplyBiasingInVolumesNamed = 1 "Phantom"
//! s:Vr/Importance/InputFile                  = "importance.bin"
//! i:Ge/Phantom/XBins                         = 10   # bins along x
//! dv:Vr/Window/EnergyBounds                  = 2 1 10 MeV
//! ```
//!
//! Everything is loaded into a [ParameterSet] which offers typed lookups,
//! converting dimensioned values to internal units (mm, MeV).
//!
//! ```rust
//! # use vrtools_params::{Dimension, ParameterSet};
//! let parameters = ParameterSet::parse(r#"
//!     dv:Vr/Window/EnergyBounds = 2 1 10 keV
//! "#).unwrap();
//!
//! let bounds = parameters.doubles("Vr/Window/EnergyBounds", Dimension::Energy).unwrap();
//! assert_eq!(bounds, &[1.0e-3, 1.0e-2]);
//! ```

// Split into subfiles for development, but anything important is re-exported
mod error;
mod parameter;
mod parsers;
mod value;

// Inline anything important for a nice public API
#[doc(inline)]
pub use parameter::ParameterSet;

#[doc(inline)]
pub use value::{Dimension, Value};

#[doc(inline)]
pub use error::{Error, Result};
