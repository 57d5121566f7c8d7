//! Population control for Monte Carlo particle transport
//!
//! The transport kernel calls a [Coordinator] at three points in the life of
//! a track: when it is created, at the end of every step, and after a
//! discrete interaction. The coordinator hands back a decision, and the
//! expected total weight of the population is preserved by every decision
//! it can make.
//!
//! Policies are configured once per run from a flat parameter set and are
//! immutable afterwards. Per-history state, including the random number
//! stream, is carried by a [HistoryContext] owned by the worker running the
//! history.
//!
//! ```rust
//! # use vrtools_biasing::{Coordinator, GeometryCatalog, HistoryContext, Kernel, Track, Species};
//! # use vrtools_biasing::Classification;
//! # use vrtools_params::ParameterSet;
//! # use nalgebra::Vector3;
//! /// Every electron has 1 mm of range and is 2 mm from the edge
//! struct Slab;
//!
//! impl Kernel for Slab {
//!     fn csda_range(&self, _: &Track) -> Option<f64> { Some(1.0) }
//!     fn distance_to_exit(&self, _: &Track) -> Option<f64> { Some(2.0) }
//! }
//!
//! let parameters = ParameterSet::parse(r#"
//!     s:Vr/Cut/Type            = "RangeRejection"
//!     sv:Vr/Cut/ParticlesNamed = 1 "e-"
//!     sv:Vr/Cut/Regions        = 1 "Target"
//! "#).unwrap();
//!
//! let catalog = GeometryCatalog::new().with_region("Target");
//! let coordinator = Coordinator::from_parameters(&parameters, &catalog).unwrap();
//!
//! let mut context = HistoryContext::new(2024, 1);
//! let electron = Track::primary(Species::Electron, 0.5, Vector3::zeros(), Vector3::z())
//!     .in_volume("Foil", "Target");
//!
//! assert_eq!(coordinator.classify(&mut context, &electron, &Slab), Classification::Kill);
//! ```

// Split into subfiles for development, but anything important is re-exported
mod config;
mod context;
mod coordinator;
mod error;
mod geometry;
mod kernel;
mod policies;
mod species;
mod split;
mod track;

// Inline anything important for a nice public API
#[doc(inline)]
pub use config::Configuration;

#[doc(inline)]
pub use context::HistoryContext;

#[doc(inline)]
pub use coordinator::Coordinator;

#[doc(inline)]
pub use geometry::{Component, GeometryCatalog, RegionSet, WORLD_REGION};

#[doc(inline)]
pub use kernel::{InteractionSampler, Kernel, OverlayCrossing, RunDirective, RunScopeKernel};

#[doc(inline)]
pub use policies::*;

#[doc(inline)]
pub use species::{ParticleFilter, Species, SpeciesPattern};

#[doc(inline)]
pub use split::{roulette, split, split_or_roulette, SplitDecision};

#[doc(inline)]
pub use track::{
    Classification, FinalState, ParentFate, ParentKinematics, Secondary, SplitRecord, Step, StepPoint,
    StepStatus, Track,
};

#[doc(inline)]
pub use error::{Error, Result};
