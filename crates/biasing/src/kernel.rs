//! Queries and callbacks provided by the transport kernel

// crate modules
use crate::track::{FinalState, Step, Track};

// vrtools modules
use vrtools_importance::Placement;

// external crates
use nalgebra::Vector3;

/// Geometry and physics queries answered by the transport kernel
///
/// Every query may fail by returning `None`, in which case the policy that
/// asked does nothing for that track.
pub trait Kernel {
    /// Continuous slowing down range of the track in its current material
    fn csda_range(&self, track: &Track) -> Option<f64>;

    /// Distance from the track position to the surface of its current solid
    /// along its direction of flight
    fn distance_to_exit(&self, track: &Track) -> Option<f64>;

    /// Half lengths of a box volume, centred on the origin of track positions
    fn box_half_lengths(&self, _volume: &str) -> Option<Vector3<f64>> {
        None
    }

    /// Placements of a step in an overlay world
    ///
    /// `None` when the track is not inside the overlay's biased volume.
    fn overlay_crossing(&self, _world: &str, _track: &Track, _step: &Step) -> Option<OverlayCrossing> {
        None
    }
}

/// Pre- and post-step placements of a track in an overlay world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayCrossing {
    pub pre: Placement,
    pub post: Placement,
    /// True if the step ended on an overlay boundary
    pub limited: bool,
}

/// Repeats a discrete interaction from the same initial state
pub trait InteractionSampler {
    /// Sample an independent outcome of the interaction that just happened
    fn resample(&mut self, track: &Track) -> FinalState;
}

/// Run-scope actions requested of the kernel before the first event
#[derive(Debug, Clone, PartialEq)]
pub enum RunDirective {
    /// Scale the cross section of a process, the kernel compensates weights
    EnhanceCrossSection { process: String, factor: f64 },
    /// Force an interaction within `distance` inside a region
    ForceInteraction {
        process: String,
        region: String,
        distance: f64,
        correct_by_weight: bool,
    },
    /// Split secondaries of a process below an energy limit
    SplitSecondaries {
        process: String,
        region: String,
        split_number: f64,
        maximum_energy: f64,
    },
    /// Restrict split secondaries to a sphere around a target
    DirectionalSplitting { target: Vector3<f64>, radius: f64 },
}

impl std::fmt::Display for RunDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::EnhanceCrossSection { process, factor } => {
                write!(f, "enhance {process} cross section by {factor}")
            }
            Self::ForceInteraction {
                process,
                region,
                distance,
                correct_by_weight,
            } => write!(
                f,
                "force {process} in {region} within {distance} mm (correct by weight: {correct_by_weight})"
            ),
            Self::SplitSecondaries {
                process,
                region,
                split_number,
                maximum_energy,
            } => write!(
                f,
                "split {process} secondaries in {region} by {split_number} below {maximum_energy} MeV"
            ),
            Self::DirectionalSplitting { target, radius } => write!(
                f,
                "directional splitting towards ({}, {}, {}) mm within {radius} mm",
                target.x, target.y, target.z
            ),
        }
    }
}

/// Receives run-scope directives once before the first event
pub trait RunScopeKernel {
    /// Apply a directive, or explain why it cannot be applied
    fn apply(&mut self, directive: &RunDirective) -> core::result::Result<(), String>;
}
