//! Track, step and decision records exchanged with the transport kernel

// crate modules
use crate::geometry::WORLD_REGION;
use crate::species::Species;

// vrtools modules
use vrtools_importance::Placement;

// external crates
use nalgebra::Vector3;

/// Snapshot of a particle track as seen by the biasing policies
///
/// Lengths are in mm and energies in MeV. The kernel owns the real track, so
/// nothing here is ever mutated by a policy. Decisions come back as
/// [Classification], [SplitRecord] or [FinalState] values instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub track_id: i32,
    /// Zero for primaries
    pub parent_id: i32,
    pub species: Species,
    /// Statistical weight, always positive
    pub weight: f64,
    pub kinetic_energy: f64,
    pub position: Vector3<f64>,
    /// Unit momentum direction
    pub direction: Vector3<f64>,
    /// Number of steps taken so far, 0 for a new track
    pub step_number: u32,
    pub volume: String,
    pub region: String,
    /// Name of the process that created the track, `None` for primaries
    pub creator_process: Option<String>,
}

impl Track {
    /// New primary track of unit weight in the world region
    ///
    /// ```rust
    /// # use vrtools_biasing::{Species, Track};
    /// # use nalgebra::Vector3;
    /// let track = Track::primary(Species::Gamma, 6.0, Vector3::zeros(), Vector3::z())
    ///     .in_volume("Phantom", "Target")
    ///     .with_weight(0.5);
    ///
    /// assert!(track.is_primary());
    /// assert_eq!(track.region, "Target");
    /// ```
    pub fn primary(
        species: Species,
        kinetic_energy: f64,
        position: Vector3<f64>,
        direction: Vector3<f64>,
    ) -> Self {
        Self {
            track_id: 1,
            parent_id: 0,
            species,
            weight: 1.0,
            kinetic_energy,
            position,
            direction,
            step_number: 0,
            volume: "World".to_string(),
            region: WORLD_REGION.to_string(),
            creator_process: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn in_volume(mut self, volume: &str, region: &str) -> Self {
        self.volume = volume.to_string();
        self.region = region.to_string();
        self
    }

    /// Mark as a secondary of `parent_id` created by `process`
    pub fn created_by(mut self, track_id: i32, parent_id: i32, process: &str) -> Self {
        self.track_id = track_id;
        self.parent_id = parent_id;
        self.creator_process = Some(process.to_string());
        self
    }

    pub fn is_primary(&self) -> bool {
        self.parent_id == 0
    }

    /// Copy of this track's state as a new secondary
    pub fn to_secondary(&self, position: Vector3<f64>, weight: f64) -> Secondary {
        Secondary {
            species: self.species,
            kinetic_energy: self.kinetic_energy,
            position,
            direction: self.direction,
            weight,
        }
    }
}

/// Why a step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Limited by a volume boundary
    GeometryBoundary,
    /// Left the world volume
    WorldBoundary,
    /// Limited by a discrete interaction
    Interaction,
    Other,
}

/// One end of a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepPoint {
    pub position: Vector3<f64>,
    pub volume: String,
    pub region: String,
    /// Replica numbers along x, y and z when inside a voxelised volume
    pub placement: Option<Placement>,
    pub status: StepStatus,
}

impl StepPoint {
    pub fn new(position: Vector3<f64>, volume: &str, region: &str, status: StepStatus) -> Self {
        Self {
            position,
            volume: volume.to_string(),
            region: region.to_string(),
            placement: None,
            status,
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }
}

/// A completed step, pre- and post-step points
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub pre: StepPoint,
    pub post: StepPoint,
}

impl Step {
    pub fn new(pre: StepPoint, post: StepPoint) -> Self {
        Self { pre, post }
    }

    pub fn at_boundary(&self) -> bool {
        self.post.status == StepStatus::GeometryBoundary
    }
}

/// New track to be created by the kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Secondary {
    pub species: Species,
    pub kinetic_energy: f64,
    pub position: Vector3<f64>,
    pub direction: Vector3<f64>,
    pub weight: f64,
}

/// Decision at track creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Continue,
    Kill,
}

/// What happens to the track that triggered a decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentFate {
    Unchanged,
    /// Continue with a new weight
    Reweighted(f64),
    Killed,
}

/// Outcome of a step-boundary decision
///
/// The parent continues, is reweighted, or is killed. Any new tracks are
/// value records handed back to the kernel, which owns them from then on.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRecord {
    pub parent: ParentFate,
    pub secondaries: Vec<Secondary>,
}

impl SplitRecord {
    pub fn unchanged() -> Self {
        Self {
            parent: ParentFate::Unchanged,
            secondaries: Vec::new(),
        }
    }

    pub fn killed() -> Self {
        Self {
            parent: ParentFate::Killed,
            secondaries: Vec::new(),
        }
    }

    /// Kill the parent and replace it with a single new track
    pub fn replaced_by(secondary: Secondary) -> Self {
        Self {
            parent: ParentFate::Killed,
            secondaries: vec![secondary],
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.parent == ParentFate::Unchanged && self.secondaries.is_empty()
    }

    /// Weight of the parent after the decision, zero if killed
    pub fn parent_weight(&self, original: f64) -> f64 {
        match self.parent {
            ParentFate::Unchanged => original,
            ParentFate::Reweighted(w) => w,
            ParentFate::Killed => 0.0,
        }
    }

    /// Sum of the weights of every track that survives the decision
    ///
    /// ```rust
    /// # use vrtools_biasing::{ParentFate, SplitRecord};
    /// let record = SplitRecord::killed();
    /// assert_eq!(record.total_weight(2.0), 0.0);
    ///
    /// let record = SplitRecord { parent: ParentFate::Reweighted(4.0), secondaries: vec![] };
    /// assert_eq!(record.total_weight(1.0), 4.0);
    /// ```
    pub fn total_weight(&self, original: f64) -> f64 {
        self.parent_weight(original) + self.secondaries.iter().map(|s| s.weight).sum::<f64>()
    }

    /// Number of tracks that survive the decision, parent included
    pub fn population(&self) -> usize {
        let parent = usize::from(self.parent != ParentFate::Killed);
        parent + self.secondaries.len()
    }
}

/// Kinematics of the interacting track after an interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentKinematics {
    pub kinetic_energy: f64,
    pub direction: Vector3<f64>,
    pub weight: f64,
}

/// Result of a discrete interaction
///
/// `parent` is `None` when the interaction absorbed the track.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalState {
    pub parent: Option<ParentKinematics>,
    pub secondaries: Vec<Secondary>,
}

impl FinalState {
    /// Total weight of the parent and every secondary
    pub fn total_weight(&self) -> f64 {
        self.parent.map_or(0.0, |p| p.weight) + self.secondaries.iter().map(|s| s.weight).sum::<f64>()
    }
}
