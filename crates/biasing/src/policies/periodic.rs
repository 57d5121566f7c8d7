//! Periodic boundaries on box volumes

// crate modules
use crate::config::PolicyParameters;
use crate::error::Result;
use crate::geometry::RegionSet;
use crate::kernel::Kernel;
use crate::track::{SplitRecord, Step, Track};

// external crates
use log::trace;

/// Default tolerance for deciding that a point lies on a box face, in mm
pub const DEFAULT_SURFACE_TOLERANCE: f64 = 1.0e-9;

/// Wraps tracks leaving a box back in through the opposite face
///
/// A track leaving one of the configured boxes is killed and replaced by an
/// identical track on the opposite face. Axes are tested in x, y, z order
/// and only the first face hit is wrapped.
#[derive(Debug, Clone)]
pub struct PeriodicBoundary {
    name: String,
    volumes: RegionSet,
    min_parent_id: i32,
    tolerance: f64,
}

impl PeriodicBoundary {
    pub fn new(name: &str, volumes: RegionSet) -> Self {
        Self {
            name: name.to_string(),
            volumes,
            min_parent_id: 1,
            tolerance: DEFAULT_SURFACE_TOLERANCE,
        }
    }

    /// Tracks whose parent id is below this are never wrapped
    pub fn with_min_parent_id(mut self, min_parent_id: i32) -> Self {
        self.min_parent_id = min_parent_id;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let mut policy = Self::new(p.name(), p.volumes("ApplyBiasingInVolumesNamed")?);

        if p.exists("MinParentID") {
            policy = policy.with_min_parent_id(p.non_negative_integer("MinParentID")?);
        }
        if p.exists("SurfaceTolerance") {
            policy = policy.with_tolerance(p.positive_length("SurfaceTolerance")?);
        }

        Ok(policy)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replacement for a track leaving a periodic box, if any
    ///
    /// Returns `None` when the step does not leave a configured box, so the
    /// caller can go on to other step policies.
    pub fn apply<K: Kernel + ?Sized>(
        &self,
        track: &Track,
        step: &Step,
        kernel: &K,
    ) -> Option<SplitRecord> {
        if track.parent_id < self.min_parent_id || track.track_id < 0 || !step.at_boundary() {
            return None;
        }

        if !self.volumes.contains(&step.pre.volume) {
            return None;
        }

        let Some(half) = kernel.box_half_lengths(&step.pre.volume) else {
            trace!("{}: no box dimensions for {}", self.name, step.pre.volume);
            return None;
        };

        let position = step.post.position;
        for axis in 0..3 {
            if (position[axis].abs() - half[axis]).abs() <= self.tolerance {
                let mut wrapped = position;
                wrapped[axis] = -half[axis].copysign(position[axis]);
                trace!("{}: wrapped track {} on axis {axis}", self.name, track.track_id);
                return Some(SplitRecord::replaced_by(track.to_secondary(wrapped, track.weight)));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use crate::track::{ParentFate, StepPoint, StepStatus};
    use nalgebra::Vector3;

    struct Box10;

    impl Kernel for Box10 {
        fn csda_range(&self, _: &Track) -> Option<f64> {
            None
        }
        fn distance_to_exit(&self, _: &Track) -> Option<f64> {
            None
        }
        fn box_half_lengths(&self, _: &str) -> Option<Vector3<f64>> {
            Some(Vector3::new(5.0, 5.0, 5.0))
        }
    }

    fn leaving(position: Vector3<f64>) -> Step {
        Step::new(
            StepPoint::new(Vector3::zeros(), "Cell", "Target", StepStatus::Other),
            StepPoint::new(position, "World", "DefaultRegionForTheWorld", StepStatus::GeometryBoundary),
        )
    }

    fn secondary_track() -> Track {
        Track::primary(Species::Electron, 0.1, Vector3::zeros(), Vector3::x()).created_by(2, 1, "compt")
    }

    #[test]
    fn first_matching_axis_wins() {
        let policy = PeriodicBoundary::new("Periodic", RegionSet::new(["Cell"]));
        let record = policy
            .apply(&secondary_track(), &leaving(Vector3::new(5.0, -5.0, 1.0)), &Box10)
            .unwrap();

        assert_eq!(record.parent, ParentFate::Killed);
        assert_eq!(record.secondaries.len(), 1);
        assert_eq!(record.secondaries[0].position, Vector3::new(-5.0, -5.0, 1.0));
        assert_eq!(record.total_weight(1.0), 1.0);
    }

    #[test]
    fn primaries_excluded_by_default() {
        let policy = PeriodicBoundary::new("Periodic", RegionSet::new(["Cell"]));
        let primary = Track::primary(Species::Electron, 0.1, Vector3::zeros(), Vector3::x());
        assert!(policy.apply(&primary, &leaving(Vector3::new(5.0, 0.0, 0.0)), &Box10).is_none());

        let policy = policy.with_min_parent_id(0);
        assert!(policy.apply(&primary, &leaving(Vector3::new(5.0, 0.0, 0.0)), &Box10).is_some());
    }

    #[test]
    fn not_on_a_face() {
        let policy = PeriodicBoundary::new("Periodic", RegionSet::new(["Cell"]));
        assert!(policy
            .apply(&secondary_track(), &leaving(Vector3::new(4.0, 0.0, 0.0)), &Box10)
            .is_none());
    }
}
