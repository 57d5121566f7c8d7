//! Importance splitting and roulette at voxel boundaries of one volume

// standard library
use std::sync::Arc;

// crate modules
use crate::config::PolicyParameters;
use crate::error::{Error, Result};
use crate::split::{split_or_roulette, SplitDecision};
use crate::track::{SplitRecord, Step, Track};

// vrtools modules
use vrtools_importance::{read_importance_file, BinCounts, CellIndexResolver, ImportanceField, Placement};

// external crates
use log::{info, trace};
use rand::Rng;

/// Default ceiling on the number of copies from a single split
pub const DEFAULT_MAXIMUM_SPLIT: u32 = 100;

/// Importance field of a voxelised volume with its index resolver
///
/// The field itself is shared, so cloning a map is cheap.
#[derive(Debug, Clone)]
pub struct ImportanceMap {
    volume: String,
    field: Arc<ImportanceField>,
    resolver: CellIndexResolver,
    maximum_split: u32,
}

impl ImportanceMap {
    pub fn new(volume: &str, field: Arc<ImportanceField>, maximum_split: u32) -> Self {
        Self {
            volume: volume.to_string(),
            resolver: CellIndexResolver::new(field.bins()),
            field,
            maximum_split,
        }
    }

    /// Load the map named by `InputFile` for the single biased volume
    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let volumes = p.volumes("ApplyBiasingInVolumesNamed")?;
        if volumes.names().len() != 1 {
            return Err(Error::SingleVolumeRequired {
                parameter: p.full("ApplyBiasingInVolumesNamed"),
                found: volumes.names().len(),
            });
        }
        let volume = volumes.names()[0].clone();

        let bins = BinCounts::new(
            p.geometry_bins(&volume, "XBins")?,
            p.geometry_bins(&volume, "YBins")?,
            p.geometry_bins(&volume, "ZBins")?,
        )
        .map_err(|source| Error::InvalidGrid {
            volume: volume.clone(),
            source,
        })?;

        let maximum_split = match p.exists("MaximumSplitNumber") {
            true => p.positive_integer("MaximumSplitNumber")?,
            false => DEFAULT_MAXIMUM_SPLIT,
        };

        let path = p.string("InputFile")?;
        let field = read_importance_file(&path, bins)?;
        info!(
            "{}: importance map of {} elements for {volume}",
            p.name(),
            field.len()
        );

        Ok(Self::new(&volume, Arc::new(field), maximum_split))
    }

    pub fn volume(&self) -> &str {
        &self.volume
    }

    pub fn field(&self) -> &Arc<ImportanceField> {
        &self.field
    }

    pub fn maximum_split(&self) -> u32 {
        self.maximum_split
    }

    /// Split or roulette for a move between two placements
    ///
    /// Placements outside the grid and moves within one cell are no-ops.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        pre: Placement,
        post: Placement,
        weight: f64,
        rng: &mut R,
    ) -> SplitDecision {
        let (Some(from), Some(to)) = (self.resolver.resolve(pre), self.resolver.resolve(post)) else {
            trace!("{pre:?} -> {post:?} is outside the importance grid of {}", self.volume);
            return SplitDecision::Unchanged;
        };

        if from == to {
            return SplitDecision::Unchanged;
        }

        match (self.field.importance(from), self.field.importance(to)) {
            (Some(a), Some(b)) => split_or_roulette(a, b, weight, self.maximum_split, rng),
            _ => SplitDecision::Unchanged,
        }
    }
}

/// Importance splitting on voxel boundaries of the mass geometry
///
/// Acts on boundary-limited steps with both ends inside the biased volume.
/// The first step of a track has no meaningful starting cell and is skipped.
#[derive(Debug, Clone)]
pub struct ImportanceSplitting {
    name: String,
    map: ImportanceMap,
}

impl ImportanceSplitting {
    pub fn new(name: &str, map: ImportanceMap) -> Self {
        Self {
            name: name.to_string(),
            map,
        }
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        Ok(Self::new(p.name(), ImportanceMap::from_parameters(p)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map(&self) -> &ImportanceMap {
        &self.map
    }

    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, track: &Track, step: &Step) -> SplitRecord {
        if track.step_number <= 1 || !step.at_boundary() {
            return SplitRecord::unchanged();
        }

        let volume = self.map.volume();
        if !step.pre.volume.eq_ignore_ascii_case(volume) || !step.post.volume.eq_ignore_ascii_case(volume) {
            return SplitRecord::unchanged();
        }

        let (Some(pre), Some(post)) = (step.pre.placement, step.post.placement) else {
            trace!("{}: step in {volume} without a voxel placement", self.name);
            return SplitRecord::unchanged();
        };

        self.map
            .decide(pre, post, track.weight, rng)
            .into_record(track, step.post.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use crate::track::{StepPoint, StepStatus};
    use nalgebra::Vector3;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn policy() -> ImportanceSplitting {
        let bins = BinCounts::new(3, 1, 1).unwrap();
        let field = ImportanceField::from_values(bins, vec![1.0, 4.0, 4.0]).unwrap();
        ImportanceSplitting::new("Importance", ImportanceMap::new("Phantom", Arc::new(field), 100))
    }

    fn step(pre: Placement, post: Placement, status: StepStatus) -> Step {
        Step::new(
            StepPoint::new(Vector3::zeros(), "Phantom", "Target", StepStatus::Other)
                .with_placement(pre),
            StepPoint::new(Vector3::x(), "Phantom", "Target", status).with_placement(post),
        )
    }

    fn track(step_number: u32) -> Track {
        let mut track = Track::primary(Species::Neutron, 2.0, Vector3::x(), Vector3::x())
            .in_volume("Phantom", "Target");
        track.step_number = step_number;
        track
    }

    #[test]
    fn splits_into_higher_importance() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let record = policy().apply(&mut rng, &track(3), &step([0, 0, 0], [1, 0, 0], StepStatus::GeometryBoundary));
        assert_eq!(record.population(), 4);
        assert!((record.total_weight(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn first_step_skipped() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let record = policy().apply(&mut rng, &track(1), &step([0, 0, 0], [1, 0, 0], StepStatus::GeometryBoundary));
        assert!(record.is_unchanged());
    }

    #[test]
    fn only_at_boundaries() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let record = policy().apply(&mut rng, &track(3), &step([0, 0, 0], [1, 0, 0], StepStatus::Interaction));
        assert!(record.is_unchanged());
    }

    #[test]
    fn equal_importance_and_outside_grid() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let p = policy();
        assert!(p
            .apply(&mut rng, &track(3), &step([1, 0, 0], [2, 0, 0], StepStatus::GeometryBoundary))
            .is_unchanged());
        assert!(p
            .apply(&mut rng, &track(3), &step([2, 0, 0], [3, 0, 0], StepStatus::GeometryBoundary))
            .is_unchanged());
    }
}
