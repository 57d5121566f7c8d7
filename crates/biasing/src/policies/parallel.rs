//! Importance splitting and roulette on an overlay world

// crate modules
use crate::config::PolicyParameters;
use crate::error::Result;
use crate::kernel::Kernel;
use crate::policies::importance::ImportanceMap;
use crate::track::{SplitRecord, Step, Track};

// external crates
use log::trace;
use rand::Rng;

/// Importance splitting on voxel boundaries of a parallel world
///
/// Placements come from the kernel's overlay navigator rather than the mass
/// geometry. Tracks outside the overlay's biased volume, and steps that
/// were not limited by an overlay boundary, are left alone.
#[derive(Debug, Clone)]
pub struct ParallelImportanceSplitting {
    name: String,
    world: String,
    map: ImportanceMap,
}

impl ParallelImportanceSplitting {
    pub fn new(name: &str, world: &str, map: ImportanceMap) -> Self {
        Self {
            name: name.to_string(),
            world: world.to_string(),
            map,
        }
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let map = ImportanceMap::from_parameters(p)?;
        let world = match p.exists("ParallelWorldName") {
            true => p.string("ParallelWorldName")?,
            false => map.volume().to_string(),
        };
        Ok(Self::new(p.name(), &world, map))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn map(&self) -> &ImportanceMap {
        &self.map
    }

    pub fn apply<R, K>(&self, rng: &mut R, track: &Track, step: &Step, kernel: &K) -> SplitRecord
    where
        R: Rng + ?Sized,
        K: Kernel + ?Sized,
    {
        if track.step_number <= 1 {
            return SplitRecord::unchanged();
        }

        let Some(crossing) = kernel.overlay_crossing(&self.world, track, step) else {
            trace!("{}: track {} not active in {}", self.name, track.track_id, self.world);
            return SplitRecord::unchanged();
        };

        if !crossing.limited {
            return SplitRecord::unchanged();
        }

        self.map
            .decide(crossing.pre, crossing.post, track.weight, rng)
            .into_record(track, step.post.position)
    }
}
