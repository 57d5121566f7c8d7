//! Range rejection of tracks that cannot leave their region

// crate modules
use crate::config::PolicyParameters;
use crate::error::Result;
use crate::geometry::RegionSet;
use crate::kernel::Kernel;
use crate::species::ParticleFilter;
use crate::track::{Classification, Track};

// external crates
use log::trace;

/// Kills tracks whose residual range is shorter than the way out
///
/// Deterministic and conservative. Anything the kernel cannot answer
/// leaves the track alone.
#[derive(Debug, Clone)]
pub struct RangeRejection {
    name: String,
    filter: ParticleFilter,
    regions: RegionSet,
}

impl RangeRejection {
    pub fn new(name: &str, filter: ParticleFilter, regions: RegionSet) -> Self {
        Self {
            name: name.to_string(),
            filter,
            regions,
        }
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let filter = p.particle_filter("ParticlesNamed", "ParticlesNotNamed")?;
        let regions = p.regions("Regions")?;
        Ok(Self::new(p.name(), filter, regions))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classify<K: Kernel + ?Sized>(&self, track: &Track, kernel: &K) -> Classification {
        if !self.filter.accepts(&track.species) || !self.regions.contains(&track.region) {
            return Classification::Continue;
        }

        let (Some(range), Some(distance)) = (kernel.csda_range(track), kernel.distance_to_exit(track)) else {
            trace!("{}: no range or exit distance for track {}", self.name, track.track_id);
            return Classification::Continue;
        };

        if range < distance {
            trace!("{}: range {range} mm < {distance} mm, killing track {}", self.name, track.track_id);
            return Classification::Kill;
        }

        Classification::Continue
    }
}
