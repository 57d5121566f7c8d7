//! Killing of untracked species

// crate modules
use crate::config::PolicyParameters;
use crate::error::Result;
use crate::geometry::RegionSet;
use crate::species::ParticleFilter;
use crate::track::{Classification, Track};

/// Kills every new track whose species fails the filter
///
/// Tracks created inside one of the exempt volumes are never killed.
#[derive(Debug, Clone)]
pub struct KillOtherParticles {
    name: String,
    filter: ParticleFilter,
    exempt: RegionSet,
}

impl KillOtherParticles {
    pub fn new(name: &str, filter: ParticleFilter) -> Self {
        Self {
            name: name.to_string(),
            filter,
            exempt: RegionSet::default(),
        }
    }

    pub fn with_exempt_volumes(mut self, exempt: RegionSet) -> Self {
        self.exempt = exempt;
        self
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let filter = p.particle_filter("OnlyTrackParticlesNamed", "OnlyTrackParticlesNotNamed")?;
        let mut policy = Self::new(p.name(), filter);

        if p.exists("HaveNoEffectInComponentsNamed") {
            policy = policy.with_exempt_volumes(p.volumes("HaveNoEffectInComponentsNamed")?);
        }
        Ok(policy)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classify(&self, track: &Track) -> Classification {
        if self.exempt.contains(&track.volume) || self.filter.accepts(&track.species) {
            return Classification::Continue;
        }
        Classification::Kill
    }
}
