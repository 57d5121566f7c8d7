//! Directional Russian roulette of secondaries aimed away from a target

// crate modules
use crate::config::PolicyParameters;
use crate::error::{Error, Result};
use crate::geometry::Component;
use crate::track::{Classification, Track};

// vrtools modules
use vrtools_params::Dimension;

// external crates
use log::{debug, trace};
use nalgebra::Vector3;

/// Disc a secondary of a given process must be heading for
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalTarget {
    pub process: String,
    /// Distance of the disc centre along the reference axis, in mm
    pub limit: f64,
    /// Radius of the disc, in mm
    pub radius: f64,
}

/// Kills secondaries whose straight-line path misses a target disc
///
/// The disc for each target sits at `limit * axis + translation` of the
/// reference component, facing the origin. Only tracks created in one of
/// the listed regions by one of the listed processes are considered, and
/// the cut is deterministic.
#[derive(Debug, Clone)]
pub struct DirectionalRussianRoulette {
    name: String,
    reference: Option<Component>,
    regions: Vec<(String, Vec<DirectionalTarget>)>,
}

impl DirectionalRussianRoulette {
    pub fn new(name: &str, reference: Component) -> Self {
        Self {
            name: name.to_string(),
            reference: Some(reference),
            regions: Vec::new(),
        }
    }

    pub fn with_region(mut self, region: &str, targets: Vec<DirectionalTarget>) -> Self {
        self.regions.push((region.to_string(), targets));
        self
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let regions = p.bracketed_names("", "/DirectionalSplitLimits");

        // the reference component only matters once a region has targets
        let mut policy = Self {
            name: p.name().to_string(),
            reference: None,
            regions: Vec::new(),
        };
        if regions.is_empty() {
            debug!("{}: no regions with directional split limits", policy.name);
            return Ok(policy);
        }

        let component = p.string("ReferenceComponent")?;
        let reference = p.catalog().component(&component).copied().ok_or_else(|| {
            Error::UnknownComponent {
                parameter: p.full("ReferenceComponent"),
                name: component.clone(),
            }
        })?;
        policy.reference = Some(reference);

        for region in regions {
            p.check_region(&format!("{region}/DirectionalSplitLimits"), &region)?;

            let processes = format!("{region}/processesNamed");
            let limits = format!("{region}/DirectionalSplitLimits");
            let radii = format!("{region}/DirectionalSplitRadius");
            p.check_lengths(&processes, &[&limits, &radii])?;

            let targets = p
                .strings(&processes)?
                .into_iter()
                .zip(p.doubles(&limits, Dimension::Length)?)
                .zip(p.doubles(&radii, Dimension::Length)?)
                .map(|((process, limit), radius)| DirectionalTarget {
                    process,
                    limit,
                    radius,
                })
                .collect::<Vec<DirectionalTarget>>();

            policy = policy.with_region(&region, targets);
        }

        Ok(policy)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classify(&self, track: &Track) -> Classification {
        let Some(creator) = &track.creator_process else {
            return Classification::Continue;
        };

        let targets = self
            .regions
            .iter()
            .filter(|(region, _)| region.eq_ignore_ascii_case(&track.region))
            .flat_map(|(_, targets)| targets.iter())
            .filter(|target| &target.process == creator);

        for target in targets {
            if !self.heads_for(track, target) {
                trace!("{}: track {} misses the disc at {} mm", self.name, track.track_id, target.limit);
                return Classification::Kill;
            }
        }

        Classification::Continue
    }

    /// Whether the straight-line path of a track crosses the target disc
    pub fn heads_for(&self, track: &Track, target: &DirectionalTarget) -> bool {
        let Some(reference) = &self.reference else {
            return true;
        };
        let centre: Vector3<f64> = target.limit * reference.axis + reference.translation;
        let Some(unit) = centre.try_normalize(0.0) else {
            return true;
        };
        let normal = -unit;

        let s = -normal.dot(&(track.position - centre)) / normal.dot(&track.direction);
        if !s.is_finite() || s < 0.0 {
            return false;
        }

        let hit = track.position + s * track.direction - centre;
        target.radius >= hit.x.hypot(hit.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;

    fn policy() -> DirectionalRussianRoulette {
        let source = Component::new(Vector3::zeros(), Vector3::z());
        DirectionalRussianRoulette::new("Roulette", source).with_region(
            "Target",
            vec![DirectionalTarget {
                process: "eBrem".to_string(),
                limit: 100.0,
                radius: 10.0,
            }],
        )
    }

    fn photon(direction: Vector3<f64>) -> Track {
        Track::primary(Species::Gamma, 1.0, Vector3::zeros(), direction)
            .in_volume("Foil", "Target")
            .created_by(2, 1, "eBrem")
    }

    #[test]
    fn towards_the_disc() {
        assert_eq!(policy().classify(&photon(Vector3::z())), Classification::Continue);

        let slanted = Vector3::new(0.05, 0.0, 1.0).normalize();
        assert_eq!(policy().classify(&photon(slanted)), Classification::Continue);
    }

    #[test]
    fn away_from_the_disc() {
        assert_eq!(policy().classify(&photon(-Vector3::z())), Classification::Kill);
        assert_eq!(policy().classify(&photon(Vector3::x())), Classification::Kill);

        let wide = Vector3::new(0.5, 0.0, 1.0).normalize();
        assert_eq!(policy().classify(&photon(wide)), Classification::Kill);
    }

    #[test]
    fn other_processes_and_regions() {
        let track = photon(-Vector3::z()).created_by(2, 1, "compt");
        assert_eq!(policy().classify(&track), Classification::Continue);

        let track = photon(-Vector3::z()).in_volume("World", "DefaultRegionForTheWorld");
        assert_eq!(policy().classify(&track), Classification::Continue);

        let primary = Track::primary(Species::Gamma, 1.0, Vector3::zeros(), -Vector3::z())
            .in_volume("Foil", "Target");
        assert_eq!(policy().classify(&primary), Classification::Continue);
    }
}
