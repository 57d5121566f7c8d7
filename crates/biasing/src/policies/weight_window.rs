//! Energy dependent weight windows per region

// crate modules
use crate::config::PolicyParameters;
use crate::error::{Error, Result};
use crate::split::roulette;
use crate::track::{ParentFate, SplitRecord, Step, StepStatus, Track};

// vrtools modules
use vrtools_params::Dimension;

// external crates
use log::{debug, trace};
use rand::Rng;

/// Where on a track a weight window is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOfAction {
    OnBoundary,
    OnCollision,
    OnBoundaryAndCollision,
}

impl PlaceOfAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "onboundary" => Some(Self::OnBoundary),
            "oncollision" => Some(Self::OnCollision),
            "onboundaryandcollision" => Some(Self::OnBoundaryAndCollision),
            _ => None,
        }
    }

    /// Whether a step ending with `status` is checked
    pub fn acts_on(&self, status: StepStatus) -> bool {
        match self {
            Self::OnBoundary => status == StepStatus::GeometryBoundary,
            Self::OnCollision => status == StepStatus::Interaction,
            Self::OnBoundaryAndCollision => {
                matches!(status, StepStatus::GeometryBoundary | StepStatus::Interaction)
            }
        }
    }
}

impl std::fmt::Display for PlaceOfAction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::OnBoundary => "OnBoundary",
            Self::OnCollision => "OnCollision",
            Self::OnBoundaryAndCollision => "OnBoundaryAndCollision",
        };
        write!(f, "{s}")
    }
}

/// Lower weight bound of one region for energies up to `energy_bound`
#[derive(Debug, Clone, PartialEq)]
pub struct WindowBound {
    pub region: String,
    /// Upper energy this bound applies to, in MeV
    pub energy_bound: f64,
    pub lower_weight: f64,
}

/// Keeps track weights within a window around a per-region lower bound
///
/// The window is `[lower, lower * upper_limit_factor]`. Heavier tracks are
/// split into `min(ceil(w / upper), maximum_split)` copies, lighter tracks
/// play roulette and survive with weight `lower * survival_factor`.
#[derive(Debug, Clone)]
pub struct WeightWindow {
    name: String,
    bounds: Vec<WindowBound>,
    upper_limit_factor: f64,
    survival_factor: f64,
    maximum_split: u32,
    place: PlaceOfAction,
}

impl WeightWindow {
    pub fn new(name: &str, bounds: Vec<WindowBound>, place: PlaceOfAction) -> Self {
        Self {
            name: name.to_string(),
            bounds,
            upper_limit_factor: 5.0,
            survival_factor: 3.0,
            maximum_split: 5,
            place,
        }
    }

    pub fn with_factors(mut self, upper_limit_factor: f64, survival_factor: f64) -> Self {
        self.upper_limit_factor = upper_limit_factor;
        self.survival_factor = survival_factor;
        self
    }

    pub fn with_maximum_split(mut self, maximum_split: u32) -> Self {
        self.maximum_split = maximum_split;
        self
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let regions = p.strings("ApplyBiasingInRegionsNamed")?;
        for region in &regions {
            p.check_region("ApplyBiasingInRegionsNamed", region)?;
        }
        p.check_lengths("ApplyBiasingInRegionsNamed", &["EnergyBounds", "LowerWeights"])?;

        let energies = p.doubles("EnergyBounds", Dimension::Energy)?;
        let lowers = p.unitlesses("LowerWeights")?;
        for &lower in &lowers {
            p.require_positive("LowerWeights", lower)?;
        }

        let bounds = regions
            .into_iter()
            .zip(energies)
            .zip(lowers)
            .map(|((region, energy_bound), lower_weight)| WindowBound {
                region,
                energy_bound,
                lower_weight,
            })
            .collect::<Vec<WindowBound>>();

        let upper = p.unitless("UpperLimitFactor")?;
        if upper.is_nan() || upper < 1.0 {
            return Err(Error::InvalidValue {
                parameter: p.full("UpperLimitFactor"),
                value: upper,
                requirement: "at least 1",
            });
        }
        let survival = p.unitless("SurvivalFactor")?;
        if survival.is_nan() || survival < 1.0 {
            return Err(Error::InvalidValue {
                parameter: p.full("SurvivalFactor"),
                value: survival,
                requirement: "at least 1",
            });
        }

        let place_name = p.string("PlaceOfAction")?;
        let place = PlaceOfAction::from_name(&place_name).ok_or_else(|| Error::InvalidOption {
            parameter: p.full("PlaceOfAction"),
            value: place_name.clone(),
            options: "OnBoundary, OnCollision, OnBoundaryAndCollision",
        })?;

        let policy = Self::new(p.name(), bounds, place)
            .with_factors(upper, survival)
            .with_maximum_split(p.positive_integer("MaximumSplitNumber")?);

        debug!("{}: {} weight window bounds {}", policy.name, policy.bounds.len(), policy.place);
        Ok(policy)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn place(&self) -> PlaceOfAction {
        self.place
    }

    /// Lower weight for a track of `energy` in `region`
    ///
    /// The bound with the smallest energy limit not below `energy` wins.
    pub fn lower_weight(&self, region: &str, energy: f64) -> Option<f64> {
        self.bounds
            .iter()
            .filter(|b| b.region.eq_ignore_ascii_case(region) && energy <= b.energy_bound)
            .min_by(|a, b| a.energy_bound.total_cmp(&b.energy_bound))
            .map(|b| b.lower_weight)
    }

    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, track: &Track, step: &Step) -> SplitRecord {
        if !self.place.acts_on(step.post.status) {
            return SplitRecord::unchanged();
        }

        let Some(lower) = self.lower_weight(&step.post.region, track.kinetic_energy) else {
            return SplitRecord::unchanged();
        };

        let weight = track.weight;
        let upper = lower * self.upper_limit_factor;

        if weight > upper {
            let copies = ((weight / upper).ceil() as u32).min(self.maximum_split);
            if copies <= 1 {
                return SplitRecord::unchanged();
            }
            let split = weight / f64::from(copies);
            trace!("{}: splitting weight {weight} into {copies}", self.name);
            return SplitRecord {
                parent: ParentFate::Reweighted(split),
                secondaries: (1..copies)
                    .map(|_| track.to_secondary(step.post.position, split))
                    .collect(),
            };
        }

        if weight < lower {
            let survival = weight / (lower * self.survival_factor);
            return match roulette(survival, weight, rng) {
                Some(survivor) => SplitRecord {
                    parent: ParentFate::Reweighted(survivor),
                    secondaries: Vec::new(),
                },
                None => SplitRecord::killed(),
            };
        }

        SplitRecord::unchanged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use crate::track::StepPoint;
    use nalgebra::Vector3;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn window() -> WeightWindow {
        let bounds = vec![
            WindowBound {
                region: "Shield".to_string(),
                energy_bound: 10.0,
                lower_weight: 0.5,
            },
            WindowBound {
                region: "Shield".to_string(),
                energy_bound: 1.0,
                lower_weight: 0.1,
            },
        ];
        WeightWindow::new("Window", bounds, PlaceOfAction::OnBoundary)
            .with_factors(2.0, 2.0)
            .with_maximum_split(4)
    }

    fn step(status: StepStatus) -> Step {
        Step::new(
            StepPoint::new(Vector3::zeros(), "Air", "Target", StepStatus::Other),
            StepPoint::new(Vector3::z(), "Wall", "Shield", status),
        )
    }

    fn track(energy: f64, weight: f64) -> Track {
        Track::primary(Species::Neutron, energy, Vector3::zeros(), Vector3::z()).with_weight(weight)
    }

    #[test]
    fn smallest_energy_bound_wins() {
        let w = window();
        assert_eq!(w.lower_weight("shield", 0.5), Some(0.1));
        assert_eq!(w.lower_weight("Shield", 5.0), Some(0.5));
        assert_eq!(w.lower_weight("Shield", 50.0), None);
        assert_eq!(w.lower_weight("Target", 0.5), None);
    }

    #[test]
    fn heavy_tracks_split_up_to_the_maximum() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let record = window().apply(&mut rng, &track(5.0, 2.5), &step(StepStatus::GeometryBoundary));
        assert_eq!(record.population(), 3);
        assert!((record.total_weight(2.5) - 2.5).abs() < 1e-12);

        let record = window().apply(&mut rng, &track(5.0, 100.0), &step(StepStatus::GeometryBoundary));
        assert_eq!(record.population(), 4);
        assert_eq!(record.parent, ParentFate::Reweighted(25.0));
    }

    #[test]
    fn light_tracks_roulette_to_the_survival_weight() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        for _ in 0..100 {
            let record = window().apply(&mut rng, &track(5.0, 0.2), &step(StepStatus::GeometryBoundary));
            match record.parent {
                ParentFate::Killed => {}
                ParentFate::Reweighted(w) => assert!((w - 1.0).abs() < 1e-12),
                ParentFate::Unchanged => panic!("light track was not rouletted"),
            }
        }
    }

    #[test]
    fn inside_the_window_or_wrong_place() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        assert!(window()
            .apply(&mut rng, &track(5.0, 0.7), &step(StepStatus::GeometryBoundary))
            .is_unchanged());
        assert!(window()
            .apply(&mut rng, &track(5.0, 100.0), &step(StepStatus::Interaction))
            .is_unchanged());
    }

    #[test]
    fn place_names() {
        assert_eq!(
            PlaceOfAction::from_name("onboundaryandcollision"),
            Some(PlaceOfAction::OnBoundaryAndCollision)
        );
        assert_eq!(PlaceOfAction::from_name("sometimes"), None);
        assert!(PlaceOfAction::OnCollision.acts_on(StepStatus::Interaction));
        assert!(!PlaceOfAction::OnCollision.acts_on(StepStatus::GeometryBoundary));
    }
}
