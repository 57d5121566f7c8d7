//! Splitting of secondaries produced by discrete interactions

// crate modules
use crate::config::PolicyParameters;
use crate::context::HistoryContext;
use crate::error::{Error, Result};
use crate::geometry::RegionSet;
use crate::kernel::InteractionSampler;
use crate::species::ParticleFilter;
use crate::split::roulette;
use crate::track::{FinalState, Secondary, Track};

// external crates
use log::{debug, trace};

/// Re-samples an interaction `N` times and pools the secondaries
///
/// The parent keeps the kinematics of the outcome handed in by the kernel.
/// That outcome's secondaries are discarded and replaced by the secondaries
/// of `N` fresh samples, each with its weight divided by `N`.
///
/// Secondaries of species outside the keep list, when one is given, play
/// Russian roulette with a fixed survival probability so that the pooled
/// population does not grow without bound.
#[derive(Debug, Clone)]
pub struct InelasticSplitting {
    name: String,
    volumes: RegionSet,
    split_number: u32,
    primary_only: bool,
    once_per_track: bool,
    keep: Option<ParticleFilter>,
    survival: f64,
}

impl InelasticSplitting {
    /// Split every interaction in `volumes` into `split_number` samples
    ///
    /// Roulette survival defaults to `1 / split_number`.
    pub fn new(name: &str, volumes: RegionSet, split_number: u32) -> Self {
        Self {
            name: name.to_string(),
            volumes,
            split_number,
            primary_only: false,
            once_per_track: false,
            keep: None,
            survival: 1.0 / f64::from(split_number.max(1)),
        }
    }

    /// Only bias tracks with no parent
    pub fn primary_only(mut self, primary_only: bool) -> Self {
        self.primary_only = primary_only;
        self
    }

    /// Only bias the first interaction of each track
    pub fn once_per_track(mut self, once: bool) -> Self {
        self.once_per_track = once;
        self
    }

    /// Roulette secondaries not accepted by `keep`
    pub fn with_roulette(mut self, keep: ParticleFilter, survival: f64) -> Self {
        self.keep = Some(keep);
        self.survival = survival;
        self
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let split_number = p.positive_integer("SplitNumber")?;
        let volumes = p.volumes("ApplyBiasingInVolumesNamed")?;

        let mut policy = Self::new(p.name(), volumes, split_number)
            .primary_only(p.boolean("OnlyBiasPrimaryParticle")?)
            .once_per_track(p.boolean("BiasParticleOnlyOnce")?);

        if p.exists("ApplyRussianRouletteToParticlesDifferentThan") {
            let keep = ParticleFilter::including(
                p.species_patterns("ApplyRussianRouletteToParticlesDifferentThan")?,
            );

            let survival = match p.exists("RussianRouletteSurvivalProbability") {
                true => p.unitless("RussianRouletteSurvivalProbability")?,
                false => 1.0 / f64::from(split_number),
            };
            if !(survival > 0.0 && survival <= 1.0) {
                return Err(Error::InvalidValue {
                    parameter: p.full("RussianRouletteSurvivalProbability"),
                    value: survival,
                    requirement: "in (0, 1]",
                });
            }

            policy = policy.with_roulette(keep, survival);
        }

        debug!(
            "{}: split interactions {} times in {:?}",
            policy.name,
            policy.split_number,
            policy.volumes.names()
        );
        Ok(policy)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn split_number(&self) -> u32 {
        self.split_number
    }

    /// Check the track against the volume, primary and once-only conditions
    pub fn applies_to(&self, context: &HistoryContext, track: &Track) -> bool {
        if !self.volumes.contains(&track.volume) {
            return false;
        }
        if self.primary_only && !track.is_primary() {
            return false;
        }
        if self.once_per_track && context.biased_interactions() > 0 {
            return false;
        }
        true
    }

    pub fn apply<S>(
        &self,
        context: &mut HistoryContext,
        track: &Track,
        outcome: FinalState,
        sampler: &mut S,
    ) -> FinalState
    where
        S: InteractionSampler + ?Sized,
    {
        if !self.applies_to(context, track) {
            return outcome;
        }

        if self.split_number == 1 || outcome.secondaries.is_empty() {
            return outcome;
        }

        context.record_biased_interaction();
        let n = f64::from(self.split_number);

        let mut secondaries = Vec::new();
        for _ in 0..self.split_number {
            for secondary in sampler.resample(track).secondaries {
                let weight = secondary.weight / n;
                let kept = match &self.keep {
                    Some(keep) if !keep.accepts(&secondary.species) => {
                        roulette(self.survival, weight, context.rng())
                    }
                    _ => Some(weight),
                };

                if let Some(weight) = kept {
                    secondaries.push(Secondary { weight, ..secondary });
                }
            }
        }

        trace!(
            "{}: {} pooled secondaries from {} samples",
            self.name,
            secondaries.len(),
            self.split_number
        );

        FinalState {
            parent: outcome.parent,
            secondaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{Species, SpeciesPattern};
    use crate::track::ParentKinematics;
    use nalgebra::Vector3;

    /// Always produces one gamma and one electron
    struct Fixed {
        calls: u32,
    }

    impl InteractionSampler for Fixed {
        fn resample(&mut self, track: &Track) -> FinalState {
            self.calls += 1;
            let mut gamma = track.to_secondary(track.position, track.weight);
            gamma.species = Species::Gamma;
            let mut electron = gamma.clone();
            electron.species = Species::Electron;
            FinalState {
                parent: None,
                secondaries: vec![gamma, electron],
            }
        }
    }

    fn outcome(track: &Track) -> FinalState {
        FinalState {
            parent: Some(ParentKinematics {
                kinetic_energy: 0.5,
                direction: Vector3::y(),
                weight: track.weight,
            }),
            secondaries: vec![track.to_secondary(track.position, track.weight)],
        }
    }

    fn track() -> Track {
        Track::primary(Species::Neutron, 14.0, Vector3::zeros(), Vector3::z()).in_volume("Shield", "Target")
    }

    #[test]
    fn pools_n_samples() {
        let policy = InelasticSplitting::new("Split", RegionSet::new(["Shield"]), 5);
        let mut context = HistoryContext::new(1, 1);
        let mut sampler = Fixed { calls: 0 };

        let track = track();
        let result = policy.apply(&mut context, &track, outcome(&track), &mut sampler);

        assert_eq!(sampler.calls, 5);
        assert_eq!(result.secondaries.len(), 10);
        assert!(result.secondaries.iter().all(|s| s.weight == 0.2));
        assert_eq!(result.parent, outcome(&track).parent);
        assert_eq!(context.biased_interactions(), 1);
    }

    #[test]
    fn once_per_track() {
        let policy = InelasticSplitting::new("Split", RegionSet::new(["Shield"]), 2).once_per_track(true);
        let mut context = HistoryContext::new(1, 1);
        let mut sampler = Fixed { calls: 0 };
        let track = track();

        policy.apply(&mut context, &track, outcome(&track), &mut sampler);
        let second = policy.apply(&mut context, &track, outcome(&track), &mut sampler);
        assert_eq!(second, outcome(&track));
        assert_eq!(sampler.calls, 2);

        context.begin_track();
        policy.apply(&mut context, &track, outcome(&track), &mut sampler);
        assert_eq!(sampler.calls, 4);
    }

    #[test]
    fn primary_only_and_volume() {
        let policy = InelasticSplitting::new("Split", RegionSet::new(["Shield"]), 2).primary_only(true);
        let mut context = HistoryContext::new(1, 1);
        let mut sampler = Fixed { calls: 0 };

        let secondary = track().created_by(2, 1, "neutronInelastic");
        assert_eq!(
            policy.apply(&mut context, &secondary, outcome(&secondary), &mut sampler),
            outcome(&secondary)
        );

        let elsewhere = track().in_volume("World", "DefaultRegionForTheWorld");
        assert_eq!(
            policy.apply(&mut context, &elsewhere, outcome(&elsewhere), &mut sampler),
            outcome(&elsewhere)
        );
        assert_eq!(sampler.calls, 0);
    }

    #[test]
    fn roulette_only_touches_other_species() {
        let keep = ParticleFilter::including(vec![SpeciesPattern::Exact(Species::Gamma)]);
        let policy = InelasticSplitting::new("Split", RegionSet::new(["Shield"]), 4).with_roulette(keep, 0.5);
        let mut context = HistoryContext::new(3, 9);
        let mut sampler = Fixed { calls: 0 };
        let track = track();

        let result = policy.apply(&mut context, &track, outcome(&track), &mut sampler);
        let gammas = result.secondaries.iter().filter(|s| s.species == Species::Gamma);
        assert_eq!(gammas.clone().count(), 4);
        assert!(gammas.into_iter().all(|s| s.weight == 0.25));

        assert!(result
            .secondaries
            .iter()
            .filter(|s| s.species == Species::Electron)
            .all(|s| s.weight == 0.5));
    }
}
