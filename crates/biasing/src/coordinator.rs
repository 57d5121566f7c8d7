//! Dispatch of kernel callbacks to the configured policies

// standard library
use std::collections::HashMap;

// crate modules
use crate::config::Configuration;
use crate::context::HistoryContext;
use crate::error::{Error, Result};
use crate::geometry::GeometryCatalog;
use crate::kernel::{InteractionSampler, Kernel, RunDirective, RunScopeKernel};
use crate::policies::{
    CrossSectionEnhancement, DirectionalRussianRoulette, ForcedInteraction, ImportanceSplitting,
    InelasticSplitting, KillOtherParticles, ParallelImportanceSplitting, PeriodicBoundary, Policy,
    PolicyKind, RangeRejection, UniformSplitting, WeightWindow,
};
use crate::track::{Classification, FinalState, ParentFate, Secondary, SplitRecord, Step, Track};

// vrtools modules
use vrtools_params::ParameterSet;

// external crates
use log::{debug, info};

/// Routes the three kernel callbacks to at most one policy of each kind
///
/// The coordinator is immutable once built and can be shared between worker
/// threads behind an `Arc`. Everything that changes while a history is
/// transported lives in the [HistoryContext] passed to each call.
///
/// - At track creation, kill-other-particles, range rejection and
///   directional roulette are tried in that order, and the first one
///   configured decides.
/// - At a step boundary, a periodic wrap replaces the track outright.
///   Otherwise importance splitting, parallel importance splitting and the
///   weight window are applied in turn to every track left by the previous
///   stage.
/// - At an interaction, inelastic splitting rewrites the final state.
///
/// ```rust
/// # use vrtools_biasing::{Configuration, Coordinator, HistoryContext, Kernel, Track, Species};
/// # use vrtools_biasing::{Classification, KillOtherParticles, ParticleFilter, Policy, SpeciesPattern};
/// # use nalgebra::Vector3;
/// struct Vacuum;
///
/// impl Kernel for Vacuum {
///     fn csda_range(&self, _: &Track) -> Option<f64> { None }
///     fn distance_to_exit(&self, _: &Track) -> Option<f64> { None }
/// }
///
/// let filter = ParticleFilter::including(vec![SpeciesPattern::Exact(Species::Gamma)]);
/// let kill = Policy::KillOtherParticles(KillOtherParticles::new("OnlyGammas", filter));
/// let coordinator = Coordinator::build(Configuration::new(vec![kill])).unwrap();
///
/// let mut context = HistoryContext::new(1, 1);
/// let electron = Track::primary(Species::Electron, 1.0, Vector3::zeros(), Vector3::z());
/// assert_eq!(coordinator.classify(&mut context, &electron, &Vacuum), Classification::Kill);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Coordinator {
    kill: Option<KillOtherParticles>,
    range: Option<RangeRejection>,
    directional: Option<DirectionalRussianRoulette>,
    periodic: Option<PeriodicBoundary>,
    importance: Option<ImportanceSplitting>,
    parallel: Option<ParallelImportanceSplitting>,
    weight_window: Option<WeightWindow>,
    inelastic: Option<InelasticSplitting>,
    enhancement: Option<CrossSectionEnhancement>,
    forced: Option<ForcedInteraction>,
    uniform: Option<UniformSplitting>,
}

impl Coordinator {
    /// Register every configured policy, at most one per kind
    pub fn build(configuration: Configuration) -> Result<Self> {
        let mut coordinator = Self::default();
        let mut names: HashMap<PolicyKind, String> = HashMap::new();

        for policy in configuration.into_policies() {
            let kind = policy.kind();
            if let Some(first) = names.get(&kind) {
                return Err(Error::DuplicatePolicy {
                    kind: kind.as_str(),
                    first: first.clone(),
                    second: policy.name().to_string(),
                });
            }
            names.insert(kind, policy.name().to_string());
            debug!("Registered {kind} policy \"{}\"", policy.name());

            match policy {
                Policy::KillOtherParticles(p) => coordinator.kill = Some(p),
                Policy::RangeRejection(p) => coordinator.range = Some(p),
                Policy::DirectionalRussianRoulette(p) => coordinator.directional = Some(p),
                Policy::PeriodicBoundary(p) => coordinator.periodic = Some(p),
                Policy::ImportanceSampling(p) => coordinator.importance = Some(p),
                Policy::ParallelImportanceSampling(p) => coordinator.parallel = Some(p),
                Policy::WeightWindow(p) => coordinator.weight_window = Some(p),
                Policy::InelasticSplitting(p) => coordinator.inelastic = Some(p),
                Policy::CrossSectionEnhancement(p) => coordinator.enhancement = Some(p),
                Policy::ForcedInteraction(p) => coordinator.forced = Some(p),
                Policy::UniformSplitting(p) => coordinator.uniform = Some(p),
            }
        }

        Ok(coordinator)
    }

    /// Load, validate and register every policy in a parameter set
    pub fn from_parameters(parameters: &ParameterSet, catalog: &GeometryCatalog) -> Result<Self> {
        Self::build(Configuration::from_parameters(parameters, catalog)?)
    }

    /// Kinds of the registered policies
    pub fn kinds(&self) -> Vec<PolicyKind> {
        let slots = [
            (self.kill.is_some(), PolicyKind::KillOtherParticles),
            (self.range.is_some(), PolicyKind::RangeRejection),
            (self.directional.is_some(), PolicyKind::DirectionalRussianRoulette),
            (self.periodic.is_some(), PolicyKind::PeriodicBoundary),
            (self.importance.is_some(), PolicyKind::ImportanceSampling),
            (self.parallel.is_some(), PolicyKind::ParallelImportanceSampling),
            (self.weight_window.is_some(), PolicyKind::WeightWindow),
            (self.inelastic.is_some(), PolicyKind::InelasticSplitting),
            (self.enhancement.is_some(), PolicyKind::CrossSectionEnhancement),
            (self.forced.is_some(), PolicyKind::ForcedInteraction),
            (self.uniform.is_some(), PolicyKind::UniformSplitting),
        ];
        slots
            .into_iter()
            .filter_map(|(active, kind)| active.then_some(kind))
            .collect()
    }

    /// Decide whether a new track is transported at all
    pub fn classify<K>(&self, context: &mut HistoryContext, track: &Track, kernel: &K) -> Classification
    where
        K: Kernel + ?Sized,
    {
        if context.is_aborted() {
            return Classification::Continue;
        }

        if let Some(kill) = &self.kill {
            return kill.classify(track);
        }
        if let Some(range) = &self.range {
            return range.classify(track, kernel);
        }
        if let Some(directional) = &self.directional {
            return directional.classify(track);
        }

        Classification::Continue
    }

    /// Population changes at the end of a step
    pub fn apply_step_boundary<K>(
        &self,
        context: &mut HistoryContext,
        track: &Track,
        step: &Step,
        kernel: &K,
    ) -> SplitRecord
    where
        K: Kernel + ?Sized,
    {
        if context.is_aborted() {
            return SplitRecord::unchanged();
        }

        if let Some(periodic) = &self.periodic {
            if let Some(record) = periodic.apply(track, step, kernel) {
                return record;
            }
        }

        let mut record = SplitRecord::unchanged();
        if let Some(importance) = &self.importance {
            record = compose(record, track, |t| importance.apply(context.rng(), t, step));
        }
        if let Some(parallel) = &self.parallel {
            record = compose(record, track, |t| parallel.apply(context.rng(), t, step, kernel));
        }
        if let Some(window) = &self.weight_window {
            record = compose(record, track, |t| window.apply(context.rng(), t, step));
        }
        record
    }

    /// Rewrite the outcome of a discrete interaction
    pub fn apply_interaction_final_state<S>(
        &self,
        context: &mut HistoryContext,
        track: &Track,
        outcome: FinalState,
        sampler: &mut S,
    ) -> FinalState
    where
        S: InteractionSampler + ?Sized,
    {
        match &self.inelastic {
            Some(inelastic) if !context.is_aborted() => inelastic.apply(context, track, outcome, sampler),
            _ => outcome,
        }
    }

    /// Directives of every run-scope policy, tagged with the policy name
    pub fn run_scope_directives(&self) -> Vec<(&str, RunDirective)> {
        let mut directives = Vec::new();
        if let Some(p) = &self.enhancement {
            directives.extend(p.directives().into_iter().map(|d| (p.name(), d)));
        }
        if let Some(p) = &self.forced {
            directives.extend(p.directives().into_iter().map(|d| (p.name(), d)));
        }
        if let Some(p) = &self.uniform {
            directives.extend(p.directives().into_iter().map(|d| (p.name(), d)));
        }
        directives
    }

    /// Hand every run-scope directive to the kernel, once before the first event
    pub fn configure_run_scope<K>(&self, kernel: &mut K) -> Result<()>
    where
        K: RunScopeKernel + ?Sized,
    {
        for (policy, directive) in self.run_scope_directives() {
            info!("{policy}: {directive}");
            kernel.apply(&directive).map_err(|reason| Error::RunScopeRejected {
                policy: policy.to_string(),
                reason,
            })?;
        }
        Ok(())
    }
}

/// Apply one step-boundary stage to every track left by the previous ones
fn compose<F>(record: SplitRecord, track: &Track, mut stage: F) -> SplitRecord
where
    F: FnMut(&Track) -> SplitRecord,
{
    let mut secondaries = Vec::new();

    let parent = match record.parent {
        ParentFate::Killed => ParentFate::Killed,
        fate => {
            let current = track.clone().with_weight(record.parent_weight(track.weight));
            let next = stage(&current);
            secondaries.extend(next.secondaries);
            match next.parent {
                ParentFate::Unchanged => fate,
                changed => changed,
            }
        }
    };

    for secondary in record.secondaries {
        let copy = Track {
            species: secondary.species,
            kinetic_energy: secondary.kinetic_energy,
            position: secondary.position,
            direction: secondary.direction,
            weight: secondary.weight,
            ..track.clone()
        };

        let next = stage(&copy);
        match next.parent {
            ParentFate::Unchanged => secondaries.push(secondary),
            ParentFate::Reweighted(weight) => secondaries.push(Secondary { weight, ..secondary }),
            ParentFate::Killed => (),
        }
        secondaries.extend(next.secondaries);
    }

    SplitRecord { parent, secondaries }
}
