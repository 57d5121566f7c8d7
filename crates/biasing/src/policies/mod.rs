//! Population control policies, one module per kind

mod directional;
mod importance;
mod inelastic;
mod kill;
mod parallel;
mod periodic;
mod range;
mod run_scope;
mod weight_window;

pub use directional::{DirectionalRussianRoulette, DirectionalTarget};
pub use importance::{ImportanceMap, ImportanceSplitting, DEFAULT_MAXIMUM_SPLIT};
pub use inelastic::InelasticSplitting;
pub use kill::KillOtherParticles;
pub use parallel::ParallelImportanceSplitting;
pub use periodic::{PeriodicBoundary, DEFAULT_SURFACE_TOLERANCE};
pub use range::RangeRejection;
pub use run_scope::{
    CrossSectionEnhancement, ForcedInteraction, ForcedProcess, SplitProcess, UniformSplitting,
};
pub use weight_window::{PlaceOfAction, WeightWindow, WindowBound};

// crate modules
use crate::config::PolicyParameters;
use crate::error::Result;

/// Kind of a policy, at most one of each is active in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    ImportanceSampling,
    ParallelImportanceSampling,
    InelasticSplitting,
    PeriodicBoundary,
    RangeRejection,
    KillOtherParticles,
    DirectionalRussianRoulette,
    CrossSectionEnhancement,
    ForcedInteraction,
    UniformSplitting,
    WeightWindow,
}

impl PolicyKind {
    /// Kind from the value of a `Vr/<name>/Type` parameter
    ///
    /// ```rust
    /// # use vrtools_biasing::PolicyKind;
    /// assert_eq!(PolicyKind::from_type("RangeRejection"), Some(PolicyKind::RangeRejection));
    /// assert_eq!(PolicyKind::from_type("secondarybiasing"), Some(PolicyKind::UniformSplitting));
    /// assert_eq!(PolicyKind::from_type("Geometrical"), None);
    /// ```
    pub fn from_type(name: &str) -> Option<Self> {
        let kind = match name.to_lowercase().as_str() {
            "automaticimportancesampling" => Self::ImportanceSampling,
            "automaticimportancesamplingparallel" => Self::ParallelImportanceSampling,
            "inelasticsplitting" => Self::InelasticSplitting,
            "periodicboundarycondition" => Self::PeriodicBoundary,
            "rangerejection" => Self::RangeRejection,
            "killotherparticles" => Self::KillOtherParticles,
            "directionalrussianroulette" => Self::DirectionalRussianRoulette,
            "crosssectionenhancement" => Self::CrossSectionEnhancement,
            "forcedinteraction" => Self::ForcedInteraction,
            "uniformsplitting" | "secondarybiasing" => Self::UniformSplitting,
            "weightwindow" => Self::WeightWindow,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImportanceSampling => "AutomaticImportanceSampling",
            Self::ParallelImportanceSampling => "AutomaticImportanceSamplingParallel",
            Self::InelasticSplitting => "InelasticSplitting",
            Self::PeriodicBoundary => "PeriodicBoundaryCondition",
            Self::RangeRejection => "RangeRejection",
            Self::KillOtherParticles => "KillOtherParticles",
            Self::DirectionalRussianRoulette => "DirectionalRussianRoulette",
            Self::CrossSectionEnhancement => "CrossSectionEnhancement",
            Self::ForcedInteraction => "ForcedInteraction",
            Self::UniformSplitting => "UniformSplitting",
            Self::WeightWindow => "WeightWindow",
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any configured policy
#[derive(Debug, Clone)]
pub enum Policy {
    ImportanceSampling(ImportanceSplitting),
    ParallelImportanceSampling(ParallelImportanceSplitting),
    InelasticSplitting(InelasticSplitting),
    PeriodicBoundary(PeriodicBoundary),
    RangeRejection(RangeRejection),
    KillOtherParticles(KillOtherParticles),
    DirectionalRussianRoulette(DirectionalRussianRoulette),
    CrossSectionEnhancement(CrossSectionEnhancement),
    ForcedInteraction(ForcedInteraction),
    UniformSplitting(UniformSplitting),
    WeightWindow(WeightWindow),
}

impl Policy {
    pub(crate) fn from_parameters(kind: PolicyKind, p: &PolicyParameters) -> Result<Self> {
        let policy = match kind {
            PolicyKind::ImportanceSampling => {
                Self::ImportanceSampling(ImportanceSplitting::from_parameters(p)?)
            }
            PolicyKind::ParallelImportanceSampling => {
                Self::ParallelImportanceSampling(ParallelImportanceSplitting::from_parameters(p)?)
            }
            PolicyKind::InelasticSplitting => {
                Self::InelasticSplitting(InelasticSplitting::from_parameters(p)?)
            }
            PolicyKind::PeriodicBoundary => Self::PeriodicBoundary(PeriodicBoundary::from_parameters(p)?),
            PolicyKind::RangeRejection => Self::RangeRejection(RangeRejection::from_parameters(p)?),
            PolicyKind::KillOtherParticles => {
                Self::KillOtherParticles(KillOtherParticles::from_parameters(p)?)
            }
            PolicyKind::DirectionalRussianRoulette => {
                Self::DirectionalRussianRoulette(DirectionalRussianRoulette::from_parameters(p)?)
            }
            PolicyKind::CrossSectionEnhancement => {
                Self::CrossSectionEnhancement(CrossSectionEnhancement::from_parameters(p)?)
            }
            PolicyKind::ForcedInteraction => Self::ForcedInteraction(ForcedInteraction::from_parameters(p)?),
            PolicyKind::UniformSplitting => Self::UniformSplitting(UniformSplitting::from_parameters(p)?),
            PolicyKind::WeightWindow => Self::WeightWindow(WeightWindow::from_parameters(p)?),
        };
        Ok(policy)
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::ImportanceSampling(_) => PolicyKind::ImportanceSampling,
            Self::ParallelImportanceSampling(_) => PolicyKind::ParallelImportanceSampling,
            Self::InelasticSplitting(_) => PolicyKind::InelasticSplitting,
            Self::PeriodicBoundary(_) => PolicyKind::PeriodicBoundary,
            Self::RangeRejection(_) => PolicyKind::RangeRejection,
            Self::KillOtherParticles(_) => PolicyKind::KillOtherParticles,
            Self::DirectionalRussianRoulette(_) => PolicyKind::DirectionalRussianRoulette,
            Self::CrossSectionEnhancement(_) => PolicyKind::CrossSectionEnhancement,
            Self::ForcedInteraction(_) => PolicyKind::ForcedInteraction,
            Self::UniformSplitting(_) => PolicyKind::UniformSplitting,
            Self::WeightWindow(_) => PolicyKind::WeightWindow,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::ImportanceSampling(p) => p.name(),
            Self::ParallelImportanceSampling(p) => p.name(),
            Self::InelasticSplitting(p) => p.name(),
            Self::PeriodicBoundary(p) => p.name(),
            Self::RangeRejection(p) => p.name(),
            Self::KillOtherParticles(p) => p.name(),
            Self::DirectionalRussianRoulette(p) => p.name(),
            Self::CrossSectionEnhancement(p) => p.name(),
            Self::ForcedInteraction(p) => p.name(),
            Self::UniformSplitting(p) => p.name(),
            Self::WeightWindow(p) => p.name(),
        }
    }
}
