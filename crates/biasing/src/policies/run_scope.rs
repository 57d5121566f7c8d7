//! Process-level biasing configured once before the first event
//!
//! None of these policies make per-step decisions. Each one turns its
//! parameters into [RunDirective]s that the transport kernel applies, and
//! weight compensation is left to the kernel.

// crate modules
use crate::config::PolicyParameters;
use crate::error::Result;
use crate::kernel::RunDirective;

// vrtools modules
use vrtools_params::Dimension;

// external crates
use nalgebra::Vector3;

/// Scales the cross sections of named processes
#[derive(Debug, Clone)]
pub struct CrossSectionEnhancement {
    name: String,
    factors: Vec<(String, f64)>,
}

impl CrossSectionEnhancement {
    pub fn new(name: &str, factors: Vec<(String, f64)>) -> Self {
        Self {
            name: name.to_string(),
            factors,
        }
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        p.check_lengths("ProcessesNamed", &["EnhancementFactor"])?;

        let factors = p.unitlesses("EnhancementFactor")?;
        for &factor in &factors {
            p.require_positive("EnhancementFactor", factor)?;
        }

        let factors = p.strings("ProcessesNamed")?.into_iter().zip(factors).collect();
        Ok(Self::new(p.name(), factors))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directives(&self) -> Vec<RunDirective> {
        self.factors
            .iter()
            .map(|(process, factor)| RunDirective::EnhanceCrossSection {
                process: process.clone(),
                factor: *factor,
            })
            .collect()
    }
}

/// Forces named processes to interact within a distance in a region
#[derive(Debug, Clone, PartialEq)]
pub struct ForcedProcess {
    pub process: String,
    pub region: String,
    /// Distance within which the interaction happens, in mm
    pub distance: f64,
    pub correct_by_weight: bool,
}

#[derive(Debug, Clone)]
pub struct ForcedInteraction {
    name: String,
    processes: Vec<ForcedProcess>,
}

impl ForcedInteraction {
    pub fn new(name: &str, processes: Vec<ForcedProcess>) -> Self {
        Self {
            name: name.to_string(),
            processes,
        }
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let mut processes = Vec::new();

        for region in p.bracketed_names("ForRegion/", "/ProcessesNamed") {
            let prefix = format!("ForRegion/{region}/");
            p.check_region(&format!("{prefix}ProcessesNamed"), &region)?;
            p.check_lengths(&format!("{prefix}ProcessesNamed"), &[&format!("{prefix}ForcedDistances")])?;

            let distances = p.doubles(&format!("{prefix}ForcedDistances"), Dimension::Length)?;
            for &distance in &distances {
                p.require_positive(&format!("{prefix}ForcedDistances"), distance)?;
            }
            let correct_by_weight = p.boolean_or(&format!("{prefix}CorrectByWeight"), false)?;

            let names = p.strings(&format!("{prefix}ProcessesNamed"))?;
            processes.extend(names.into_iter().zip(distances).map(|(process, distance)| {
                ForcedProcess {
                    process,
                    region: region.clone(),
                    distance,
                    correct_by_weight,
                }
            }));
        }

        Ok(Self::new(p.name(), processes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directives(&self) -> Vec<RunDirective> {
        self.processes
            .iter()
            .map(|p| RunDirective::ForceInteraction {
                process: p.process.clone(),
                region: p.region.clone(),
                distance: p.distance,
                correct_by_weight: p.correct_by_weight,
            })
            .collect()
    }
}

/// Secondary splitting of one process in one region
#[derive(Debug, Clone, PartialEq)]
pub struct SplitProcess {
    pub process: String,
    pub region: String,
    pub split_number: f64,
    /// Secondaries above this energy are not split, in MeV
    pub maximum_energy: f64,
}

/// Uniform splitting of the secondaries of named processes
///
/// May optionally restrict split secondaries to those heading into a
/// sphere of radius `RMax` around `(TransX, TransY, TransZ)`.
#[derive(Debug, Clone)]
pub struct UniformSplitting {
    name: String,
    processes: Vec<SplitProcess>,
    directional: Option<(Vector3<f64>, f64)>,
}

impl UniformSplitting {
    pub fn new(name: &str, processes: Vec<SplitProcess>) -> Self {
        Self {
            name: name.to_string(),
            processes,
            directional: None,
        }
    }

    pub fn with_directional_splitting(mut self, target: Vector3<f64>, radius: f64) -> Self {
        self.directional = Some((target, radius));
        self
    }

    pub(crate) fn from_parameters(p: &PolicyParameters) -> Result<Self> {
        let mut processes = Vec::new();

        for region in p.bracketed_names("ForRegion/", "/ProcessesNamed") {
            let prefix = format!("ForRegion/{region}/");
            let names = format!("{prefix}ProcessesNamed");
            let splits = format!("{prefix}SplitNumber");
            let energies = format!("{prefix}MaximumEnergies");

            p.check_region(&names, &region)?;
            p.check_lengths(&names, &[&splits, &energies])?;

            let split_numbers = p.unitlesses(&splits)?;
            for &split in &split_numbers {
                p.require_at_least_one(&splits, split)?;
            }
            let maximum_energies = p.doubles(&energies, Dimension::Energy)?;
            for &energy in &maximum_energies {
                p.require_positive(&energies, energy)?;
            }

            processes.extend(
                p.strings(&names)?
                    .into_iter()
                    .zip(split_numbers)
                    .zip(maximum_energies)
                    .map(|((process, split_number), maximum_energy)| SplitProcess {
                        process,
                        region: region.clone(),
                        split_number,
                        maximum_energy,
                    }),
            );
        }

        let mut policy = Self::new(p.name(), processes);
        if p.boolean_or("UseDirectionalSplitting", false)? {
            let target = Vector3::new(
                p.length("TransX")?,
                p.length("TransY")?,
                p.length("TransZ")?,
            );
            let radius = p.length("RMax")?;
            p.require_positive("RMax", radius)?;
            policy = policy.with_directional_splitting(target, radius);
        }

        Ok(policy)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directives(&self) -> Vec<RunDirective> {
        let mut directives = self
            .processes
            .iter()
            .map(|p| RunDirective::SplitSecondaries {
                process: p.process.clone(),
                region: p.region.clone(),
                split_number: p.split_number,
                maximum_energy: p.maximum_energy,
            })
            .collect::<Vec<RunDirective>>();

        if let Some((target, radius)) = self.directional {
            directives.push(RunDirective::DirectionalSplitting { target, radius });
        }
        directives
    }
}
