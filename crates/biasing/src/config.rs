//! Policy selection and validation from a parameter set

// crate modules
use crate::error::{Error, Result};
use crate::geometry::{GeometryCatalog, RegionSet};
use crate::policies::{Policy, PolicyKind};
use crate::species::{ParticleFilter, SpeciesPattern};

// vrtools modules
use vrtools_params::{Dimension, ParameterSet};

// external crates
use log::{debug, info};

/// Every policy declared in a parameter set, validated and loaded
///
/// Policies are declared with `s:Vr/<Name>/Type` and configured by the
/// other `Vr/<Name>/...` parameters. All names, vector lengths and numeric
/// ranges are checked here so that nothing can fail once tracks start.
///
/// ```rust
/// # use vrtools_biasing::{Configuration, GeometryCatalog, PolicyKind};
/// # use vrtools_params::ParameterSet;
/// let parameters = ParameterSet::parse(r#"
///     s:Vr/Cut/Type               = "RangeRejection"
///     sv:Vr/Cut/ParticlesNamed    = 1 "e-"
///     sv:Vr/Cut/Regions           = 1 "Target"
/// "#).unwrap();
///
/// let catalog = GeometryCatalog::new().with_region("Target");
/// let configuration = Configuration::from_parameters(&parameters, &catalog).unwrap();
///
/// assert_eq!(configuration.policies().len(), 1);
/// assert_eq!(configuration.policies()[0].kind(), PolicyKind::RangeRejection);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    policies: Vec<Policy>,
}

impl Configuration {
    pub fn new(policies: Vec<Policy>) -> Self {
        Self { policies }
    }

    /// Load every `Vr/<Name>/Type` policy, in name order
    pub fn from_parameters(parameters: &ParameterSet, catalog: &GeometryCatalog) -> Result<Self> {
        let mut policies = Vec::new();

        for name in parameters.names_bracketed_by("Vr/", "/Type") {
            let type_parameter = format!("Vr/{name}/Type");
            let type_name = parameters.string(&type_parameter)?;

            let kind = PolicyKind::from_type(type_name).ok_or_else(|| Error::UnknownBiasingType {
                parameter: type_parameter.clone(),
                kind: type_name.to_string(),
            })?;

            debug!("Configuring {kind} policy \"{name}\"");
            let p = PolicyParameters::new(&name, parameters, catalog);
            policies.push(Policy::from_parameters(kind, &p)?);
        }

        info!("Configured {} biasing policies", policies.len());
        Ok(Self { policies })
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn into_policies(self) -> Vec<Policy> {
        self.policies
    }
}

/// Typed, validated lookups of the `Vr/<name>/...` parameters of one policy
pub(crate) struct PolicyParameters<'a> {
    name: &'a str,
    parameters: &'a ParameterSet,
    catalog: &'a GeometryCatalog,
}

impl<'a> PolicyParameters<'a> {
    pub(crate) fn new(name: &'a str, parameters: &'a ParameterSet, catalog: &'a GeometryCatalog) -> Self {
        Self {
            name,
            parameters,
            catalog,
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.name
    }

    pub(crate) fn catalog(&self) -> &GeometryCatalog {
        self.catalog
    }

    /// Full parameter name, `Vr/<name>/<suffix>`
    pub(crate) fn full(&self, suffix: &str) -> String {
        format!("Vr/{}/{suffix}", self.name)
    }

    pub(crate) fn exists(&self, suffix: &str) -> bool {
        self.parameters.exists(&self.full(suffix))
    }

    /// Middle parts of `Vr/<name>/<prefix>...<suffix>` parameter names
    pub(crate) fn bracketed_names(&self, prefix: &str, suffix: &str) -> Vec<String> {
        self.parameters.names_bracketed_by(&self.full(prefix), suffix)
    }

    pub(crate) fn string(&self, suffix: &str) -> Result<String> {
        Ok(self.parameters.string(&self.full(suffix))?.to_string())
    }

    pub(crate) fn strings(&self, suffix: &str) -> Result<Vec<String>> {
        Ok(self.parameters.strings(&self.full(suffix))?.to_vec())
    }

    pub(crate) fn unitless(&self, suffix: &str) -> Result<f64> {
        Ok(self.parameters.unitless(&self.full(suffix))?)
    }

    pub(crate) fn unitlesses(&self, suffix: &str) -> Result<Vec<f64>> {
        Ok(self.parameters.unitlesses(&self.full(suffix))?.to_vec())
    }

    /// Length in mm
    pub(crate) fn length(&self, suffix: &str) -> Result<f64> {
        Ok(self.parameters.double(&self.full(suffix), Dimension::Length)?)
    }

    pub(crate) fn positive_length(&self, suffix: &str) -> Result<f64> {
        let length = self.length(suffix)?;
        self.require_positive(suffix, length)?;
        Ok(length)
    }

    pub(crate) fn doubles(&self, suffix: &str, dimension: Dimension) -> Result<Vec<f64>> {
        Ok(self.parameters.doubles(&self.full(suffix), dimension)?.to_vec())
    }

    pub(crate) fn boolean(&self, suffix: &str) -> Result<bool> {
        Ok(self.parameters.boolean(&self.full(suffix))?)
    }

    /// Boolean that falls back to `default` when not defined
    pub(crate) fn boolean_or(&self, suffix: &str, default: bool) -> Result<bool> {
        match self.exists(suffix) {
            true => Ok(self.parameters.boolean(&self.full(suffix))?),
            false => Ok(default),
        }
    }

    pub(crate) fn positive_integer(&self, suffix: &str) -> Result<u32> {
        let value = self.parameters.integer(&self.full(suffix))?;
        match u32::try_from(value) {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(Error::InvalidValue {
                parameter: self.full(suffix),
                value: value as f64,
                requirement: "a positive integer",
            }),
        }
    }

    pub(crate) fn non_negative_integer(&self, suffix: &str) -> Result<i32> {
        let value = self.parameters.integer(&self.full(suffix))?;
        match i32::try_from(value) {
            Ok(v) if v >= 0 => Ok(v),
            _ => Err(Error::InvalidValue {
                parameter: self.full(suffix),
                value: value as f64,
                requirement: "a non-negative integer",
            }),
        }
    }

    pub(crate) fn require_positive(&self, suffix: &str, value: f64) -> Result<()> {
        match value > 0.0 && value.is_finite() {
            true => Ok(()),
            false => Err(Error::InvalidValue {
                parameter: self.full(suffix),
                value,
                requirement: "positive",
            }),
        }
    }

    pub(crate) fn require_at_least_one(&self, suffix: &str, value: f64) -> Result<()> {
        match value >= 1.0 && value.is_finite() {
            true => Ok(()),
            false => Err(Error::InvalidValue {
                parameter: self.full(suffix),
                value,
                requirement: "at least 1",
            }),
        }
    }

    /// Fail unless every parameter in `others` has as many values as `reference`
    pub(crate) fn check_lengths<S: AsRef<str>>(&self, reference: &str, others: &[S]) -> Result<()> {
        let expected = self.parameters.vector_length(&self.full(reference))?;

        for other in others {
            let found = self.parameters.vector_length(&self.full(other.as_ref()))?;
            if found != expected {
                return Err(Error::VectorLengthMismatch {
                    parameter: self.full(other.as_ref()),
                    expected,
                    reference: self.full(reference),
                    found,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn check_region(&self, suffix: &str, region: &str) -> Result<()> {
        match self.catalog.has_region(region) {
            true => Ok(()),
            false => Err(Error::UnknownRegion {
                parameter: self.full(suffix),
                name: region.to_string(),
            }),
        }
    }

    /// Region names, each of which must exist
    pub(crate) fn regions(&self, suffix: &str) -> Result<RegionSet> {
        let names = self.strings(suffix)?;
        for name in &names {
            self.check_region(suffix, name)?;
        }
        Ok(RegionSet::new(names))
    }

    /// Volume names, each of which must exist
    pub(crate) fn volumes(&self, suffix: &str) -> Result<RegionSet> {
        let names = self.strings(suffix)?;
        if let Some(unknown) = names.iter().find(|n| !self.catalog.has_volume(n)) {
            return Err(Error::UnknownVolume {
                parameter: self.full(suffix),
                name: unknown.clone(),
            });
        }
        Ok(RegionSet::new(names))
    }

    pub(crate) fn species_patterns(&self, suffix: &str) -> Result<Vec<SpeciesPattern>> {
        self.strings(suffix)?
            .iter()
            .map(|name| {
                SpeciesPattern::from_name(name).ok_or_else(|| Error::UnknownParticle {
                    parameter: self.full(suffix),
                    name: name.clone(),
                })
            })
            .collect()
    }

    /// Inclusion list `named` or exclusion list `not_named`, exactly one of them
    pub(crate) fn particle_filter(&self, named: &str, not_named: &str) -> Result<ParticleFilter> {
        match (self.exists(named), self.exists(not_named)) {
            (true, true) => Err(Error::IncompatibleParameters {
                first: self.full(named),
                second: self.full(not_named),
            }),
            (true, false) => Ok(ParticleFilter::including(self.species_patterns(named)?)),
            (false, true) => Ok(ParticleFilter::excluding(self.species_patterns(not_named)?)),
            (false, false) => Err(Error::MissingAlternative {
                first: self.full(named),
                second: self.full(not_named),
            }),
        }
    }

    /// Bin count of a voxelised volume, from `Ge/<volume>/<axis>`
    pub(crate) fn geometry_bins(&self, volume: &str, axis: &str) -> Result<usize> {
        let name = format!("Ge/{volume}/{axis}");
        let value = self.parameters.integer(&name)?;
        usize::try_from(value).map_err(|_| Error::InvalidValue {
            parameter: name,
            value: value as f64,
            requirement: "a non-negative integer",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> GeometryCatalog {
        GeometryCatalog::new().with_region("Target").with_volume("Shield")
    }

    #[test]
    fn unknown_type() {
        let parameters = ParameterSet::parse(r#"s:Vr/Odd/Type = "Geometrical""#).unwrap();
        let error = Configuration::from_parameters(&parameters, &catalog()).unwrap_err();
        assert!(matches!(error, Error::UnknownBiasingType { .. }));
    }

    #[test]
    fn inclusion_and_exclusion_together() {
        let parameters = ParameterSet::parse(
            r#"
            s:Vr/Cut/Type = "RangeRejection"
            sv:Vr/Cut/ParticlesNamed = 1 "e-"
            sv:Vr/Cut/ParticlesNotNamed = 1 "gamma"
            sv:Vr/Cut/Regions = 1 "Target"
            "#,
        )
        .unwrap();
        let error = Configuration::from_parameters(&parameters, &catalog()).unwrap_err();
        assert!(matches!(error, Error::IncompatibleParameters { .. }));
    }

    #[test]
    fn unknown_names() {
        let parameters = ParameterSet::parse(
            r#"
            s:Vr/Cut/Type = "RangeRejection"
            sv:Vr/Cut/ParticlesNamed = 1 "graviton"
            sv:Vr/Cut/Regions = 1 "Target"
            "#,
        )
        .unwrap();
        let error = Configuration::from_parameters(&parameters, &catalog()).unwrap_err();
        assert!(matches!(error, Error::UnknownParticle { name, .. } if name == "graviton"));

        let parameters = ParameterSet::parse(
            r#"
            s:Vr/Wrap/Type = "PeriodicBoundaryCondition"
            sv:Vr/Wrap/ApplyBiasingInVolumesNamed = 1 "Target"
            "#,
        )
        .unwrap();
        let error = Configuration::from_parameters(&parameters, &catalog()).unwrap_err();
        assert!(matches!(error, Error::UnknownVolume { name, .. } if name == "Target"));
    }

    #[test]
    fn integer_ranges() {
        let parameters = ParameterSet::parse(
            r#"
            s:Vr/Split/Type = "InelasticSplitting"
            i:Vr/Split/SplitNumber = 0
            sv:Vr/Split/ApplyBiasingInVolumesNamed = 1 "Shield"
            "#,
        )
        .unwrap();
        let error = Configuration::from_parameters(&parameters, &catalog()).unwrap_err();
        assert!(matches!(error, Error::InvalidValue { value, .. } if value == 0.0));
    }

    #[test]
    fn inelastic_flags_are_required() {
        let base = r#"
            s:Vr/Split/Type = "InelasticSplitting"
            i:Vr/Split/SplitNumber = 10
            sv:Vr/Split/ApplyBiasingInVolumesNamed = 1 "Shield"
        "#;
        let cases = [
            ("", "Vr/Split/OnlyBiasPrimaryParticle"),
            (r#"b:Vr/Split/OnlyBiasPrimaryParticle = "True""#, "Vr/Split/BiasParticleOnlyOnce"),
            (r#"b:Vr/Split/BiasParticleOnlyOnce = "True""#, "Vr/Split/OnlyBiasPrimaryParticle"),
        ];

        for (flags, missing) in cases {
            let parameters = ParameterSet::parse(&format!("{base}\n{flags}")).unwrap();
            let error = Configuration::from_parameters(&parameters, &catalog()).unwrap_err();
            assert!(
                matches!(&error, Error::ParameterError(vrtools_params::Error::MissingParameter(name)) if name == missing),
                "unexpected error {error}"
            );
        }

        let parameters = ParameterSet::parse(&format!(
            "{base}\n{}\n{}",
            r#"b:Vr/Split/OnlyBiasPrimaryParticle = "False""#,
            r#"b:Vr/Split/BiasParticleOnlyOnce = "True""#
        ))
        .unwrap();
        assert!(Configuration::from_parameters(&parameters, &catalog()).is_ok());
    }

    #[test]
    fn reference_component_only_needed_with_regions() {
        let parameters = ParameterSet::parse(r#"s:Vr/Aim/Type = "DirectionalRussianRoulette""#).unwrap();
        assert!(Configuration::from_parameters(&parameters, &catalog()).is_ok());

        let parameters = ParameterSet::parse(
            r#"
            s:Vr/Aim/Type = "DirectionalRussianRoulette"
            sv:Vr/Aim/Target/ProcessesNamed = 1 "eBrem"
            dv:Vr/Aim/Target/DirectionalSplitLimits = 1 100 cm
            dv:Vr/Aim/Target/DirectionalSplitRadius = 1 10 cm
            "#,
        )
        .unwrap();
        let error = Configuration::from_parameters(&parameters, &catalog()).unwrap_err();
        assert!(matches!(
            error,
            Error::ParameterError(vrtools_params::Error::MissingParameter(name)) if name == "Vr/Aim/ReferenceComponent"
        ));
    }
}
