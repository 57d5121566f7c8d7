//! Integration tests for reading parameter files

use std::io::Write;

use rstest::{fixture, rstest};
use vrtools_params::{Dimension, Error, ParameterSet, Value};

const POLICIES: &str = r#"
# Importance map over the phantom
s:Vr/Importance/Type                        = "AutomaticImportanceSampling"
sv:Vr/Importance/ApplyBiasingInVolumesNamed = 1 "Phantom"
s:Vr/Importance/InputFile                   = "importance.bin"
i:Ge/Phantom/XBins = 4
i:Ge/Phantom/YBins = 3
i:Ge/Phantom/ZBins = 2

s:Vr/Split/Type                         = "InelasticSplitting"
i:Vr/Split/SplitNumber                  = 8
b:Vr/Split/OnlyBiasPrimaryParticle      = "True"
b:Vr/Split/BiasParticleOnlyOnce         = "False"
sv:Vr/Split/ApplyBiasingInVolumesNamed  = 2 "Phantom" "Shield"

s:Vr/Xs/Type                = "CrossSectionEnhancement"
sv:Vr/Xs/ProcessesNamed     = 2 "compt" "phot"
uv:Vr/Xs/EnhancementFactor  = 2 10 2.5

s:Vr/Forced/Type                          = "ForcedInteraction"
dv:Vr/Forced/ForRegion/Target/ForcedDistances = 1 3 cm
"#;

#[fixture]
fn policies() -> ParameterSet {
    ParameterSet::parse(POLICIES).unwrap()
}

#[rstest]
fn policy_names(policies: ParameterSet) {
    assert_eq!(
        policies.names_bracketed_by("Vr/", "/Type"),
        vec!["Forced", "Importance", "Split", "Xs"]
    );
}

#[rstest]
#[case("Vr/Importance/Type", "AutomaticImportanceSampling")]
#[case("vr/split/type", "InelasticSplitting")]
#[case("VR/XS/TYPE", "CrossSectionEnhancement")]
fn strings_any_case(policies: ParameterSet, #[case] name: &str, #[case] expected: &str) {
    assert_eq!(policies.string(name).unwrap(), expected);
}

#[rstest]
fn typed_lookups(policies: ParameterSet) {
    assert_eq!(policies.integer("Ge/Phantom/XBins").unwrap(), 4);
    assert!(policies.boolean("Vr/Split/OnlyBiasPrimaryParticle").unwrap());
    assert!(!policies.boolean("Vr/Split/BiasParticleOnlyOnce").unwrap());
    assert_eq!(
        policies.strings("Vr/Split/ApplyBiasingInVolumesNamed").unwrap(),
        &["Phantom".to_string(), "Shield".to_string()]
    );
    assert_eq!(
        policies.unitlesses("Vr/Xs/EnhancementFactor").unwrap(),
        &[10.0, 2.5]
    );
    assert_eq!(
        policies
            .doubles("Vr/Forced/ForRegion/Target/ForcedDistances", Dimension::Length)
            .unwrap(),
        &[30.0]
    );
    assert_eq!(policies.vector_length("Vr/Xs/ProcessesNamed").unwrap(), 2);
}

#[rstest]
fn read_from_file(policies: ParameterSet) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{POLICIES}").unwrap();

    let parameters = ParameterSet::read(file.path()).unwrap();
    assert_eq!(parameters, policies);
}

#[rstest]
fn missing_file() {
    assert!(matches!(
        ParameterSet::read("./not/a/real/file.txt"),
        Err(Error::IOError(_))
    ));
}

#[rstest]
#[case("uv:Vr/Xs/EnhancementFactor = 3 10 2.5", 3, 2)]
#[case("sv:Vr/Xs/ProcessesNamed = 1 \"compt\" \"phot\"", 1, 2)]
#[case("dv:Vr/W/EnergyBounds = 2 MeV", 2, 0)]
fn vector_length_mismatch(#[case] line: &str, #[case] declared: usize, #[case] values: usize) {
    match ParameterSet::parse(line) {
        Err(Error::VectorLengthMismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, declared);
            assert_eq!(found, values);
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[rstest]
fn layered_sets_override(mut policies: ParameterSet) {
    let overrides = ParameterSet::parse("i:Vr/Split/SplitNumber = 2").unwrap();
    policies.extend_from(overrides);
    assert_eq!(policies.integer("Vr/Split/SplitNumber").unwrap(), 2);

    policies.insert("Vr/Split/SplitNumber", Value::Integer(3));
    assert_eq!(policies.integer("Vr/Split/SplitNumber").unwrap(), 3);
}
