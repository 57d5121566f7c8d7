//! Particle species and species filters

/// Particle species known to the biasing policies
///
/// Light nuclei have their own variants, everything heavier is an
/// [Species::Ion] described by atomic number, mass number and charge.
///
/// Species can be inferred from the usual transport names or from PDG codes,
/// case-insensitive.
///
/// ```rust
/// # use vrtools_biasing::Species;
/// // From the particle name
/// assert_eq!(Species::from_name("e-"), Some(Species::Electron));
/// assert_eq!(Species::from_name("HE3"), Some(Species::Helium3));
///
/// // From the PDG code
/// assert_eq!(Species::from_name("2112"), Some(Species::Neutron));
/// assert_eq!(Species::from_name("1000020040"), Some(Species::Alpha));
///
/// // Anything else is unknown
/// assert_eq!(Species::from_name("graviton"), None);
/// ```
///
/// | Variant       | Name          | PDG code   |
/// | ------------- | ------------- | ---------- |
/// | Gamma         | gamma         | 22         |
/// | Electron      | e-            | 11         |
/// | Positron      | e+            | -11        |
/// | Proton        | proton        | 2212       |
/// | Neutron       | neutron       | 2112       |
/// | Deuteron      | deuteron      | 1000010020 |
/// | Triton        | triton        | 1000010030 |
/// | Helium3       | He3           | 1000020030 |
/// | Alpha         | alpha         | 1000020040 |
/// | MuonMinus     | mu-           | 13         |
/// | MuonPlus      | mu+           | -13        |
/// | PionMinus     | pi-           | -211       |
/// | PionPlus      | pi+           | 211        |
/// | PionZero      | pi0           | 111        |
/// | OpticalPhoton | opticalphoton | 0          |
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Species {
    Gamma,
    Electron,
    Positron,
    Proton,
    Neutron,
    Deuteron,
    Triton,
    Helium3,
    Alpha,
    MuonMinus,
    MuonPlus,
    PionMinus,
    PionPlus,
    PionZero,
    OpticalPhoton,
    /// Generic ion with atomic number, mass number and charge
    Ion { z: u32, a: u32, charge: i32 },
}

impl Species {
    /// Convert from a particle name or PDG code
    ///
    /// PDG codes of heavy ions (`100ZZZAAAI`) are not species on their own
    /// because the charge state is unknown, see [SpeciesPattern::from_name].
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();

        let species = match name.as_str() {
            "gamma" | "22" => Self::Gamma,
            "e-" | "electron" | "11" => Self::Electron,
            "e+" | "positron" | "-11" => Self::Positron,
            "proton" | "2212" => Self::Proton,
            "neutron" | "2112" => Self::Neutron,
            "deuteron" | "1000010020" => Self::Deuteron,
            "triton" | "1000010030" => Self::Triton,
            "he3" | "1000020030" => Self::Helium3,
            "alpha" | "1000020040" => Self::Alpha,
            "mu-" | "13" => Self::MuonMinus,
            "mu+" | "-13" => Self::MuonPlus,
            "pi-" | "-211" => Self::PionMinus,
            "pi+" | "211" => Self::PionPlus,
            "pi0" | "111" => Self::PionZero,
            "opticalphoton" | "0" => Self::OpticalPhoton,
            _ => return None,
        };

        Some(species)
    }

    /// Atomic number, mass number and charge of nuclear species
    ///
    /// Light nuclei are taken to be fully ionised. Returns `None` for
    /// anything that is not a nucleus.
    pub fn nucleus(&self) -> Option<(u32, u32, i32)> {
        match self {
            Self::Proton => Some((1, 1, 1)),
            Self::Deuteron => Some((1, 2, 1)),
            Self::Triton => Some((1, 3, 1)),
            Self::Helium3 => Some((2, 3, 2)),
            Self::Alpha => Some((2, 4, 2)),
            Self::Ion { z, a, charge } => Some((*z, *a, *charge)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Gamma => "gamma",
            Self::Electron => "e-",
            Self::Positron => "e+",
            Self::Proton => "proton",
            Self::Neutron => "neutron",
            Self::Deuteron => "deuteron",
            Self::Triton => "triton",
            Self::Helium3 => "He3",
            Self::Alpha => "alpha",
            Self::MuonMinus => "mu-",
            Self::MuonPlus => "mu+",
            Self::PionMinus => "pi-",
            Self::PionPlus => "pi+",
            Self::PionZero => "pi0",
            Self::OpticalPhoton => "opticalphoton",
            Self::Ion { z, a, charge } => return write!(f, "GenericIon({z},{a},{charge})"),
        };
        write!(f, "{name}")
    }
}

/// One entry of a particle filter
///
/// A pattern is either an exact species or a nucleus description where any
/// of `Z`, `A` and charge may be left as a wildcard.
///
/// ```rust
/// # use vrtools_biasing::{Species, SpeciesPattern};
/// let carbon = SpeciesPattern::from_name("GenericIon(6,*)").unwrap();
/// assert!(carbon.matches(&Species::Ion { z: 6, a: 12, charge: 6 }));
/// assert!(carbon.matches(&Species::Ion { z: 6, a: 11, charge: 3 }));
/// assert!(!carbon.matches(&Species::Alpha));
///
/// // bare GenericIon matches every nucleus
/// let any = SpeciesPattern::from_name("GenericIon").unwrap();
/// assert!(any.matches(&Species::Alpha));
/// assert!(!any.matches(&Species::Gamma));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesPattern {
    Exact(Species),
    Nucleus {
        z: Option<u32>,
        a: Option<u32>,
        charge: Option<i32>,
    },
}

impl SpeciesPattern {
    /// Convert from a species name, PDG code or `GenericIon(Z,A[,charge])`
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(species) = Species::from_name(name) {
            return Some(Self::Exact(species));
        }

        let name = name.trim().to_lowercase();
        if let Some(spec) = name.strip_prefix("genericion") {
            return parse_generic_ion(spec);
        }

        parse_ion_code(&name)
    }

    /// Check a species against the pattern
    pub fn matches(&self, species: &Species) -> bool {
        match self {
            Self::Exact(s) => s == species,
            Self::Nucleus { z, a, charge } => match species.nucleus() {
                Some((sz, sa, sc)) => {
                    z.map_or(true, |z| z == sz)
                        && a.map_or(true, |a| a == sa)
                        && charge.map_or(true, |c| c == sc)
                }
                None => false,
            },
        }
    }
}

/// `(Z,A)` or `(Z,A,charge)` following `GenericIon`, `*` for wildcards
fn parse_generic_ion(spec: &str) -> Option<SpeciesPattern> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Some(SpeciesPattern::Nucleus {
            z: None,
            a: None,
            charge: None,
        });
    }

    let inner = spec.strip_prefix('(')?.strip_suffix(')')?;
    let fields = inner.split(',').map(str::trim).collect::<Vec<&str>>();
    if !(2..=3).contains(&fields.len()) {
        return None;
    }

    fn wildcard<T: std::str::FromStr>(field: &str) -> Option<Option<T>> {
        match field {
            "*" => Some(None),
            _ => field.parse::<T>().ok().map(Some),
        }
    }

    Some(SpeciesPattern::Nucleus {
        z: wildcard(fields[0])?,
        a: wildcard(fields[1])?,
        charge: match fields.get(2) {
            Some(field) => wildcard(field)?,
            None => None,
        },
    })
}

/// Ten digit `100ZZZAAAI` ion codes, ground states only
fn parse_ion_code(code: &str) -> Option<SpeciesPattern> {
    if code.len() != 10 || !code.starts_with("100") || !code.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !code.ends_with('0') {
        return None;
    }

    Some(SpeciesPattern::Nucleus {
        z: Some(code[3..6].parse().ok()?),
        a: Some(code[6..9].parse().ok()?),
        charge: None,
    })
}

/// Inclusion or exclusion list of species
///
/// ```rust
/// # use vrtools_biasing::{ParticleFilter, Species, SpeciesPattern};
/// let patterns = vec![SpeciesPattern::Exact(Species::Gamma)];
///
/// let only_gammas = ParticleFilter::including(patterns.clone());
/// assert!(only_gammas.accepts(&Species::Gamma));
/// assert!(!only_gammas.accepts(&Species::Electron));
///
/// let no_gammas = ParticleFilter::excluding(patterns);
/// assert!(!no_gammas.accepts(&Species::Gamma));
/// assert!(no_gammas.accepts(&Species::Electron));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleFilter {
    patterns: Vec<SpeciesPattern>,
    invert: bool,
}

impl ParticleFilter {
    /// Accept only species matching one of the patterns
    pub fn including(patterns: Vec<SpeciesPattern>) -> Self {
        Self {
            patterns,
            invert: false,
        }
    }

    /// Accept everything except species matching one of the patterns
    pub fn excluding(patterns: Vec<SpeciesPattern>) -> Self {
        Self {
            patterns,
            invert: true,
        }
    }

    pub fn accepts(&self, species: &Species) -> bool {
        self.patterns.iter().any(|p| p.matches(species)) != self.invert
    }

    pub fn is_exclusion(&self) -> bool {
        self.invert
    }
}
