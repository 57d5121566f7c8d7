//! Parameter values and unit handling

/// Physical dimension of a `d`/`dv` parameter
///
/// All dimensioned values are converted to internal units on parsing, so a
/// parameter only needs to remember which dimension it belongs to.
///
/// | Dimension | Internal unit | Accepted units            |
/// | --------- | ------------- | ------------------------- |
/// | Length    | mm            | nm, um, mm, cm, m, km     |
/// | Energy    | MeV           | eV, keV, MeV, GeV, TeV    |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Lengths, stored in mm
    Length,
    /// Energies, stored in MeV
    Energy,
}

impl Dimension {
    /// Find the dimension and conversion factor to internal units for a unit
    ///
    /// Units are case sensitive so that `mm` and `Mm` can never be confused.
    ///
    /// ```rust
    /// # use vrtools_params::Dimension;
    /// assert_eq!(Dimension::from_unit("cm"), Some((Dimension::Length, 10.0)));
    /// assert_eq!(Dimension::from_unit("keV"), Some((Dimension::Energy, 1.0e-3)));
    /// assert_eq!(Dimension::from_unit("furlong"), None);
    /// ```
    pub fn from_unit(unit: &str) -> Option<(Self, f64)> {
        let conversion = match unit {
            "nm" => (Self::Length, 1.0e-6),
            "um" => (Self::Length, 1.0e-3),
            "mm" => (Self::Length, 1.0),
            "cm" => (Self::Length, 10.0),
            "m" => (Self::Length, 1.0e3),
            "km" => (Self::Length, 1.0e6),
            "eV" => (Self::Energy, 1.0e-6),
            "keV" => (Self::Energy, 1.0e-3),
            "MeV" => (Self::Energy, 1.0),
            "GeV" => (Self::Energy, 1.0e3),
            "TeV" => (Self::Energy, 1.0e6),
            _ => return None,
        };
        Some(conversion)
    }
}

/// Typed value of a single parameter
///
/// Variants mirror the type prefixes used in parameter files, e.g. `s:` for
/// [Value::String] and `dv:` for [Value::DoubleVector].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `s:` quoted string
    String(String),
    /// `b:` boolean
    Boolean(bool),
    /// `i:` integer
    Integer(i64),
    /// `u:` unitless real
    Unitless(f64),
    /// `d:` real with a physical dimension, in internal units
    Double(f64, Dimension),
    /// `sv:` list of strings
    StringVector(Vec<String>),
    /// `bv:` list of booleans
    BooleanVector(Vec<bool>),
    /// `iv:` list of integers
    IntegerVector(Vec<i64>),
    /// `uv:` list of unitless reals
    UnitlessVector(Vec<f64>),
    /// `dv:` list of reals with a physical dimension, in internal units
    DoubleVector(Vec<f64>, Dimension),
}

impl Value {
    /// Short type name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Unitless(_) => "unitless",
            Self::Double(..) => "double",
            Self::StringVector(_) => "string vector",
            Self::BooleanVector(_) => "boolean vector",
            Self::IntegerVector(_) => "integer vector",
            Self::UnitlessVector(_) => "unitless vector",
            Self::DoubleVector(..) => "double vector",
        }
    }

    /// Number of values held, 1 for scalar variants
    pub fn len(&self) -> usize {
        match self {
            Self::StringVector(v) => v.len(),
            Self::BooleanVector(v) => v.len(),
            Self::IntegerVector(v) => v.len(),
            Self::UnitlessVector(v) => v.len(),
            Self::DoubleVector(v, _) => v.len(),
            _ => 1,
        }
    }

    /// True only for vector variants holding no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Boolean(b) => write!(f, "\"{}\"", if *b { "True" } else { "False" }),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Unitless(u) => write!(f, "{u}"),
            Self::Double(d, Dimension::Length) => write!(f, "{d} mm"),
            Self::Double(d, Dimension::Energy) => write!(f, "{d} MeV"),
            Self::StringVector(v) => {
                write!(f, "{}", v.len())?;
                v.iter().try_for_each(|s| write!(f, " \"{s}\""))
            }
            Self::BooleanVector(v) => {
                write!(f, "{}", v.len())?;
                v.iter()
                    .try_for_each(|b| write!(f, " \"{}\"", if *b { "True" } else { "False" }))
            }
            Self::IntegerVector(v) => {
                write!(f, "{}", v.len())?;
                v.iter().try_for_each(|i| write!(f, " {i}"))
            }
            Self::UnitlessVector(v) => {
                write!(f, "{}", v.len())?;
                v.iter().try_for_each(|u| write!(f, " {u}"))
            }
            Self::DoubleVector(v, dimension) => {
                write!(f, "{}", v.len())?;
                v.iter().try_for_each(|d| write!(f, " {d}"))?;
                match dimension {
                    Dimension::Length => write!(f, " mm"),
                    Dimension::Energy => write!(f, " MeV"),
                }
            }
        }
    }
}
