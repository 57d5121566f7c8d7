//! Parameter set with typed, case-insensitive lookups

// standard library
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::parse_line;
use crate::value::{Dimension, Value};

use log::{debug, trace};

/// Flat collection of named parameters
///
/// Names are matched case-insensitively but remember the spelling of their
/// most recent definition. Later definitions of a name override earlier
/// ones, so several files may be layered with [ParameterSet::extend_from].
///
/// ```rust
/// # use vrtools_params::{Dimension, ParameterSet};
/// let text = r#"
///     s:Vr/Split/Type        = "InelasticSplitting"
///     i:Vr/Split/SplitNumber = 8
///     d:Vr/Box/HLX           = 2.5 cm
/// "#;
///
/// let parameters = ParameterSet::parse(text).unwrap();
/// assert_eq!(parameters.string("vr/split/type").unwrap(), "InelasticSplitting");
/// assert_eq!(parameters.integer("Vr/Split/SplitNumber").unwrap(), 8);
/// assert_eq!(parameters.double("Vr/Box/HLX", Dimension::Length).unwrap(), 25.0);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParameterSet {
    entries: HashMap<String, (String, Value)>,
}

impl ParameterSet {
    /// Empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse parameter definitions from text
    pub fn parse(text: &str) -> Result<Self> {
        let mut parameters = Self::new();
        for (idx, line) in text.lines().enumerate() {
            if let Some((name, value)) = parse_line(idx + 1, line)? {
                parameters.insert(&name, value);
            }
        }
        debug!("Parsed {} parameters", parameters.len());
        Ok(parameters)
    }

    /// Read parameter definitions from a file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading parameters from {}", path.display());
        let reader = BufReader::new(File::open(path)?);

        let mut parameters = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            if let Some((name, value)) = parse_line(idx + 1, &line?)? {
                parameters.insert(&name, value);
            }
        }
        debug!("Read {} parameters", parameters.len());
        Ok(parameters)
    }

    /// Layer another set on top of this one, overriding shared names
    pub fn extend_from(&mut self, other: ParameterSet) {
        self.entries.extend(other.entries);
    }

    /// Define or override a parameter
    pub fn insert(&mut self, name: &str, value: Value) {
        if let Some((previous, _)) = self
            .entries
            .insert(name.to_lowercase(), (name.to_string(), value))
        {
            trace!("{previous} overridden by a later definition");
        }
    }

    /// Check whether a parameter has been defined
    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    /// Raw value of a parameter, if defined
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(&name.to_lowercase()).map(|(_, v)| v)
    }

    /// Number of parameters defined
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no parameters are defined
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.values().map(|(n, v)| (n.as_str(), v))
    }

    /// Collect the middle part of every name with the given prefix and suffix
    ///
    /// Matching is case-insensitive. Results keep their defined spelling and
    /// are sorted so that callers see a stable order.
    ///
    /// ```rust
    /// # use vrtools_params::ParameterSet;
    /// let parameters = ParameterSet::parse(r#"
    ///     s:Vr/Roulette/Type = "DirectionalRussianRoulette"
    ///     s:Vr/Split/Type    = "InelasticSplitting"
    ///     i:Vr/Split/SplitNumber = 4
    /// "#).unwrap();
    ///
    /// assert_eq!(parameters.names_bracketed_by("Vr/", "/type"), vec!["Roulette", "Split"]);
    /// ```
    pub fn names_bracketed_by(&self, prefix: &str, suffix: &str) -> Vec<String> {
        let mut names = self
            .entries
            .values()
            .filter_map(|(name, _)| {
                let middle = strip_suffix_ignore_case(strip_prefix_ignore_case(name, prefix)?, suffix)?;
                (!middle.is_empty()).then(|| middle.to_string())
            })
            .collect::<Vec<String>>();

        names.sort();
        names
    }

    /// Number of values held by a parameter
    pub fn vector_length(&self, name: &str) -> Result<usize> {
        Ok(self.require(name)?.len())
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        match self.require(name)? {
            Value::String(s) => Ok(s),
            other => Err(wrong_type(name, "string", other)),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.require(name)? {
            Value::Boolean(b) => Ok(*b),
            other => Err(wrong_type(name, "boolean", other)),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            Value::Integer(i) => Ok(*i),
            other => Err(wrong_type(name, "integer", other)),
        }
    }

    /// Unitless real, accepting integers as well
    pub fn unitless(&self, name: &str) -> Result<f64> {
        match self.require(name)? {
            Value::Unitless(u) => Ok(*u),
            Value::Integer(i) => Ok(*i as f64),
            other => Err(wrong_type(name, "unitless", other)),
        }
    }

    /// Dimensioned real in internal units (mm, MeV)
    pub fn double(&self, name: &str, dimension: Dimension) -> Result<f64> {
        match self.require(name)? {
            Value::Double(d, found) => {
                check_dimension(name, dimension, *found)?;
                Ok(*d)
            }
            other => Err(wrong_type(name, "double", other)),
        }
    }

    pub fn strings(&self, name: &str) -> Result<&[String]> {
        match self.require(name)? {
            Value::StringVector(v) => Ok(v),
            other => Err(wrong_type(name, "string vector", other)),
        }
    }

    pub fn booleans(&self, name: &str) -> Result<&[bool]> {
        match self.require(name)? {
            Value::BooleanVector(v) => Ok(v),
            other => Err(wrong_type(name, "boolean vector", other)),
        }
    }

    pub fn integers(&self, name: &str) -> Result<&[i64]> {
        match self.require(name)? {
            Value::IntegerVector(v) => Ok(v),
            other => Err(wrong_type(name, "integer vector", other)),
        }
    }

    pub fn unitlesses(&self, name: &str) -> Result<&[f64]> {
        match self.require(name)? {
            Value::UnitlessVector(v) => Ok(v),
            other => Err(wrong_type(name, "unitless vector", other)),
        }
    }

    /// Dimensioned reals in internal units (mm, MeV)
    pub fn doubles(&self, name: &str, dimension: Dimension) -> Result<&[f64]> {
        match self.require(name)? {
            Value::DoubleVector(v, found) => {
                check_dimension(name, dimension, *found)?;
                Ok(v)
            }
            other => Err(wrong_type(name, "double vector", other)),
        }
    }

    fn require(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| Error::MissingParameter(name.to_string()))
    }
}

impl std::str::FromStr for ParameterSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut lines = self
            .entries
            .values()
            .map(|(name, value)| format!("{}:{name} = {value}", type_prefix(value)))
            .collect::<Vec<String>>();
        lines.sort();
        write!(f, "{}", lines.join("\n"))
    }
}

fn type_prefix(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "s",
        Value::Boolean(_) => "b",
        Value::Integer(_) => "i",
        Value::Unitless(_) => "u",
        Value::Double(..) => "d",
        Value::StringVector(_) => "sv",
        Value::BooleanVector(_) => "bv",
        Value::IntegerVector(_) => "iv",
        Value::UnitlessVector(_) => "uv",
        Value::DoubleVector(..) => "dv",
    }
}

fn wrong_type(name: &str, expected: &'static str, found: &Value) -> Error {
    Error::WrongType {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}

fn check_dimension(name: &str, expected: Dimension, found: Dimension) -> Result<()> {
    if expected != found {
        return Err(Error::WrongDimension {
            name: name.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

/// Remove `prefix` from the start of `s`, ignoring case character by character
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = s.chars();
    for expected in prefix.chars() {
        let c = rest.next()?;
        if !c.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(rest.as_str())
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let mut rest = s.chars();
    for expected in suffix.chars().rev() {
        let c = rest.next_back()?;
        if !c.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(rest.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_definitions_override() {
        let parameters = ParameterSet::parse(
            "i:Vr/Split/SplitNumber = 4\ni:vr/split/splitnumber = 9",
        )
        .unwrap();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters.integer("Vr/Split/SplitNumber").unwrap(), 9);
    }

    #[test]
    fn missing_and_wrong_type() {
        let parameters = ParameterSet::parse("i:Ge/Box/XBins = 4").unwrap();
        assert!(matches!(
            parameters.string("Ge/Box/XBins"),
            Err(Error::WrongType {
                expected: "string",
                found: "integer",
                ..
            })
        ));
        assert!(matches!(
            parameters.integer("Ge/Box/YBins"),
            Err(Error::MissingParameter(_))
        ));
    }

    #[test]
    fn unitless_accepts_integers() {
        let parameters = ParameterSet::parse("i:Vr/W/MaximumSplitNumber = 5").unwrap();
        assert_eq!(parameters.unitless("Vr/W/MaximumSplitNumber").unwrap(), 5.0);
    }

    #[test]
    fn dimension_is_checked() {
        let parameters = ParameterSet::parse("d:Vr/P/Tolerance = 1 keV").unwrap();
        assert!(matches!(
            parameters.double("Vr/P/Tolerance", Dimension::Length),
            Err(Error::WrongDimension { .. })
        ));
    }

    #[test]
    fn bracketed_names_need_a_middle() {
        let parameters = ParameterSet::parse("s:Vr//Type = \"x\"\ns:Vr/A/Type = \"y\"").unwrap();
        assert_eq!(parameters.names_bracketed_by("Vr/", "/Type"), vec!["A"]);
    }

    #[test]
    fn bracketed_names_with_multibyte_case() {
        // the Kelvin sign lowercases to a one byte 'k'
        let mut parameters = ParameterSet::new();
        parameters.insert("Vr/Ölfilter/\u{212A}ind", Value::String("x".to_string()));
        parameters.insert("\u{212A}r/Split/Type", Value::String("y".to_string()));

        assert_eq!(parameters.names_bracketed_by("vr/", "/kind"), vec!["Ölfilter"]);
        assert_eq!(parameters.names_bracketed_by("KR/", "/type"), vec!["Split"]);
        assert!(parameters.names_bracketed_by("Vr/Ö", "/Type").is_empty());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let text = "sv:Vr/R/Regions = 2 \"Target\" \"Shield\"\nu:Vr/W/SurvivalFactor = 0.5";
        let parameters = ParameterSet::parse(text).unwrap();
        let reparsed = ParameterSet::parse(&parameters.to_string()).unwrap();
        assert_eq!(parameters, reparsed);
    }
}
