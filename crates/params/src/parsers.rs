//! Nom parsers for single parameter definitions
//!
//! Every non-blank line of a parameter file has the form
//!
//! ```text
//! <type>:<name> = <value(s)> [unit]    # optional comment
//! ```
//!
//! where vector types give the number of values first, e.g.
//! `dv:Vr/Roulette/DirectionalSplitLimits = 2 10.0 25.0 cm`.

// crate modules
use crate::error::{Error, Result};
use crate::value::{Dimension, Value};

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::take_till;
use nom::bytes::complete::take_till1;
use nom::character::complete::{self, alpha1, alphanumeric1, char, space0, space1};
use nom::combinator::{all_consuming, map_res};
use nom::multi::separated_list0;
use nom::number::complete::double;
use nom::sequence::{delimited, pair, terminated, tuple};
use nom::IResult;

use log::trace;

/// Parse one line into a `(name, value)` pair
///
/// Blank lines and comment-only lines give `Ok(None)`.
pub(crate) fn parse_line(line_number: usize, line: &str) -> Result<Option<(String, Value)>> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let parse_error = || Error::ParseError {
        line: line_number,
        content: line.to_string(),
    };

    let (body, (kind, name)) = definition(line).map_err(|_| parse_error())?;
    let kind = changeable_to_plain(&kind.to_lowercase());
    trace!("line {line_number}: {kind}:{name} = {body}");

    let value = match kind.as_str() {
        "s" => Value::String(finish(quoted, body).map_err(|_| parse_error())?.to_string()),
        "b" => Value::Boolean(finish(boolean, body).map_err(|_| parse_error())?),
        "i" => Value::Integer(finish(complete::i64, body).map_err(|_| parse_error())?),
        "u" => Value::Unitless(finish(double, body).map_err(|_| parse_error())?),
        "d" => {
            let (v, unit) = finish(with_unit(double), body).map_err(|_| parse_error())?;
            let (dimension, factor) = resolve_unit(name, unit)?;
            Value::Double(v * factor, dimension)
        }
        "sv" => {
            let (n, v) = finish(counted(quoted), body).map_err(|_| parse_error())?;
            check_count(name, n, v.len())?;
            Value::StringVector(v.into_iter().map(str::to_string).collect())
        }
        "bv" => {
            let (n, v) = finish(counted(boolean), body).map_err(|_| parse_error())?;
            check_count(name, n, v.len())?;
            Value::BooleanVector(v)
        }
        "iv" => {
            let (n, v) = finish(counted(complete::i64), body).map_err(|_| parse_error())?;
            check_count(name, n, v.len())?;
            Value::IntegerVector(v)
        }
        "uv" => {
            let (n, v) = finish(counted(double), body).map_err(|_| parse_error())?;
            check_count(name, n, v.len())?;
            Value::UnitlessVector(v)
        }
        "dv" => {
            let ((n, v), unit) =
                finish(with_unit(counted(double)), body).map_err(|_| parse_error())?;
            check_count(name, n, v.len())?;
            let (dimension, factor) = resolve_unit(name, unit)?;
            Value::DoubleVector(v.into_iter().map(|d| d * factor).collect(), dimension)
        }
        _ => {
            return Err(Error::UnknownType {
                name: name.to_string(),
                kind,
            })
        }
    };

    Ok(Some((name.to_string(), value)))
}

/// Type prefix and name, consuming the `=` separator
fn definition(i: &str) -> IResult<&str, (&str, &str)> {
    let (i, kind) = terminated(alpha1, char(':'))(i)?;
    let (i, name) = take_till1(|c: char| c.is_whitespace() || c == '=')(i)?;
    let (i, _) = tuple((space0, char('='), space0))(i)?;
    Ok((i, (kind, name)))
}

/// Run a value parser over the full body, allowing trailing whitespace only
fn finish<'a, O, F>(
    parser: F,
    body: &'a str,
) -> core::result::Result<O, nom::Err<nom::error::Error<&'a str>>>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    let (_, value) = all_consuming(terminated(parser, space0))(body)?;
    Ok(value)
}

/// Double quoted string, quotes removed
fn quoted(i: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"'))(i)
}

/// Boolean as a quoted or bare word, e.g. `"True"`, `false`, `1`
fn boolean(i: &str) -> IResult<&str, bool> {
    map_res(alt((quoted, alphanumeric1)), |word: &str| {
        match word.to_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(()),
        }
    })(i)
}

/// Declared count followed by whitespace separated values
fn counted<'a, O, F>(item: F) -> impl FnMut(&'a str) -> IResult<&'a str, (usize, Vec<O>)>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    pair(
        terminated(map_res(complete::u64, usize::try_from), space0),
        separated_list0(space1, item),
    )
}

/// Any value followed by a unit word
fn with_unit<'a, O, F>(value: F) -> impl FnMut(&'a str) -> IResult<&'a str, (O, &'a str)>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    pair(terminated(value, space0), alpha1)
}

/// Changeable parameters (`dc:`, `svc:`, ...) behave like their plain types
fn changeable_to_plain(kind: &str) -> String {
    match kind.strip_suffix('c') {
        Some(plain) if !plain.is_empty() => plain.to_string(),
        _ => kind.to_string(),
    }
}

fn resolve_unit(name: &str, unit: &str) -> Result<(Dimension, f64)> {
    Dimension::from_unit(unit).ok_or_else(|| Error::UnknownUnit {
        name: name.to_string(),
        unit: unit.to_string(),
    })
}

fn check_count(name: &str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::VectorLengthMismatch {
            name: name.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

/// Drop everything after a `#` that is not inside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (idx, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..idx],
            _ => (),
        }
    }
    line
}
