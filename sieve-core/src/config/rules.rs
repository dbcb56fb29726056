//! Suffix and domain rule parsers.
//!
//! Both rule files are line oriented; blank lines and lines starting with
//! `#` are skipped by the loader before these parsers see them.
//!
//! Suffix line: `"word":weight:left+right:mode`
//!
//! ```text
//! "buy":2:1+0:a
//! 'free':1.5:3:i
//! "now"
//! ```
//!
//! Domain line: `pattern:weight` or just `pattern`.
//!
//! ```text
//! ru:3
//! co.uk:2
//! example.org
//! ```

use sieve_types::{Distance, Domain, MatchMode, Suffix};

/// Why a rule line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The line does not start with a non-empty quoted word.
    #[error("expected a quoted word such as \"buy\"")]
    MissingWord,
    /// Something other than `:` follows the quoted word.
    #[error("expected ':' after the quoted word, found {0:?}")]
    ExpectedColon(String),
    /// More than `weight:distance:mode` after the word.
    #[error("too many ':'-separated parts")]
    TooManyParts,
    /// The weight is not a number.
    #[error("invalid weight {0:?}")]
    InvalidWeight(String),
    /// The distance is not `N` or `L+R`.
    #[error("invalid distance {0:?}")]
    InvalidDistance(String),
    /// The mode is not one of the known flags.
    #[error("unknown match mode {0:?}")]
    UnknownMode(String),
    /// The domain pattern is empty.
    #[error("empty domain pattern")]
    EmptyPattern,
}

fn parse_weight(raw: &str, default: f64) -> Result<f64, RuleError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse()
        .map_err(|_| RuleError::InvalidWeight(raw.to_owned()))
}

fn parse_side(raw: &str, default: usize) -> Result<usize, RuleError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse()
        .map_err(|_| RuleError::InvalidDistance(raw.to_owned()))
}

/// Parses `N` (both sides) or `L+R`; empty sides take the default.
pub fn parse_distance(raw: &str, default: Distance) -> Result<Distance, RuleError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }

    match raw.split_once('+') {
        None => {
            let value = parse_side(raw, default.left)?;
            Ok(Distance::symmetric(value))
        }
        Some((_, right)) if right.contains('+') => Err(RuleError::InvalidDistance(raw.to_owned())),
        Some((left, right)) => Ok(Distance::new(
            parse_side(left, default.left)?,
            parse_side(right, default.right)?,
        )),
    }
}

/// Parses a match mode flag.
pub fn parse_mode(raw: &str) -> Result<MatchMode, RuleError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "a" | "accurate" | "exact" => Ok(MatchMode::Exact),
        "i" | "inaccurate" | "substring" => Ok(MatchMode::Substring),
        _ => Err(RuleError::UnknownMode(raw.trim().to_owned())),
    }
}

/// Parses one suffix rule line.
///
/// # Example
///
/// ```
/// use sieve_core::config::rules::parse_suffix;
/// use sieve_types::{Distance, MatchMode};
///
/// let s = parse_suffix("\"Buy\":2:1+0:a", Distance::default()).unwrap();
/// assert_eq!(s.word, "buy");
/// assert_eq!(s.weight, 2.0);
/// assert_eq!(s.distance, Distance::new(1, 0));
/// assert_eq!(s.mode, MatchMode::Exact);
/// ```
pub fn parse_suffix(line: &str, default: Distance) -> Result<Suffix, RuleError> {
    let line = line.trim();
    let quote = match line.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(RuleError::MissingWord),
    };

    let body = &line[1..];
    // The word needs at least one character, so the closing quote is searched
    // from the second one on: `"""` yields the word `"`.
    let first_len = body.chars().next().map_or(0, char::len_utf8);
    let close = body
        .get(first_len..)
        .and_then(|rest| rest.find(quote))
        .map(|i| i + first_len)
        .ok_or(RuleError::MissingWord)?;

    let word = &body[..close];
    let rest = body[close + quote.len_utf8()..].trim_start();

    if rest.is_empty() {
        return Ok(Suffix::new(word, 0.0, default, MatchMode::Exact));
    }

    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| RuleError::ExpectedColon(rest.to_owned()))?;

    let mut parts = rest.split(':');
    let weight = parse_weight(parts.next().unwrap_or_default(), 0.0)?;
    let distance = parse_distance(parts.next().unwrap_or_default(), default)?;
    let mode = parse_mode(parts.next().unwrap_or_default())?;
    if parts.next().is_some() {
        return Err(RuleError::TooManyParts);
    }

    Ok(Suffix::new(word, weight, distance, mode))
}

/// Parses one domain rule line; a missing weight takes `default_weight`.
///
/// # Example
///
/// ```
/// use sieve_core::config::rules::parse_domain;
///
/// let d = parse_domain("co.uk:2", 1.0).unwrap();
/// assert_eq!(d.labels, ["co", "uk"]);
/// assert_eq!(d.weight, 2.0);
/// ```
pub fn parse_domain(line: &str, default_weight: f64) -> Result<Domain, RuleError> {
    let line = line.trim();
    let (pattern, weight) = match line.split_once(':') {
        Some((pattern, weight)) => (pattern, parse_weight(weight, default_weight)?),
        None => (line, default_weight),
    };

    let pattern = pattern.trim();
    if pattern.is_empty() || pattern == "." {
        return Err(RuleError::EmptyPattern);
    }

    Ok(Domain::from_pattern(pattern, weight))
}
