//! Configuration data models.
//!
//! These mirror the TOML layout one to one. Every key is optional here so
//! that a missing key surfaces as its own [`ConfigError`](super::ConfigError)
//! during validation instead of a generic deserialization failure.

use std::path::PathBuf;

use figment::value::Value;
use serde::Deserialize;

/// Top level of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    /// Output file extension, with or without the leading dot.
    pub extension: Option<String>,
    /// Input encoding label (`utf-8`, `windows-1251`, ...).
    pub encoding: Option<String>,
    /// Field separator.
    pub separator: Option<String>,
    /// Text field index or indices.
    pub field: Option<FieldSpec>,
    /// `[rule]` section.
    pub rule: Option<RawRule>,
    /// `[suffix]` section.
    pub suffix: Option<RawSuffix>,
    /// `[domains]` section.
    pub domains: Option<RawDomains>,
}

/// `field = 1` or `field = [1, 2]`.
///
/// Anything else lands in `Other` so validation can reject it with the
/// dedicated error instead of a parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// A single index.
    One(i64),
    /// A list of indices.
    Many(Vec<i64>),
    /// Any other value.
    Other(Value),
}

/// `ignore = ".-"` (one symbol per character) or `ignore = ["::", "."]`.
///
/// Membership is whole-token: with `".-"` the raw run `.-` in `x.-y` is not
/// a symbol and stays its own token. List `".-"` explicitly to merge it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IgnoreSpec {
    /// Every non-whitespace character is a symbol.
    Chars(String),
    /// Every entry is a symbol.
    List(Vec<String>),
}

/// `[rule]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRule {
    /// Keyword.
    pub text: Option<String>,
    /// Weight per keyword occurrence; defaults to 0.
    pub weight: Option<f64>,
    /// Ignore symbols.
    pub ignore: Option<IgnoreSpec>,
}

/// `[suffix]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSuffix {
    /// Suffix rule file, relative to the configuration file.
    pub file: Option<PathBuf>,
    /// `[suffix.distance]` table.
    pub distance: Option<RawDistance>,
}

/// `[suffix.distance]` table; `left` and `right` fall back to `default`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawDistance {
    /// Fallback for both sides; defaults to 0.
    pub default: Option<usize>,
    /// Left distance.
    pub left: Option<usize>,
    /// Right distance.
    pub right: Option<usize>,
}

/// `[domains]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDomains {
    /// Index of the URL/host field.
    pub field: Option<usize>,
    /// Multiplier when no domain rule matches; defaults to 0.
    pub weight: Option<f64>,
    /// Domain rule file, relative to the configuration file.
    pub file: Option<PathBuf>,
}
