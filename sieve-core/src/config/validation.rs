//! Configuration validation.
//!
//! Checks run in a fixed order so a file with several problems always
//! reports the same one first.

use std::path::PathBuf;

use encoding_rs::{Encoding, UTF_8};

use super::models::{FieldSpec, IgnoreSpec, RawConfig};
use super::{normalize_extension, ConfigError, Result};
use sieve_types::{Distance, IgnoreSymbols, Rule};

/// Everything from the TOML file, validated, before the rule files are read.
#[derive(Debug, Clone)]
pub(crate) struct ValidatedConfig {
    pub extension: String,
    pub encoding: &'static Encoding,
    pub separator: String,
    pub text_fields: Vec<usize>,
    pub domain_field: usize,
    pub rule: Rule,
    pub ignore: IgnoreSymbols,
    pub distance: Distance,
    pub default_domain_weight: f64,
    pub suffix_file: Option<PathBuf>,
    pub domains_file: Option<PathBuf>,
}

pub(crate) fn validate(raw: RawConfig) -> Result<ValidatedConfig> {
    let rule = raw.rule.ok_or(ConfigError::MissingRule)?;

    let separator = raw.separator.ok_or(ConfigError::MissingSeparator)?;
    if separator.is_empty() {
        return Err(ConfigError::EmptySeparator);
    }

    let text_fields = validate_fields(raw.field.ok_or(ConfigError::MissingField)?)?;

    let suffix = raw.suffix.unwrap_or_default();
    let distance = suffix.distance.ok_or(ConfigError::MissingDistance)?;
    let default = distance.default.unwrap_or(0);
    let distance = Distance::new(
        distance.left.unwrap_or(default),
        distance.right.unwrap_or(default),
    );

    let text = rule
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or(ConfigError::MissingRuleText)?;

    let ignore = match rule.ignore {
        Some(IgnoreSpec::Chars(chars)) => IgnoreSymbols::from_chars(&chars),
        Some(IgnoreSpec::List(list)) => list
            .into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => IgnoreSymbols::new(),
    };

    let domains = raw.domains.ok_or(ConfigError::MissingDomainsField)?;
    let domain_field = domains.field.ok_or(ConfigError::MissingDomainsField)?;

    let encoding = match raw.encoding.as_deref().map(str::trim) {
        None | Some("") => UTF_8,
        Some(label) => Encoding::for_label(label.as_bytes())
            .filter(|e| e.is_ascii_compatible())
            .ok_or_else(|| ConfigError::UnsupportedEncoding(label.to_owned()))?,
    };

    Ok(ValidatedConfig {
        extension: normalize_extension(raw.extension.as_deref().unwrap_or_default()),
        encoding,
        separator,
        text_fields,
        domain_field,
        rule: Rule::new(text.trim(), rule.weight.unwrap_or(0.0)),
        ignore,
        distance,
        default_domain_weight: domains.weight.unwrap_or(0.0),
        suffix_file: suffix.file,
        domains_file: domains.file,
    })
}

fn validate_fields(spec: FieldSpec) -> Result<Vec<usize>> {
    let indices = match spec {
        FieldSpec::One(index) => vec![index],
        FieldSpec::Many(indices) if !indices.is_empty() => indices,
        FieldSpec::Many(_) | FieldSpec::Other(_) => return Err(ConfigError::InvalidField),
    };

    indices
        .into_iter()
        .map(|i| usize::try_from(i).map_err(|_| ConfigError::InvalidField))
        .collect()
}
