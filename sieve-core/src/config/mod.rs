//! Configuration loading.
//!
//! Scoring consumes an immutable [`ScoringConfig`](sieve_types::ScoringConfig);
//! this module produces it from a TOML file, environment overrides and two
//! line-oriented rule files (suffixes and domains).
//!
//! Every way the configuration can be wrong maps to its own [`ConfigError`]
//! variant and process exit status, so scripts can tell them apart.

mod loader;
mod models;
pub mod rules;
mod validation;

use std::path::PathBuf;

pub use loader::{ConfigLoader, LoadedConfig};
pub use models::{FieldSpec, IgnoreSpec, RawConfig, RawDistance, RawDomains, RawRule, RawSuffix};
pub use rules::RuleError;

/// Configuration file used when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SIEVE_";

/// Output extension used when the configuration names none.
pub const DEFAULT_EXTENSION: &str = ".ggs";

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The `[rule]` section is missing.
    #[error("configuration error: rule section not found")]
    MissingRule,

    /// The global `separator` is missing.
    #[error("configuration error: global parameter separator not found")]
    MissingSeparator,

    /// The global `separator` is empty.
    #[error("configuration error: global parameter separator must not be empty")]
    EmptySeparator,

    /// The global `field` is neither a non-negative integer nor a non-empty list of them.
    #[error("configuration error: the global parameter field must be a number or a list of numbers")]
    InvalidField,

    /// The global `field` is missing.
    #[error("configuration error: global parameter field not found")]
    MissingField,

    /// The TOML could not be parsed or a value has the wrong type.
    #[error("configuration parsing error: {0}")]
    Parse(String),

    /// The `[suffix.distance]` table is missing.
    #[error("configuration error: suffix section distance parameter not found")]
    MissingDistance,

    /// `rule.text` is missing or empty.
    #[error("configuration error: the text parameter in the rule section was not found")]
    MissingRuleText,

    /// `[domains]` or `domains.field` is missing.
    #[error("configuration error: the field parameter in the domains section was not found")]
    MissingDomainsField,

    /// `encoding` names no known ASCII-compatible encoding.
    #[error("configuration error: unsupported input encoding {0:?}")]
    UnsupportedEncoding(String),

    /// A suffix rule line could not be parsed.
    #[error("malformed suffix rule at {}:{line}: {source}", .path.display())]
    MalformedSuffix {
        /// Rule file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        source: RuleError,
    },

    /// A domain rule line could not be parsed.
    #[error("malformed domain rule at {}:{line}: {source}", .path.display())]
    MalformedDomain {
        /// Rule file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        source: RuleError,
    },

    /// A rule file could not be read.
    #[error("failed to read rule file {}: {source}", .path.display())]
    RuleFile {
        /// Rule file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Process exit status for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            ConfigError::NotFound(_) => 1,
            ConfigError::MissingRule => 2,
            ConfigError::MissingSeparator | ConfigError::EmptySeparator => 3,
            ConfigError::InvalidField => 4,
            ConfigError::MissingField => 5,
            ConfigError::Parse(_) => 6,
            ConfigError::MissingDistance => 7,
            ConfigError::MissingRuleText => 8,
            ConfigError::MissingDomainsField => 9,
            ConfigError::MalformedSuffix { .. } => 10,
            ConfigError::MalformedDomain { .. } => 11,
            ConfigError::RuleFile { .. } => 12,
            ConfigError::UnsupportedEncoding(_) => 15,
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Adds a leading dot to an output extension; empty means the default.
pub fn normalize_extension(extension: &str) -> String {
    let extension = extension.trim();
    if extension.is_empty() {
        DEFAULT_EXTENSION.to_owned()
    } else if extension.starts_with('.') {
        extension.to_owned()
    } else {
        format!(".{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_gets_leading_dot() {
        assert_eq!(normalize_extension("ggs"), ".ggs");
        assert_eq!(normalize_extension(".txt"), ".txt");
        assert_eq!(normalize_extension(""), ".ggs");
    }

    #[test]
    fn exit_codes_are_distinct_per_category() {
        let errors = [
            ConfigError::NotFound(PathBuf::from("x")),
            ConfigError::MissingRule,
            ConfigError::MissingSeparator,
            ConfigError::InvalidField,
            ConfigError::MissingField,
            ConfigError::Parse(String::new()),
            ConfigError::MissingDistance,
            ConfigError::MissingRuleText,
            ConfigError::MissingDomainsField,
            ConfigError::MalformedSuffix {
                path: PathBuf::new(),
                line: 1,
                source: RuleError::MissingWord,
            },
            ConfigError::MalformedDomain {
                path: PathBuf::new(),
                line: 1,
                source: RuleError::EmptyPattern,
            },
            ConfigError::RuleFile {
                path: PathBuf::new(),
                source: std::io::Error::other("x"),
            },
            ConfigError::UnsupportedEncoding(String::new()),
        ];
        let mut codes: Vec<u8> = errors.iter().map(ConfigError::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn malformed_rule_message_has_location() {
        let e = ConfigError::MalformedSuffix {
            path: PathBuf::from("suffix.txt"),
            line: 3,
            source: RuleError::MissingWord,
        };
        assert!(e.to_string().starts_with("malformed suffix rule at suffix.txt:3"));
    }
}
