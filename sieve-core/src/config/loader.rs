//! Configuration loader.
//!
//! Loads the TOML file (with environment overrides), validates it, then reads
//! the suffix and domain rule files it points to.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use tracing::{debug, warn};

use super::models::RawConfig;
use super::rules::{parse_domain, parse_suffix, RuleError};
use super::validation::{self, ValidatedConfig};
use super::{ConfigError, Result, ENV_PREFIX};
use sieve_types::{Distance, Domain, ScoringConfig, Suffix};

/// A fully loaded configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Immutable scoring configuration.
    pub scoring: ScoringConfig,
    /// Output file extension, always with a leading dot.
    pub extension: String,
    /// Input text encoding.
    pub encoding: &'static Encoding,
}

/// Configuration loader that handles the TOML file and both rule files.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
    base_dir: PathBuf,
    suffix_fallback: Option<PathBuf>,
    domains_fallback: Option<PathBuf>,
}

impl ConfigLoader {
    /// Creates a loader for a configuration file.
    ///
    /// Rule file paths named in the file are resolved against its directory.
    /// Variables prefixed with `SIEVE_` override keys from the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(Self {
            figment,
            base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            suffix_fallback: None,
            domains_fallback: None,
        })
    }

    /// Creates a loader from TOML text; rule files resolve against `base_dir`.
    ///
    /// No environment overrides are applied.
    pub fn from_toml_str(toml: &str, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            figment: Figment::from(Toml::string(toml)),
            base_dir: base_dir.into(),
            suffix_fallback: None,
            domains_fallback: None,
        }
    }

    /// Suffix file used when the configuration names none.
    pub fn suffix_file(&mut self, path: Option<PathBuf>) -> &mut Self {
        self.suffix_fallback = path;
        self
    }

    /// Domain file used when the configuration names none.
    pub fn domains_file(&mut self, path: Option<PathBuf>) -> &mut Self {
        self.domains_fallback = path;
        self
    }

    /// Extracts the raw, unvalidated configuration.
    pub fn raw(&self) -> Result<RawConfig> {
        self.figment
            .extract()
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Extracts, validates and loads the rule files.
    pub fn load(&self) -> Result<LoadedConfig> {
        let validated = validation::validate(self.raw()?)?;
        debug!(config = ?validated, "configuration validated");

        let ValidatedConfig {
            extension,
            encoding,
            separator,
            text_fields,
            domain_field,
            rule,
            ignore,
            distance,
            default_domain_weight,
            suffix_file,
            domains_file,
        } = validated;

        let suffixes = match self.resolve(suffix_file, &self.suffix_fallback) {
            Some(path) => read_suffixes(&path, distance)?,
            None => {
                warn!("suffix file not specified");
                Vec::new()
            }
        };

        let domains = match self.resolve(domains_file, &self.domains_fallback) {
            Some(path) => read_domains(&path, default_domain_weight)?,
            None => {
                warn!("domains file not specified");
                Vec::new()
            }
        };

        Ok(LoadedConfig {
            scoring: ScoringConfig {
                separator,
                text_fields,
                domain_field,
                rule,
                ignore,
                suffixes,
                domains,
                default_domain_weight,
            },
            extension,
            encoding,
        })
    }

    fn resolve(&self, configured: Option<PathBuf>, fallback: &Option<PathBuf>) -> Option<PathBuf> {
        configured
            .map(|file| self.base_dir.join(file))
            .or_else(|| fallback.clone())
    }
}

/// Yields `(line_number, content)` for every non-blank, non-comment line.
fn rule_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn read_rule_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ConfigError::RuleFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a suffix rule file; `default` fills distances the lines leave out.
pub fn read_suffixes(path: &Path, default: Distance) -> Result<Vec<Suffix>> {
    let text = read_rule_file(path)?;
    let suffixes = rule_lines(&text)
        .map(|(line, content)| {
            parse_suffix(content, default).map_err(|source: RuleError| {
                ConfigError::MalformedSuffix {
                    path: path.to_path_buf(),
                    line,
                    source,
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if suffixes.is_empty() {
        warn!(path = %path.display(), "no suffixes found");
    }
    debug!(path = %path.display(), count = suffixes.len(), "suffix rules loaded");
    Ok(suffixes)
}

/// Reads a domain rule file; lines without a weight take `default_weight`.
pub fn read_domains(path: &Path, default_weight: f64) -> Result<Vec<Domain>> {
    let text = read_rule_file(path)?;
    let domains = rule_lines(&text)
        .map(|(line, content)| {
            parse_domain(content, default_weight).map_err(|source| ConfigError::MalformedDomain {
                path: path.to_path_buf(),
                line,
                source,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if domains.is_empty() {
        warn!(path = %path.display(), "no domains found");
    }
    debug!(path = %path.display(), count = domains.len(), "domain rules loaded");
    Ok(domains)
}
