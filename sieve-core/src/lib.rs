//! Core engine for sieve, a proximity-weighted keyword scorer for delimited
//! text files.
//!
//! A run reads records line by line, scores the configured text fields and
//! keeps every record whose final weight is positive:
//!
//! - [`analyzer`]: field normalization and tokenization
//! - [`scoring`]: keyword location, proximity weighting, domain multipliers
//! - [`config`]: TOML configuration and rule files
//! - [`pipeline`]: file streaming and output
//!
//! Shared data types live in the `sieve-types` crate and are re-exported here.

pub mod analyzer;
pub mod config;
pub mod pipeline;
pub mod scoring;

pub use sieve_types::{
    Distance, Domain, FieldIndexError, IgnoreSymbols, MatchMode, Rule, ScoringConfig, Suffix,
    Weight,
};
