//! Line scoring.

use smallvec::SmallVec;

use crate::analyzer::Tokenizer;
use crate::scoring::domain::DomainMultiplier;
use crate::scoring::keyword::{locate_keywords, Positions};
use crate::scoring::proximity::proximity_weight;
use sieve_types::{FieldIndexError, ScoringConfig, Weight};

/// Scores records against a [`ScoringConfig`].
///
/// Reuses its token and position buffers between calls, so a single scorer
/// should be kept for a whole run. The config is only ever read.
///
/// # Example
///
/// ```
/// use sieve_core::scoring::LineScorer;
/// use sieve_types::{Distance, Domain, IgnoreSymbols, MatchMode, Rule, ScoringConfig, Suffix};
///
/// let config = ScoringConfig {
///     separator: "|".into(),
///     text_fields: vec![1],
///     domain_field: 0,
///     rule: Rule::new("cheap", 1.0),
///     ignore: IgnoreSymbols::new(),
///     suffixes: vec![Suffix::new("buy", 2.0, Distance::new(1, 0), MatchMode::Exact)],
///     domains: vec![Domain::from_pattern("ru", 3.0)],
///     default_domain_weight: 1.0,
/// };
///
/// let mut scorer = LineScorer::new(&config);
/// let weight = scorer.score_line("http://pharma-deals.ru|buy cheap meds now").unwrap();
/// assert_eq!(weight.map(|w| w.to_string()).as_deref(), Some("9"));
/// ```
#[derive(Debug)]
pub struct LineScorer<'c> {
    config: &'c ScoringConfig,
    tokenizer: Tokenizer<'c>,
    domains: DomainMultiplier<'c>,
    tokens: Vec<String>,
    positions: Positions,
}

impl<'c> LineScorer<'c> {
    /// Creates a scorer bound to `config`.
    pub fn new(config: &'c ScoringConfig) -> Self {
        Self {
            config,
            tokenizer: Tokenizer::new(&config.ignore),
            domains: DomainMultiplier::new(&config.domains, config.default_domain_weight),
            tokens: Vec::with_capacity(64),
            positions: Positions::new(),
        }
    }

    /// Returns the configuration this scorer reads.
    #[inline(always)]
    pub fn config(&self) -> &'c ScoringConfig {
        self.config
    }

    /// Weight of one text field: keyword hits plus proximity-weighted suffixes.
    pub fn field_weight(&mut self, text: &str) -> f64 {
        self.tokenizer.tokenize_into(text, &mut self.tokens);

        let config = self.config;
        let keyword_weight = locate_keywords(&self.tokens, &config.rule, &mut self.positions);
        keyword_weight + proximity_weight(&self.tokens, &self.positions, &config.suffixes)
    }

    /// Splits `line` on the configured separator and scores it.
    ///
    /// See [`LineScorer::score_fields`] for the result.
    pub fn score_line(&mut self, line: &str) -> Result<Option<Weight>, FieldIndexError> {
        let fields: SmallVec<[&str; 16]> = line.split(self.config.separator.as_str()).collect();
        self.score_fields(&fields)
    }

    /// Scores an already split record.
    ///
    /// Returns `Ok(Some(weight))` when the line is retained, `Ok(None)` when it
    /// scores zero or less.
    ///
    /// # Errors
    ///
    /// Returns [`FieldIndexError`] if any configured text or domain field
    /// index is missing from the record. Nothing is scored in that case.
    pub fn score_fields(&mut self, fields: &[&str]) -> Result<Option<Weight>, FieldIndexError> {
        let config = self.config;
        check_indices(config, fields.len())?;

        let mut weight = 0.0;
        for &index in &config.text_fields {
            weight += self.field_weight(fields[index]);
        }

        if weight == 0.0 {
            return Ok(None);
        }

        weight *= self.domains.multiplier(fields[config.domain_field]);

        Ok((weight > 0.0).then_some(Weight(weight)))
    }
}

#[inline]
fn check_indices(config: &ScoringConfig, fields: usize) -> Result<(), FieldIndexError> {
    if config.max_field_index() < fields {
        return Ok(());
    }

    let index = config
        .text_fields
        .iter()
        .copied()
        .chain(core::iter::once(config.domain_field))
        .find(|&i| i >= fields)
        .unwrap_or(config.domain_field);

    Err(FieldIndexError { index, fields })
}
