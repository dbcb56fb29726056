//! Core types for the sieve line scoring engine.
//!
//! This crate holds the plain value types shared between the scoring core
//! and the command-line front end. Keeping them separate ensures:
//!
//! - **Immutable configuration**: a [`ScoringConfig`] is built once by a loader
//!   and only ever read afterwards
//! - **Cross-crate compatibility**: core and CLI share the same types
//! - **Clean boundaries**: no loader or I/O concerns leak into the data model

#![warn(missing_docs)]

use core::fmt;
use rustc_hash::FxHashSet;

/// How a suffix word is compared against the tokens inside its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MatchMode {
    /// The token must equal the suffix word ("accurate").
    #[default]
    Exact = 0,
    /// The token must contain the suffix word ("inaccurate").
    Substring = 1,
}

impl MatchMode {
    /// Returns `true` if `token` satisfies `word` under this mode.
    #[inline(always)]
    pub fn matches(self, token: &str, word: &str) -> bool {
        match self {
            MatchMode::Exact => token == word,
            MatchMode::Substring => token.contains(word),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Exact => f.write_str("exact"),
            MatchMode::Substring => f.write_str("substring"),
        }
    }
}

/// Token distance searched on each side of a keyword occurrence.
///
/// The window for a keyword at position `kw` is `[kw - left, kw + right)`,
/// clamped to the token sequence. Note that with `right == 0` the keyword
/// itself is outside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Distance {
    /// Tokens searched before the keyword.
    pub left: usize,
    /// Tokens searched from the keyword onwards (exclusive upper bound offset).
    pub right: usize,
}

impl Distance {
    /// Creates a distance pair.
    #[inline(always)]
    pub const fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// Creates a symmetric distance.
    #[inline(always)]
    pub const fn symmetric(value: usize) -> Self {
        Self {
            left: value,
            right: value,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.left, self.right)
    }
}

/// The keyword that anchors scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Lowercased keyword, compared against tokens for equality.
    pub keyword: String,
    /// Weight added for every occurrence of the keyword.
    pub weight: f64,
}

impl Rule {
    /// Creates a rule, lowercasing the keyword.
    pub fn new(keyword: &str, weight: f64) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            weight,
        }
    }
}

/// A secondary term scored by proximity to keyword occurrences.
#[derive(Debug, Clone, PartialEq)]
pub struct Suffix {
    /// Lowercased suffix word.
    pub word: String,
    /// Weight added per match inside a window.
    pub weight: f64,
    /// Window around each keyword occurrence.
    pub distance: Distance,
    /// Comparison mode.
    pub mode: MatchMode,
}

impl Suffix {
    /// Creates a suffix, lowercasing the word.
    pub fn new(word: &str, weight: f64, distance: Distance, mode: MatchMode) -> Self {
        Self {
            word: word.to_lowercase(),
            weight,
            distance,
            mode,
        }
    }
}

/// A domain-suffix pattern with its multiplier.
///
/// `labels` holds the dot-separated pattern, e.g. `["co", "uk"]` for `co.uk`.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    /// Pattern labels, lowercased, in host order.
    pub labels: Vec<String>,
    /// Multiplier applied when the pattern matches.
    pub weight: f64,
}

impl Domain {
    /// Builds a domain rule from a dotted pattern such as `"co.uk"` or `".ru"`.
    ///
    /// The pattern is lowercased and a single leading dot is ignored.
    pub fn from_pattern(pattern: &str, weight: f64) -> Self {
        let pattern = pattern.trim();
        let pattern = pattern.strip_prefix('.').unwrap_or(pattern);
        Self {
            labels: pattern.split('.').map(str::to_lowercase).collect(),
            weight,
        }
    }

    /// Returns the pattern joined back with dots.
    pub fn pattern(&self) -> String {
        self.labels.join(".")
    }
}

/// Literal tokens that are re-merged into their neighbours during tokenization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSymbols {
    symbols: FxHashSet<String>,
}

impl IgnoreSymbols {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set where every character of `chars` is one symbol.
    ///
    /// Whitespace characters are skipped since they never survive tokenization.
    ///
    /// Membership is checked per whole token, not per character: with `".-"`
    /// the run `.-` in `x.-y` matches neither symbol and stays a token of its
    /// own. Insert `".-"` itself to have it merged.
    pub fn from_chars(chars: &str) -> Self {
        chars
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(String::from)
            .collect()
    }

    /// Adds a symbol.
    pub fn insert(&mut self, symbol: impl Into<String>) {
        self.symbols.insert(symbol.into());
    }

    /// Returns `true` if `token` is an ignore symbol.
    #[inline(always)]
    pub fn contains(&self, token: &str) -> bool {
        self.symbols.contains(token)
    }

    /// Number of symbols in the set.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if no symbols are configured.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSymbols {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Validated, read-only scoring configuration.
///
/// Built once before any line is scored and shared by reference afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Field separator of input and output lines.
    pub separator: String,
    /// Zero-based indices of the free-text fields that are scored.
    pub text_fields: Vec<usize>,
    /// Zero-based index of the field holding the URL or host.
    pub domain_field: usize,
    /// Keyword rule.
    pub rule: Rule,
    /// Symbols re-merged by the tokenizer.
    pub ignore: IgnoreSymbols,
    /// Suffix table; every entry is applied.
    pub suffixes: Vec<Suffix>,
    /// Domain table; first match in this order wins.
    pub domains: Vec<Domain>,
    /// Multiplier used when no domain rule matches.
    pub default_domain_weight: f64,
}

impl ScoringConfig {
    /// Largest field index referenced by the configuration.
    pub fn max_field_index(&self) -> usize {
        self.text_fields
            .iter()
            .copied()
            .fold(self.domain_field, usize::max)
    }
}

/// A line weight, rendered the way it is appended to retained lines.
///
/// Integral weights print without a fractional part (`9`), everything else
/// prints in shortest round-trip form (`4.5`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Weight(pub f64);

impl Weight {
    /// Largest magnitude printed through the integer path; beyond it `f64`
    /// no longer represents every integer.
    const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

    /// Returns the underlying value.
    #[inline(always)]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.0;
        if w.is_finite() && w.fract() == 0.0 && w.abs() < Self::MAX_EXACT_INT {
            write!(f, "{}", w as i64)
        } else {
            write!(f, "{}", w)
        }
    }
}

/// A configured field index does not exist in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIndexError {
    /// The configured index that was requested.
    pub index: usize,
    /// Number of fields the record actually has.
    pub fields: usize,
}

impl fmt::Display for FieldIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field index {} out of range: record has {} field(s)",
            self.index, self.fields
        )
    }
}

impl core::error::Error for FieldIndexError {}
