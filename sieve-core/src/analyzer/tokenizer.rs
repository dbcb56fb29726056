//! Field Tokenizer Module
//!
//! Turns one record field into the token sequence that keyword and suffix
//! matching run over. Tokenization is two explicit passes:
//!
//! 1. **Boundary split**: the lowercased field is cut at every transition
//!    between word characters (Unicode alphanumerics and `_`) and everything
//!    else. Each fragment is trimmed and empty fragments are dropped, so a
//!    non-word run like `", "` becomes the single raw token `","`.
//! 2. **Merge pass**: raw tokens listed in [`IgnoreSymbols`] are glued back
//!    onto the previously emitted token together with the raw token that
//!    follows them.
//!
//! ## Example
//!
//! With `.` as an ignore symbol, `"Visit example.com today"` splits into
//! `visit`, `example`, `.`, `com`, `today` and merges into:
//!
//! ```ignore
//! ["visit", "example.com", "today"]
//! ```
//!
//! ## Leading Ignore Symbols
//!
//! A field may start with an ignore symbol, leaving nothing to merge into.
//! The symbol is then appended to an empty starting token: `".com rocks"`
//! yields `[".com", "rocks"]`.
//!
//! ## Positions
//!
//! A token's position is its index in the final sequence. Proximity windows
//! are measured in these positions, so merging changes distances.

use smallvec::SmallVec;

use crate::analyzer::normalizer::FieldNormalizer;
use sieve_types::IgnoreSymbols;

#[inline(always)]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits `text` at word/non-word boundaries and emits trimmed, non-empty fragments.
///
/// This is the first tokenizer pass on its own; fragments are slices of `text`.
///
/// # Example
///
/// ```
/// use sieve_core::analyzer::tokenizer::split_boundaries;
///
/// let mut raw = Vec::new();
/// split_boundaries("buy, now!", |t| raw.push(t));
/// assert_eq!(raw, ["buy", ",", "now", "!"]);
/// ```
pub fn split_boundaries<'n, F>(text: &'n str, mut emit: F)
where
    F: FnMut(&'n str),
{
    let mut emit_trimmed = |fragment: &'n str| {
        let fragment = fragment.trim();
        if !fragment.is_empty() {
            emit(fragment);
        }
    };

    let mut chars = text.char_indices();
    let Some((_, first)) = chars.next() else {
        return;
    };

    let mut start = 0usize;
    let mut in_word = is_word_char(first);

    for (i, c) in chars {
        let word = is_word_char(c);
        if word != in_word {
            emit_trimmed(&text[start..i]);
            start = i;
            in_word = word;
        }
    }

    emit_trimmed(&text[start..]);
}

/// Field tokenizer with ignore-symbol re-merging.
///
/// Holds reusable buffers, so one instance should be kept per scoring run and
/// fed field after field.
///
/// ## Example
///
/// ```
/// use sieve_core::analyzer::Tokenizer;
/// use sieve_types::IgnoreSymbols;
///
/// let ignore = IgnoreSymbols::from_chars(".");
/// let mut tokenizer = Tokenizer::new(&ignore);
///
/// assert_eq!(tokenizer.tokenize("Shop at EXAMPLE.com"), ["shop", "at", "example.com"]);
/// ```
#[derive(Debug)]
pub struct Tokenizer<'a> {
    ignore: &'a IgnoreSymbols,
    normalizer: FieldNormalizer,
    norm_buf: String,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer that re-merges the given symbols.
    pub fn new(ignore: &'a IgnoreSymbols) -> Self {
        Self {
            ignore,
            normalizer: FieldNormalizer::new(),
            norm_buf: String::with_capacity(256),
        }
    }

    /// Tokenizes `field` into `out`, clearing it first.
    pub fn tokenize_into(&mut self, field: &str, out: &mut Vec<String>) {
        out.clear();
        self.normalizer.normalize_into(field, &mut self.norm_buf);

        let mut raw: SmallVec<[&str; 32]> = SmallVec::new();
        split_boundaries(&self.norm_buf, |t| raw.push(t));

        if self.ignore.is_empty() {
            out.extend(raw.iter().map(|t| (*t).to_owned()));
            return;
        }

        let mut i = 0usize;
        while i < raw.len() {
            let token = raw[i];
            if !self.ignore.contains(token) {
                out.push(token.to_owned());
                i += 1;
                continue;
            }

            let next = raw.get(i + 1).copied();
            match out.last_mut() {
                Some(last) => last.push_str(token),
                None => out.push(token.to_owned()),
            }
            if let Some(next) = next {
                if let Some(last) = out.last_mut() {
                    last.push_str(next);
                }
                i += 2;
            } else {
                i += 1;
            }
        }
    }

    /// Tokenizes `field` and returns the tokens.
    pub fn tokenize(&mut self, field: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.tokenize_into(field, &mut out);
        out
    }
}
