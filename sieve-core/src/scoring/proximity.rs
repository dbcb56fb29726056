//! Proximity-windowed suffix scoring.
//!
//! For every suffix and every keyword occurrence, the tokens inside the
//! suffix's window are compared against the suffix word and each match adds
//! the suffix weight. Nothing is deduplicated: one token can match several
//! suffixes, and overlapping windows of neighbouring keywords count it again.

use core::ops::Range;

use sieve_types::{Distance, Suffix};

/// Returns the window `[kw - left, kw + right)` clamped to `[0, len)`.
///
/// # Example
///
/// ```
/// use sieve_core::scoring::proximity::window;
/// use sieve_types::Distance;
///
/// assert_eq!(window(0, Distance::new(5, 2), 10), 0..2);
/// assert_eq!(window(8, Distance::new(1, 5), 10), 7..10);
/// ```
#[inline(always)]
pub fn window(kw: usize, distance: Distance, len: usize) -> Range<usize> {
    let start = kw.saturating_sub(distance.left).min(len);
    let end = kw.saturating_add(distance.right).min(len);
    start..end.max(start)
}

/// Counts the tokens in `range` that satisfy `suffix`.
#[inline]
pub fn count_matches<S: AsRef<str>>(tokens: &[S], range: Range<usize>, suffix: &Suffix) -> usize {
    tokens[range]
        .iter()
        .filter(|t| suffix.mode.matches(t.as_ref(), &suffix.word))
        .count()
}

/// Sums `count × weight` over all suffixes and all keyword positions.
pub fn proximity_weight<S: AsRef<str>>(tokens: &[S], keywords: &[usize], suffixes: &[Suffix]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let len = tokens.len();
    let mut weight = 0.0;

    for suffix in suffixes {
        for &kw in keywords {
            let found = count_matches(tokens, window(kw, suffix.distance, len), suffix);
            weight += found as f64 * suffix.weight;
        }
    }

    weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_types::MatchMode;

    fn suffix(word: &str, weight: f64, left: usize, right: usize, mode: MatchMode) -> Suffix {
        Suffix::new(word, weight, Distance::new(left, right), mode)
    }

    #[test]
    fn window_is_clamped_at_start() {
        assert_eq!(window(0, Distance::new(5, 3), 10), 0..3);
    }

    #[test]
    fn window_is_clamped_at_end() {
        assert_eq!(window(9, Distance::new(2, 100), 10), 7..10);
    }

    #[test]
    fn window_excludes_keyword_when_right_is_zero() {
        assert_eq!(window(4, Distance::new(2, 0), 10), 2..4);
        assert_eq!(window(4, Distance::new(0, 0), 10), 4..4);
    }

    #[test]
    fn window_includes_keyword_when_right_is_positive() {
        assert_eq!(window(4, Distance::new(0, 1), 10), 4..5);
    }

    #[test]
    fn window_does_not_overflow() {
        assert_eq!(window(3, Distance::new(usize::MAX, usize::MAX), 5), 0..5);
    }

    #[test]
    fn substring_vs_exact() {
        let tokens = ["get", "freebie", "offer"];
        let keywords = [2];

        let inexact = [suffix("free", 1.0, 2, 0, MatchMode::Substring)];
        assert_eq!(proximity_weight(&tokens, &keywords, &inexact), 1.0);

        let exact = [suffix("free", 1.0, 2, 0, MatchMode::Exact)];
        assert_eq!(proximity_weight(&tokens, &keywords, &exact), 0.0);
    }

    #[test]
    fn keyword_at_start_with_large_left_distance() {
        let tokens = ["cheap", "buy", "buy", "buy"];
        let suffixes = [suffix("buy", 1.0, 5, 2, MatchMode::Exact)];
        // Scans [0, 2): "cheap", "buy".
        assert_eq!(proximity_weight(&tokens, &[0], &suffixes), 1.0);
    }

    #[test]
    fn sums_over_keywords_without_dedup() {
        let tokens = ["cheap", "pills", "cheap"];
        let suffixes = [suffix("pills", 2.0, 1, 2, MatchMode::Exact)];
        // kw 0 → [0, 2) has "pills"; kw 2 → [1, 3) has "pills" again.
        assert_eq!(proximity_weight(&tokens, &[0, 2], &suffixes), 4.0);
    }

    #[test]
    fn one_token_satisfies_several_suffixes() {
        let tokens = ["buy", "cheapest", "cheap"];
        let suffixes = [
            suffix("cheap", 1.0, 2, 0, MatchMode::Substring),
            suffix("est", 0.5, 2, 0, MatchMode::Substring),
        ];
        assert_eq!(proximity_weight(&tokens, &[2], &suffixes), 1.5);
    }

    #[test]
    fn no_keywords_no_weight() {
        let tokens = ["buy", "now"];
        let suffixes = [suffix("buy", 10.0, 5, 5, MatchMode::Exact)];
        assert_eq!(proximity_weight(&tokens, &[], &suffixes), 0.0);
    }

    #[test]
    fn negative_suffix_weight_subtracts() {
        let tokens = ["free", "trial"];
        let suffixes = [suffix("trial", -1.0, 0, 2, MatchMode::Exact)];
        assert_eq!(proximity_weight(&tokens, &[0], &suffixes), -1.0);
    }
}
