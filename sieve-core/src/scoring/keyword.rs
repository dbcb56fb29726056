//! Keyword location.

use sieve_types::Rule;
use smallvec::SmallVec;

/// Keyword positions within one field's token sequence.
pub type Positions = SmallVec<[usize; 8]>;

/// Collects every position whose token equals the rule keyword.
///
/// Returns the weight contributed by the keyword itself: one `rule.weight`
/// per occurrence. `positions` is cleared first and ends up in ascending order.
#[inline]
pub fn locate_keywords<S: AsRef<str>>(tokens: &[S], rule: &Rule, positions: &mut Positions) -> f64 {
    positions.clear();
    positions.extend(
        tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.as_ref() == rule.keyword)
            .map(|(n, _)| n),
    );
    positions.len() as f64 * rule.weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_occurrence() {
        let tokens = ["free", "stuff", "free", "and", "free"];
        let mut positions = Positions::new();
        let weight = locate_keywords(&tokens, &Rule::new("free", 1.5), &mut positions);

        assert_eq!(positions.as_slice(), &[0, 2, 4]);
        assert_eq!(weight, 4.5);
    }

    #[test]
    fn exact_equality_only() {
        let tokens = ["freebie", "carefree", "free."];
        let mut positions = Positions::new();
        let weight = locate_keywords(&tokens, &Rule::new("free", 1.0), &mut positions);

        assert!(positions.is_empty());
        assert_eq!(weight, 0.0);
    }

    #[test]
    fn keyword_is_compared_lowercased() {
        let tokens = ["free"];
        let mut positions = Positions::new();
        locate_keywords(&tokens, &Rule::new("FREE", 1.0), &mut positions);
        assert_eq!(positions.as_slice(), &[0]);
    }

    #[test]
    fn positions_buffer_is_reset() {
        let mut positions = Positions::new();
        locate_keywords(&["a", "a"], &Rule::new("a", 1.0), &mut positions);
        locate_keywords(&["b", "a"], &Rule::new("a", 1.0), &mut positions);
        assert_eq!(positions.as_slice(), &[1]);
    }

    #[test]
    fn empty_tokens() {
        let tokens: [&str; 0] = [];
        let mut positions = Positions::new();
        assert_eq!(locate_keywords(&tokens, &Rule::new("a", 2.0), &mut positions), 0.0);
    }
}
