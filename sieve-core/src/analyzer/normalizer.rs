//! Field lowercasing.

/// Lowercasing normalizer for record fields.
///
/// Unlike a search normalizer this keeps whitespace and punctuation exactly
/// where they are, because the tokenizer splits on word boundaries and the
/// position of every symbol matters for re-merging.
///
/// # Performance
///
/// A pure-ASCII field is copied and lowercased in place. Any other field
/// goes through `str::to_lowercase`, the same conversion used for rule
/// keywords, suffix words and domain patterns.
///
/// # Examples
///
/// ```
/// use sieve_core::analyzer::FieldNormalizer;
///
/// let normalizer = FieldNormalizer::new();
/// assert_eq!(normalizer.normalize("Buy CHEAP Meds"), "buy cheap meds");
/// assert_eq!(normalizer.normalize("ДЁШЕВО"), "дёшево");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNormalizer;

impl FieldNormalizer {
    /// Creates a new normalizer.
    pub const fn new() -> Self {
        Self
    }

    /// Lowercases `input` into `out`, clearing it first.
    ///
    /// Reuses the buffer's capacity if sufficient.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();

        if input.is_ascii() {
            out.push_str(input);
            out.make_ascii_lowercase();
            return;
        }

        // Context-sensitive mappings (final sigma) need the whole string.
        out.push_str(&input.to_lowercase());
    }

    /// Lowercases a field into a new `String`.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}
