//! Domain multiplier.
//!
//! The domain field of a record holds a URL (`https://user@shop.example.co.uk:8443/x`)
//! or a bare host (`shop.example.co.uk`). Only the host is used: it is matched
//! against the domain table by trailing labels, and the first rule in table
//! order wins. Longer patterns get no priority, so `uk` declared before
//! `co.uk` shadows it.

use memchr::{memchr, memchr3, memmem, memrchr};
use sieve_types::Domain;

#[inline(always)]
fn is_scheme(candidate: &str) -> bool {
    let mut bytes = candidate.bytes();
    bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
}

/// Extracts the lowercased host from a URL or bare host string.
///
/// - `scheme://` and a leading `//` are skipped; anything else is a bare host.
/// - The location ends at the first `/`, `?` or `#`.
/// - User-info up to the last `@` is dropped, as is a numeric `:port`.
/// - Bracketed IPv6 literals lose their brackets.
/// - A trailing root dot is removed.
///
/// # Example
///
/// ```
/// use sieve_core::scoring::domain::extract_host;
///
/// assert_eq!(extract_host("http://User@Pharma-Deals.RU:8080/buy?x=1"), "pharma-deals.ru");
/// assert_eq!(extract_host("shop.example.co.uk/path"), "shop.example.co.uk");
/// ```
pub fn extract_host(field: &str) -> String {
    let field = field.trim();
    let bytes = field.as_bytes();

    let rest = if let Some(stripped) = field.strip_prefix("//") {
        stripped
    } else {
        match memmem::find(bytes, b"://") {
            Some(i) if is_scheme(&field[..i]) => &field[i + 3..],
            _ => field,
        }
    };

    let location = match memchr3(b'/', b'?', b'#', rest.as_bytes()) {
        Some(end) => &rest[..end],
        None => rest,
    };

    let location = match memrchr(b'@', location.as_bytes()) {
        Some(at) => &location[at + 1..],
        None => location,
    };

    let host = if let Some(bracketed) = location.strip_prefix('[') {
        match memchr(b']', bracketed.as_bytes()) {
            Some(close) => &bracketed[..close],
            None => bracketed,
        }
    } else {
        match memrchr(b':', location.as_bytes()) {
            Some(colon) if location[colon + 1..].bytes().all(|b| b.is_ascii_digit()) => {
                &location[..colon]
            }
            _ => location,
        }
    };

    let host = host.strip_suffix('.').unwrap_or(host);
    host.to_lowercase()
}

/// Returns `true` if the trailing labels of `host` equal `domain.labels`.
///
/// A host with fewer labels than the pattern never matches, and an empty
/// host matches nothing.
#[inline]
pub fn labels_match(host: &str, domain: &Domain) -> bool {
    if host.is_empty() || domain.labels.is_empty() {
        return false;
    }

    let mut host_labels = host.rsplit('.');
    domain
        .labels
        .iter()
        .rev()
        .all(|label| host_labels.next() == Some(label.as_str()))
}

/// Maps a record's domain field to exactly one multiplier.
#[derive(Debug, Clone, Copy)]
pub struct DomainMultiplier<'c> {
    domains: &'c [Domain],
    default_weight: f64,
}

impl<'c> DomainMultiplier<'c> {
    /// Creates a multiplier over a domain table with a fallback weight.
    pub const fn new(domains: &'c [Domain], default_weight: f64) -> Self {
        Self {
            domains,
            default_weight,
        }
    }

    /// Returns the first rule, in table order, matching `host`.
    pub fn matching_rule(&self, host: &str) -> Option<&'c Domain> {
        self.domains.iter().find(|d| labels_match(host, d))
    }

    /// Returns the multiplier for a raw domain field.
    pub fn multiplier(&self, field: &str) -> f64 {
        let host = extract_host(field);
        match self.matching_rule(&host) {
            Some(domain) => {
                tracing::trace!(host = %host, pattern = %domain.pattern(), weight = domain.weight, "domain rule matched");
                domain.weight
            }
            None => self.default_weight,
        }
    }
}
