//! Slug derivation and matching helpers.
//!
//! Slugs are a pure function of an entity's display name and are recomputed
//! on every read; they are never persisted as the source of truth for
//! listings. Matching helpers here are pure so the resolver's fallback rules
//! can be tested without a database.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Everything that is not a word character, whitespace, or hyphen
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, strips non-word characters, and collapses whitespace runs to
/// single hyphens. Idempotent: applying it to an already slug-shaped string
/// is a no-op.
pub fn generate_slug(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    WHITESPACE_RUN
        .replace_all(stripped.trim(), "-")
        .into_owned()
}

/// True when a path segment should be treated as a primary-key lookup.
pub fn is_numeric_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Split a segment on hyphens and keep tokens long enough to be meaningful.
///
/// Tokens of length <= 2 ("a", "of", "io") match almost everything and only
/// add noise to the fuzzy fallback.
pub fn significant_tokens(segment: &str) -> Vec<&str> {
    segment.split('-').filter(|t| t.len() > 2).collect()
}

/// Score a candidate name by how many tokens appear as substrings of it.
pub fn score_name(name: &str, tokens: &[&str]) -> usize {
    let lowered = name.to_lowercase();
    tokens.iter().filter(|t| lowered.contains(**t)).count()
}

/// Decide whether a resolved listing should redirect to its canonical URL.
///
/// Close variants (the input is a substring of the canonical slug, or
/// contains it) keep their URL so trivial differences do not bounce through
/// redirects. Anything else redirects to avoid duplicate-content pages.
pub fn needs_canonical_redirect(input: &str, canonical: &str) -> bool {
    let input = input.to_lowercase();
    if input == canonical {
        return false;
    }
    !(canonical.contains(&input) || input.contains(canonical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug_basic() {
        assert_eq!(generate_slug("My Cool Server"), "my-cool-server");
        assert_eq!(generate_slug("  Spaced   Out  "), "spaced-out");
    }

    #[test]
    fn test_generate_slug_strips_punctuation() {
        assert_eq!(generate_slug("Foo! Bar? (v2)"), "foo-bar-v2");
        assert_eq!(generate_slug("C++ Client"), "c-client");
    }

    #[test]
    fn test_generate_slug_idempotent() {
        let once = generate_slug("Anthropic's Reference Server");
        let twice = generate_slug(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_is_numeric_segment() {
        assert!(is_numeric_segment("42"));
        assert!(!is_numeric_segment("42-tools"));
        assert!(!is_numeric_segment(""));
        assert!(!is_numeric_segment("4.2"));
    }

    #[test]
    fn test_significant_tokens_drops_short() {
        assert_eq!(
            significant_tokens("my-db-query-tool"),
            vec!["query", "tool"]
        );
        assert!(significant_tokens("a-io-of").is_empty());
    }

    #[test]
    fn test_score_name_counts_substring_hits() {
        let tokens = vec!["query", "tool"];
        assert_eq!(score_name("Query Toolkit", &tokens), 2);
        assert_eq!(score_name("Query Service", &tokens), 1);
        assert_eq!(score_name("Unrelated", &tokens), 0);
    }

    #[test]
    fn test_redirect_skipped_for_close_variants() {
        assert!(!needs_canonical_redirect("my-server", "my-server"));
        // Input is a substring of the canonical slug
        assert!(!needs_canonical_redirect("my-serv", "my-server"));
        // Input contains the canonical slug
        assert!(!needs_canonical_redirect("the-my-server", "my-server"));
    }

    #[test]
    fn test_redirect_for_significantly_different_input() {
        assert!(needs_canonical_redirect("totally-else", "my-server"));
        assert!(needs_canonical_redirect("123", "my-server"));
    }
}
