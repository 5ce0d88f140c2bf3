//! Slug generation from article titles.

use regex::Regex;
use std::sync::OnceLock;

/// Slugs that would be shadowed by a fixed route and so could never be viewed.
pub const RESERVED_SLUGS: &[&str] = &[
    "create", "edit", "preview", "portfolio", "about", "contact", "healthz",
];

static NON_WORD: OnceLock<Regex> = OnceLock::new();

fn non_word_runs() -> &'static Regex {
    NON_WORD.get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{Nd}_]+").unwrap())
}

/// Convert a title to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Every run of characters other than letters, digits and underscore
///   becomes a single hyphen
/// - Leading/trailing hyphens are trimmed
///
/// # Examples
///
/// ```
/// use folio_core::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("snake_case stays"), "snake_case-stays");
/// assert_eq!(slugify("C++ & Rust"), "c-rust");
/// ```
pub fn slugify(title: &str) -> String {
    let lowercased = title.to_lowercase();
    let hyphenated = non_word_runs().replace_all(&lowercased, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Whether `slug` collides with one of the site's fixed routes.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_slug_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '-'
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("What's new?"), "what-s-new");
        assert_eq!(slugify("Node.js -- tips & tricks"), "node-js-tips-tricks");
    }

    #[test]
    fn test_underscores_are_word_characters() {
        assert_eq!(slugify("rust_lang basics"), "rust_lang-basics");
        assert_eq!(slugify("__init__"), "__init__");
    }

    #[test]
    fn test_unicode_letters_kept() {
        assert_eq!(slugify("Café Crème"), "café-crème");
        assert_eq!(slugify("Ünïcödé 2024"), "ünïcödé-2024");
    }

    #[test]
    fn test_degenerate_titles() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_case_insensitive_and_charset() {
        let titles = [
            "Hello, World!",
            "MiXeD CaSe Title",
            "Tabs\tand\nnewlines",
            "Ärger über Öl",
            "100% (Really) Done...",
            "a--b__c  d",
        ];

        for title in titles {
            let slug = slugify(title);
            assert_eq!(slug, slugify(&title.to_lowercase()), "title: {title}");
            assert!(slug.chars().all(is_slug_char), "slug: {slug}");
            assert!(!slug.contains("--"), "slug: {slug}");
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(slugify("Same Title"), slugify("Same Title"));
    }

    #[test]
    fn test_reserved() {
        assert!(is_reserved(&slugify("About")));
        assert!(is_reserved("create"));
        assert!(is_reserved("preview"));
        assert!(!is_reserved("about-me"));
    }
}
