//! Company name normalization for cross-filer identity matching.
//!
//! Matching is deliberately conservative: two names merge only when they
//! reduce to the same normalized string. No similarity scoring is done.

use regex::Regex;
use std::sync::LazyLock;

static TRAILING_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("static regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

static FOOTNOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s*\(\d+(,\s*\d+)*\))+\s*$").expect("static regex"));

// Applied in this order, each at most once per pass.
static LEGAL_SUFFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r",?\s+inc\.?$",
        r",?\s+llc\.?$",
        r",?\s+l\.?l\.?c\.?$",
        r",?\s+lp\.?$",
        r",?\s+l\.?p\.?$",
        r",?\s+corp\.?$",
        r",?\s+corporation$",
        r",?\s+company$",
        r",?\s+co\.?$",
        r",?\s+ltd\.?$",
        r",?\s+limited$",
        r",?\s+holdings?$",
        r",?\s+intermediate$",
        r",?\s+parent$",
        r",?\s+bidco$",
        r",?\s+topco$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

fn normalize_pass(name: &str) -> String {
    let mut normalized = TRAILING_PAREN.replace(name, "").into_owned();
    for suffix in LEGAL_SUFFIXES.iter() {
        normalized = suffix.replace(&normalized, "").into_owned();
    }
    WHITESPACE.replace_all(&normalized, " ").trim().to_string()
}

/// Normalizes a company name to its identity key.
///
/// Lower-cases, strips a trailing parenthetical note, strips legal-entity
/// suffixes in a fixed order and collapses whitespace. Passes repeat until
/// the name stops changing, so the result is a fixed point:
///
/// ```
/// use bdc_core::normalize_company_name;
///
/// assert_eq!(normalize_company_name("Acme Holdings, LLC (4)"), "acme");
/// assert_eq!(normalize_company_name("Acme Corp"), "acme");
/// ```
#[must_use]
pub fn normalize_company_name(name: &str) -> String {
    let mut current = name.trim().to_lowercase();
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Cleans a disclosed company name for display.
///
/// Collapses whitespace and drops trailing numeric footnote markers such as
/// `(1)` or `(2, 3)`. Case and legal suffixes are preserved.
#[must_use]
pub fn clean_company_name(name: &str) -> String {
    let collapsed = WHITESPACE.replace_all(name.trim(), " ");
    FOOTNOTE_MARKER.replace(&collapsed, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_suffixes_and_notes() {
        assert_eq!(normalize_company_name("Acme Holdings, LLC (4)"), "acme");
        assert_eq!(normalize_company_name("acme holdings llc"), "acme");
        assert_eq!(normalize_company_name("Acme Inc"), "acme");
        assert_eq!(normalize_company_name("Acme Corp"), "acme");
        assert_eq!(normalize_company_name("Gamma Co"), "gamma");
        assert_eq!(normalize_company_name("Beta L.L.C."), "beta");
        assert_eq!(normalize_company_name("  Delta   Software,  Inc. (Delaware) "), "delta software");
    }

    #[test]
    fn test_normalize_keeps_distinct_companies_apart() {
        assert_ne!(
            normalize_company_name("Acme Software Inc"),
            normalize_company_name("Acme Services Inc")
        );
        assert_eq!(normalize_company_name("Inc"), "inc");
        assert_eq!(normalize_company_name(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in [
            "Acme Holdings, LLC (4)",
            "Topco Parent Holdings Inc",
            "Bidco Intermediate LLC Inc",
            "Foo (bar) (baz)",
            "ABC Co. Ltd.",
            "x",
        ] {
            let once = normalize_company_name(name);
            assert_eq!(normalize_company_name(&once), once, "input: {name}");
        }
    }

    #[test]
    fn test_clean_company_name() {
        assert_eq!(clean_company_name("Acme  Holdings, LLC (4)(5)"), "Acme Holdings, LLC");
        assert_eq!(clean_company_name("Beta Inc (2, 3)"), "Beta Inc");
        assert_eq!(clean_company_name("Gamma (Delaware)"), "Gamma (Delaware)");
    }
}
