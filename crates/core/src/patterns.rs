//! Named, anchored pattern library.
//!
//! An immutable table of compiled regular expressions usable as `type`
//! names in a field rule. Every pattern is fully anchored, so a match means
//! the whole value conforms, not a substring. Lookup of an unregistered
//! name is a normal outcome, not an error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Pattern sources, compiled once into [`lookup`]'s table.
///
/// `multibyte` is a contains-check (at least one non-ASCII character); it is
/// written with explicit `.*` arms so the anchored contract still holds.
const PATTERN_SOURCES: &[(&str, &str)] = &[
    ("alpha", r"^[a-zA-Z]+$"),
    ("alpha_numeric", r"^[a-zA-Z0-9]+$"),
    ("alpha_unicode", r"^\p{L}+$"),
    ("alpha_unicode_numeric", r"^[\p{L}\p{N}]+$"),
    ("numeric", r"^[-+]?[0-9]+(?:\.[0-9]+)?$"),
    ("number", r"^[0-9]+$"),
    ("hexadecimal", r"^(0[xX])?[0-9a-fA-F]+$"),
    (
        "hex_color",
        r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$",
    ),
    (
        "rgb",
        r"^rgb\(\s*(?:(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])\s*,\s*(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])\s*,\s*(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])|(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])%\s*,\s*(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])%\s*,\s*(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])%)\s*\)$",
    ),
    (
        "rgba",
        r"^rgba\(\s*(?:(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])\s*,\s*(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])\s*,\s*(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])|(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])%\s*,\s*(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])%\s*,\s*(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])%)\s*,\s*(?:(?:0\.[1-9]*)|[01])\s*\)$",
    ),
    (
        "hsl",
        r"^hsl\(\s*(?:0|[1-9]\d?|[12]\d\d|3[0-5]\d|360)\s*,\s*(?:(?:0|[1-9]\d?|100)%)\s*,\s*(?:(?:0|[1-9]\d?|100)%)\s*\)$",
    ),
    (
        "hsla",
        r"^hsla\(\s*(?:0|[1-9]\d?|[12]\d\d|3[0-5]\d|360)\s*,\s*(?:(?:0|[1-9]\d?|100)%)\s*,\s*(?:(?:0|[1-9]\d?|100)%)\s*,\s*(?:(?:0\.[1-9]*)|[01])\s*\)$",
    ),
    (
        "email",
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$",
    ),
    ("e164", r"^\+[1-9]?[0-9]{7,14}$"),
    (
        "base32",
        r"^(?:[A-Z2-7]{8})*(?:[A-Z2-7]{2}={6}|[A-Z2-7]{4}={4}|[A-Z2-7]{5}={3}|[A-Z2-7]{7}=|[A-Z2-7]{8})$",
    ),
    (
        "base64",
        r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})$",
    ),
    (
        "base64url",
        r"^(?:[A-Za-z0-9_-]{4})*(?:[A-Za-z0-9_-]{2}==|[A-Za-z0-9_-]{3}=|[A-Za-z0-9_-]{4})$",
    ),
    ("base64rawurl", r"^(?:[A-Za-z0-9_-]{4})*(?:[A-Za-z0-9_-]{2,4})$"),
    ("isbn10", r"^(?:[0-9]{9}X|[0-9]{10})$"),
    ("isbn13", r"^(?:(?:97(?:8|9))[0-9]{10})$"),
    ("issn", r"^(?:[0-9]{4}-[0-9]{3}[0-9X])$"),
    (
        "uuid3",
        r"^[0-9a-f]{8}-[0-9a-f]{4}-3[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$",
    ),
    (
        "uuid4",
        r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    ),
    (
        "uuid5",
        r"^[0-9a-f]{8}-[0-9a-f]{4}-5[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    ),
    (
        "uuid",
        r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
    ),
    ("ulid", r"(?i)^[A-HJKMNP-TV-Z0-9]{26}$"),
    ("md4", r"^[0-9a-f]{32}$"),
    ("md5", r"^[0-9a-f]{32}$"),
    ("sha256", r"^[0-9a-f]{64}$"),
    ("sha384", r"^[0-9a-f]{96}$"),
    ("sha512", r"^[0-9a-f]{128}$"),
    ("ripemd128", r"^[0-9a-f]{32}$"),
    ("ripemd160", r"^[0-9a-f]{40}$"),
    ("tiger128", r"^[0-9a-f]{32}$"),
    ("tiger160", r"^[0-9a-f]{40}$"),
    ("tiger192", r"^[0-9a-f]{48}$"),
    ("ascii", r"^[\x00-\x7F]*$"),
    ("printable_ascii", r"^[\x20-\x7E]*$"),
    ("multibyte", r"(?s)^.*[^\x00-\x7F].*$"),
    ("data_uri", r"^data:((?:\w+/(?:([^;]|;[^;]).)+)?)$"),
    ("latitude", r"^[-+]?([1-8]?\d(\.\d+)?|90(\.0+)?)$"),
    (
        "longitude",
        r"^[-+]?(180(\.0+)?|((1[0-7]\d)|([1-9]?\d))(\.\d+)?)$",
    ),
    ("ssn", r"^[0-9]{3}[ -]?(0[1-9]|[1-9][0-9])[ -]?([1-9][0-9]{3})$"),
    (
        "ipv4",
        r"^(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}$",
    ),
    ("ipv6", r"^(([0-9a-fA-F]{1,4}:){7}([0-9a-fA-F]{1,4}|:))$"),
    ("mac", r"^([0-9a-fA-F]{2}[:-]){5}[0-9a-fA-F]{2}$"),
    ("cidr", r"^(\d{1,3}\.){3}\d{1,3}/\d{1,2}$"),
    ("cidrv6", r"^[0-9a-fA-F]{0,4}:((:[0-9a-fA-F]{0,4}){0,5})?::?/\d{1,3}$"),
    ("pan", r"^[A-Z]{5}[0-9]{4}[A-Z]{1}$"),
];

/// Compiled pattern table. Compiled once, reused forever.
static PATTERNS: LazyLock<BTreeMap<&'static str, Regex>> = LazyLock::new(|| {
    PATTERN_SOURCES
        .iter()
        .map(|(name, source)| (*name, Regex::new(source).expect("valid pattern source")))
        .collect()
});

/// Look up a registered pattern by name.
pub fn lookup(name: &str) -> Option<&'static Regex> {
    PATTERNS.get(name)
}

/// All registered pattern names, in sorted order.
pub fn names() -> impl Iterator<Item = &'static str> {
    PATTERNS.keys().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_name() {
        assert!(lookup("uuid4").is_some());
        assert!(lookup("ipv4").is_some());
        assert!(lookup("sha256").is_some());
    }

    #[test]
    fn lookup_unknown_name_is_none() {
        assert!(lookup("uuid9").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn every_source_compiles() {
        assert_eq!(names().count(), PATTERN_SOURCES.len());
    }

    #[test]
    fn uuid4_matches() {
        let re = lookup("uuid4").unwrap();
        assert!(re.is_match("9f8b1c2d-3e4f-4a5b-8c6d-7e8f9a0b1c2d"));
        // Wrong version nibble.
        assert!(!re.is_match("9f8b1c2d-3e4f-3a5b-8c6d-7e8f9a0b1c2d"));
    }

    #[test]
    fn ipv4_matches() {
        let re = lookup("ipv4").unwrap();
        assert!(re.is_match("192.168.0.1"));
        assert!(re.is_match("0.0.0.0"));
        assert!(!re.is_match("256.1.1.1"));
        assert!(!re.is_match("1.2.3"));
    }

    #[test]
    fn patterns_are_anchored() {
        // A match must cover the whole input, not a substring.
        let re = lookup("number").unwrap();
        assert!(re.is_match("12345"));
        assert!(!re.is_match("a12345"));
        assert!(!re.is_match("12345b"));
    }

    #[test]
    fn hex_color_matches() {
        let re = lookup("hex_color").unwrap();
        assert!(re.is_match("#fff"));
        assert!(re.is_match("#A1B2C3"));
        assert!(!re.is_match("fff"));
        assert!(!re.is_match("#ggg"));
    }

    #[test]
    fn base64url_matches() {
        let re = lookup("base64url").unwrap();
        assert!(re.is_match("aGVsbG8td29ybGQ="));
        assert!(!re.is_match("aGVsbG8+d29ybGQ="));
    }

    #[test]
    fn multibyte_is_a_contains_check() {
        let re = lookup("multibyte").unwrap();
        assert!(re.is_match("abcé"));
        assert!(re.is_match("é"));
        assert!(!re.is_match("ascii only"));
    }

    #[test]
    fn ulid_is_case_insensitive() {
        let re = lookup("ulid").unwrap();
        assert!(re.is_match("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
        assert!(re.is_match("01arz3ndektsv4rrffq69g5fav"));
    }
}
