//! Primitive semantic checks used by the rule engine.
//!
//! Small, pure helpers: email syntax, ISO calendar-date syntax, digit
//! counting, and inclusive/exclusive date-range comparison.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Primitive kind names recognized by the `type` rule.
pub const PRIMITIVE_KINDS: &[&str] = &["string", "number", "object", "array", "email", "date"];

/// Whether `name` is one of the recognized primitive kind names.
pub fn is_primitive_kind(name: &str) -> bool {
    PRIMITIVE_KINDS.contains(&name)
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Syntactic email check: local-part `@` domain with at least one
/// dot-segment. Not a full RFC validator.
pub fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Strict `YYYY-MM-DD` syntax check with month in 1..=12 and day in 1..=31.
///
/// The day is not checked against the specific month or leap years, so a
/// syntactically plausible date like `2021-02-30` passes.
pub fn is_iso_date(s: &str) -> bool {
    parse_iso_date(s).is_some()
}

/// Parse `YYYY-MM-DD` into a `(year, month, day)` tuple, with the same
/// calendar laxness as [`is_iso_date`]. Tuple ordering matches
/// chronological ordering for this fixed, zero-padded format.
pub(crate) fn parse_iso_date(s: &str) -> Option<(u16, u8, u8)> {
    if !ISO_DATE_RE.is_match(s) {
        return None;
    }
    let year: u16 = s[0..4].parse().ok()?;
    let month: u8 = s[5..7].parse().ok()?;
    let day: u8 = s[8..10].parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some((year, month, day))
}

/// Count digit characters in a value's rendering.
///
/// Numbers count the digits of the absolute value's decimal form; strings
/// count digit characters after stripping everything else. Other values
/// have no digit count and return `None`.
pub fn digit_count(value: &Value) -> Option<usize> {
    let rendered = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.unsigned_abs().to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64()?.abs().to_string()
            }
        }
        Value::String(s) => s.clone(),
        _ => return None,
    };
    Some(rendered.chars().filter(|c| c.is_ascii_digit()).count())
}

/// Date-range comparison over `YYYY-MM-DD` strings.
///
/// With both bounds, true iff `min <= value <= max` (inclusive both ends);
/// with only `min`, true iff `value > min` (exclusive); with only `max`,
/// true iff `value < max` (exclusive); with neither, false. A bound that is
/// supplied but unparseable makes the whole comparison false.
pub fn date_in_range(value: &str, min: Option<&str>, max: Option<&str>) -> bool {
    let Some(value) = parse_iso_date(value) else {
        return false;
    };
    let lo = match min {
        Some(s) => match parse_iso_date(s) {
            Some(d) => Some(d),
            None => return false,
        },
        None => None,
    };
    let hi = match max {
        Some(s) => match parse_iso_date(s) {
            Some(d) => Some(d),
            None => return false,
        },
        None => None,
    };
    match (lo, hi) {
        (Some(lo), Some(hi)) => lo <= value && value <= hi,
        (Some(lo), None) => value > lo,
        (None, Some(hi)) => value < hi,
        (None, None) => false,
    }
}
