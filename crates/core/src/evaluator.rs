//! Rule engine — fixed-order, per-field evaluation.
//!
//! Fields are processed sequentially in schema declaration order: the
//! `confirmed` rule reads a sibling value from the same input snapshot,
//! and the error-map order is part of the contract. The only suspension
//! point is the awaited custom check; there is no timeout, so a check
//! that never completes stalls the call.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::SchemaError;
use crate::messages::{self, Overrides};
use crate::patterns;
use crate::predicates::{date_in_range, digit_count, is_email, is_iso_date};
use crate::rules::{FieldRule, RuleKind, ValidationResult};
use crate::schema::{normalize_schema, Schema};

/// Suffix joined to a field name for the `confirmed` rule's sibling lookup
/// and for its synthetic error key.
pub const CONFIRMATION_SUFFIX: &str = "_confirmation";

/// Evaluate a record against a schema.
///
/// Structural configuration mistakes (non-object data, numeric field
/// names, malformed rules) return `Err` before any field is inspected.
/// Rule violations are never errors: they accumulate in the returned
/// [`ValidationResult`]. Neither `data` nor `schema` is mutated, so both
/// can be reused across calls.
pub async fn evaluate(
    data: &Value,
    schema: &Schema,
    overrides: Option<&Overrides>,
) -> Result<ValidationResult, SchemaError> {
    let Value::Object(record) = data else {
        return Err(SchemaError::DataNotObject);
    };
    for key in record.keys() {
        if is_numeric_name(key) {
            return Err(SchemaError::NumericFieldName(key.clone()));
        }
    }
    let fields = normalize_schema(schema)?;
    debug!(fields = fields.len(), "evaluating record");

    let mut errors: IndexMap<String, Vec<String>> = IndexMap::new();
    for (name, rule) in &fields {
        let outcome = check_field(record, name, rule, overrides).await;
        if !outcome.own.is_empty() {
            trace!(field = %name, violations = outcome.own.len(), "field failed");
            errors
                .entry(name.clone())
                .or_default()
                .extend(outcome.own);
        }
        if let Some(message) = outcome.confirmation {
            errors
                .entry(format!("{name}{CONFIRMATION_SUFFIX}"))
                .or_default()
                .push(message);
        }
    }

    let result = ValidationResult::new(errors);
    debug!(passed = result.passed(), "evaluation complete");
    Ok(result)
}

/// Messages produced for one field: its own list, plus the `confirmed`
/// message that lands under the synthetic sibling key.
#[derive(Default)]
struct FieldOutcome {
    own: Vec<String>,
    confirmation: Option<String>,
}

async fn check_field(
    record: &serde_json::Map<String, Value>,
    name: &str,
    rule: &FieldRule,
    overrides: Option<&Overrides>,
) -> FieldOutcome {
    let mut outcome = FieldOutcome::default();
    let value = record.get(name);

    // Required gate: the one hard short-circuit. Absent or empty-string
    // values record exactly one message and skip every other rule.
    let absent = value.is_none();
    let empty = matches!(value, Some(Value::String(s)) if s.is_empty());
    if rule.required && (absent || empty) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::Required,
            messages::REQUIRED,
            &[],
        ));
        return outcome;
    }
    // Absent and not required: nothing runs.
    let Some(value) = value else {
        return outcome;
    };

    // From here on, checks are independent: each appends its own message
    // and none suppresses another.
    if let Some(template) = check_type(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::Type,
            template,
            &[("type", rule.type_name.clone())],
        ));
    }
    if let Some(min) = check_min(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::Min,
            messages::MIN,
            &[("min", fmt_number(min))],
        ));
    }
    if let Some(max) = check_max(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::Max,
            messages::MAX,
            &[("max", fmt_number(max))],
        ));
    }
    if let Some(bound) = check_before(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::Before,
            messages::BEFORE,
            &[("before", bound.to_string())],
        ));
    }
    if let Some(bound) = check_after(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::After,
            messages::AFTER,
            &[("after", bound.to_string())],
        ));
    }
    if let Some(digits) = check_digits(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::Digits,
            messages::DIGITS,
            &[("digit", digits.to_string())],
        ));
    }
    if let Some(allowed) = check_in(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::In,
            messages::IN,
            &[("value", allowed)],
        ));
    }
    if let Some(disallowed) = check_not_in(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::NotIn,
            messages::NOT_IN,
            &[("value", disallowed)],
        ));
    }
    if let Some((lo, hi)) = check_between(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::Between,
            messages::BETWEEN,
            &[("min", fmt_number(lo)), ("max", fmt_number(hi))],
        ));
    }
    if let Some((lo, hi)) = check_date_between(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::DateBetween,
            messages::DATE_BETWEEN,
            &[("min", lo.to_string()), ("max", hi.to_string())],
        ));
    }
    if let Some((lo, hi)) = check_digits_between(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::DigitsBetween,
            messages::DIGITS_BETWEEN,
            &[("min", lo.to_string()), ("max", hi.to_string())],
        ));
    }
    if check_regex(rule, value) {
        outcome.own.push(message(
            overrides,
            name,
            RuleKind::Regex,
            messages::REGEX,
            &[],
        ));
    }
    if let Some(custom) = &rule.custom {
        if let Err(failure) = custom.run(value.clone()).await {
            let text = match overrides.and_then(|o| o.lookup(name, RuleKind::Custom)) {
                Some(template) => messages::render(template, name, &[]),
                None => failure,
            };
            outcome.own.push(text);
        }
    }
    if rule.confirmed {
        let sibling = record.get(&format!("{name}{CONFIRMATION_SUFFIX}"));
        if sibling != Some(value) {
            outcome.confirmation = Some(message(
                overrides,
                name,
                RuleKind::Confirmed,
                messages::CONFIRMED,
                &[],
            ));
        }
    }

    outcome
}

/// Whether a field name reads as a number (`"12"`, `"1.5"`, `"1e5"`).
/// Word-ish spellings that `f64` would otherwise accept (`"inf"`, `"NaN"`)
/// are names, not numbers.
fn is_numeric_name(key: &str) -> bool {
    key.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && key.parse::<f64>().is_ok()
}

fn message(
    overrides: Option<&Overrides>,
    field: &str,
    kind: RuleKind,
    default: &str,
    params: &[(&str, String)],
) -> String {
    let template = overrides
        .and_then(|o| o.lookup(field, kind))
        .unwrap_or(default);
    messages::render(template, field, params)
}

// ---------------------------------------------------------------------------
// Per-kind checks. Each returns `Some(params)` on violation, `None` when
// the rule passes or does not apply to this value.
// ---------------------------------------------------------------------------

fn check_type(rule: &FieldRule, value: &Value) -> Option<&'static str> {
    match rule.type_name.as_str() {
        "string" => (!value.is_string()).then_some(messages::DATA_TYPE),
        "number" => (!value.is_number()).then_some(messages::DATA_TYPE),
        "object" => (!value.is_object()).then_some(messages::DATA_TYPE),
        "array" => (!value.is_array()).then_some(messages::DATA_TYPE),
        "email" => {
            let ok = value.as_str().is_some_and(is_email);
            (!ok).then_some(messages::TYPE)
        }
        "date" => {
            let ok = value.as_str().is_some_and(is_iso_date);
            (!ok).then_some(messages::TYPE)
        }
        // Not a primitive kind: consult the pattern library. A name that
        // matches neither is tolerated — no type error at all.
        name => match patterns::lookup(name) {
            Some(pattern) => (!pattern.is_match(&stringify(value))).then_some(messages::TYPE),
            None => None,
        },
    }
}

fn check_min(rule: &FieldRule, value: &Value) -> Option<f64> {
    let min = rule.min?;
    let len = value_len(value)?;
    ((len as f64) < min).then_some(min)
}

fn check_max(rule: &FieldRule, value: &Value) -> Option<f64> {
    let max = rule.max?;
    let len = value_len(value)?;
    ((len as f64) > max).then_some(max)
}

fn check_before<'r>(rule: &'r FieldRule, value: &Value) -> Option<&'r str> {
    let bound = rule.before.as_deref()?;
    let date = value.as_str().filter(|s| is_iso_date(s))?;
    (!date_in_range(date, None, Some(bound))).then_some(bound)
}

fn check_after<'r>(rule: &'r FieldRule, value: &Value) -> Option<&'r str> {
    let bound = rule.after.as_deref()?;
    let date = value.as_str().filter(|s| is_iso_date(s))?;
    (!date_in_range(date, Some(bound), None)).then_some(bound)
}

fn check_digits(rule: &FieldRule, value: &Value) -> Option<u64> {
    let digits = rule.digits?;
    let count = digit_count(value)?;
    (count as u64 != digits).then_some(digits)
}

fn check_in(rule: &FieldRule, value: &Value) -> Option<String> {
    let allowed = rule.in_values.as_ref()?;
    (!allowed.contains(value)).then(|| join_values(allowed))
}

fn check_not_in(rule: &FieldRule, value: &Value) -> Option<String> {
    let disallowed = rule.not_in.as_ref()?;
    disallowed.contains(value).then(|| join_values(disallowed))
}

fn check_between(rule: &FieldRule, value: &Value) -> Option<(f64, f64)> {
    let (lo, hi) = rule.between?;
    let number = value_as_f64(value)?;
    (number < lo || number > hi).then_some((lo, hi))
}

fn check_date_between<'r>(rule: &'r FieldRule, value: &Value) -> Option<(&'r str, &'r str)> {
    let (lo, hi) = rule.date_between.as_ref()?;
    let date = value.as_str().filter(|s| is_iso_date(s))?;
    (!date_in_range(date, Some(lo), Some(hi))).then_some((lo.as_str(), hi.as_str()))
}

fn check_digits_between(rule: &FieldRule, value: &Value) -> Option<(u64, u64)> {
    let (lo, hi) = rule.digits_between?;
    let count = digit_count(value)? as u64;
    (count < lo || count > hi).then_some((lo, hi))
}

fn check_regex(rule: &FieldRule, value: &Value) -> bool {
    match &rule.regex {
        Some(pattern) => !pattern.is_match(&stringify(value)),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

/// Length of a value for `min`/`max`: string byte length or array element
/// count. Values without a length skip those rules.
fn value_len(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.len()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Numeric view of a value for `between`: numbers directly, numeric
/// strings by parsing. Anything else skips the rule.
fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Stringified view for regex and pattern-type matching: strings verbatim,
/// everything else via its JSON rendering.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render an f64 the way it was authored: integral values without a
/// trailing `.0`.
fn fmt_number(number: f64) -> String {
    number.to_string()
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(stringify)
        .collect::<Vec<_>>()
        .join(", ")
}
