//! Schema container and normalization.
//!
//! A schema is an ordered mapping from field name to a rule spec — either a
//! structured [`Rule`] or a compact string like `"required|type:string|min:8"`.
//! Normalization expands every spec into a canonical [`FieldRule`] in a
//! private copy; a caller's schema is never mutated, so the same schema can
//! be reused across concurrent evaluation calls.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Number, Value};

use crate::error::SchemaError;
use crate::rules::{FieldRule, Rule, RuleKind};

/// One field's rule spec: structured or compact-string form.
#[derive(Debug, Clone)]
pub enum FieldSpec {
    Rule(Rule),
    Compact(String),
}

impl From<Rule> for FieldSpec {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

impl From<&str> for FieldSpec {
    fn from(text: &str) -> Self {
        Self::Compact(text.to_string())
    }
}

impl From<String> for FieldSpec {
    fn from(text: String) -> Self {
        Self::Compact(text)
    }
}

/// Ordered field-name → rule-spec mapping.
///
/// Declaration order is the evaluation order and the error-map order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Re-declaring a name replaces its spec in place.
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> Self {
        self.fields.insert(name.into(), spec.into());
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Build a schema from a JSON object whose values are compact strings
    /// or structured rule objects.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let Value::Object(map) = value else {
            return Err(SchemaError::SchemaNotObject);
        };
        let mut schema = Schema::new();
        for (field, spec) in map {
            let spec = match spec {
                Value::String(text) => FieldSpec::Compact(text.clone()),
                Value::Object(_) => {
                    let rule: Rule = serde_json::from_value(spec.clone()).map_err(|err| {
                        SchemaError::InvalidFieldSpec {
                            field: field.clone(),
                            reason: err.to_string(),
                        }
                    })?;
                    FieldSpec::Rule(rule)
                }
                other => {
                    return Err(SchemaError::InvalidFieldSpec {
                        field: field.clone(),
                        reason: format!("expected string or object, got {other}"),
                    });
                }
            };
            schema = schema.field(field.clone(), spec);
        }
        Ok(schema)
    }
}

/// Expand a whole schema into canonical records, fail-fast.
pub(crate) fn normalize_schema(schema: &Schema) -> Result<Vec<(String, FieldRule)>, SchemaError> {
    schema
        .iter()
        .map(|(name, spec)| normalize_field(name, spec).map(|rule| (name.to_string(), rule)))
        .collect()
}

/// Expand one field spec into its canonical record.
pub fn normalize_field(field: &str, spec: &FieldSpec) -> Result<FieldRule, SchemaError> {
    let rule = match spec {
        FieldSpec::Rule(rule) => rule.clone(),
        FieldSpec::Compact(text) => parse_compact(field, text)?,
    };
    canonicalize(field, rule)
}

fn canonicalize(field: &str, rule: Rule) -> Result<FieldRule, SchemaError> {
    let type_name = match rule.type_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return Err(SchemaError::MissingType {
                field: field.to_string(),
            });
        }
    };
    let regex = match rule.regex {
        Some(source) => Some(Regex::new(&source).map_err(|source| SchemaError::InvalidRegex {
            field: field.to_string(),
            source,
        })?),
        None => None,
    };
    Ok(FieldRule {
        required: rule.required.unwrap_or(false),
        type_name,
        min: rule.min,
        max: rule.max,
        before: rule.before,
        after: rule.after,
        digits: rule.digits,
        in_values: rule.in_values,
        not_in: rule.not_in,
        between: pair(field, RuleKind::Between, rule.between)?,
        date_between: pair(field, RuleKind::DateBetween, rule.date_between)?,
        digits_between: pair(field, RuleKind::DigitsBetween, rule.digits_between)?,
        regex,
        custom: rule.custom,
        confirmed: rule.confirmed.unwrap_or(false),
        extra: rule.extra,
    })
}

fn pair<T: Clone>(
    field: &str,
    kind: RuleKind,
    values: Option<Vec<T>>,
) -> Result<Option<(T, T)>, SchemaError> {
    match values {
        None => Ok(None),
        Some(values) if values.len() == 2 => Ok(Some((values[0].clone(), values[1].clone()))),
        Some(values) => Err(SchemaError::InvalidPairLength {
            field: field.to_string(),
            kind,
            len: values.len(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Compact string grammar
// ---------------------------------------------------------------------------

/// Parse `"required|type:string|min:8"` into a raw [`Rule`].
///
/// Rules are `|`-separated, each `key` or `key:value`, split at the first
/// `:`. A `regex` rule keeps everything after the first `:` verbatim
/// (colons included); a pattern containing `|` is outside this grammar and
/// must use the structured form.
fn parse_compact(field: &str, text: &str) -> Result<Rule, SchemaError> {
    let mut rule = Rule::default();
    for part in text.split('|') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once(':') {
            Some((key, value)) => apply_rule(field, &mut rule, key.trim(), Some(value))?,
            None => apply_rule(field, &mut rule, part, None)?,
        }
    }
    Ok(rule)
}

fn apply_rule(
    field: &str,
    rule: &mut Rule,
    key: &str,
    raw: Option<&str>,
) -> Result<(), SchemaError> {
    // A bare regex value is taken as raw pattern text, before any decoding.
    if key == "regex" {
        let Some(raw) = raw else {
            return Err(invalid(field, key, "missing pattern text"));
        };
        rule.regex = Some(raw.to_string());
        return Ok(());
    }
    let value = decode_value(raw);
    match key {
        "required" => rule.required = Some(expect_bool(field, key, &value)?),
        "type" => rule.type_name = Some(expect_string(field, key, &value)?),
        "min" => rule.min = Some(expect_number(field, key, &value)?),
        "max" => rule.max = Some(expect_number(field, key, &value)?),
        "before" => rule.before = Some(expect_string(field, key, &value)?),
        "after" => rule.after = Some(expect_string(field, key, &value)?),
        "digits" => rule.digits = Some(expect_integer(field, key, &value)?),
        "in" => rule.in_values = Some(expect_array(field, key, value)?),
        "notIn" => rule.not_in = Some(expect_array(field, key, value)?),
        "between" => {
            let items = expect_array(field, key, value)?;
            rule.between = Some(numbers(field, key, items)?);
        }
        "dateBetween" => {
            let items = expect_array(field, key, value)?;
            rule.date_between = Some(strings(field, key, items)?);
        }
        "digitsBetween" => {
            let items = expect_array(field, key, value)?;
            rule.digits_between = Some(integers(field, key, items)?);
        }
        "confirmed" => rule.confirmed = Some(expect_bool(field, key, &value)?),
        // Unknown keys pass through and are never consulted.
        _ => {
            rule.extra.insert(key.to_string(), value);
        }
    }
    Ok(())
}

/// Decode a compact rule value. Precedence: no value → `true`; full numeric
/// parse → number; bracket-delimited → array literal; `true`/`false` →
/// boolean; otherwise the literal string.
fn decode_value(raw: Option<&str>) -> Value {
    let Some(raw) = raw else {
        return Value::Bool(true);
    };
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        if let Some(number) = Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        return decode_array(trimmed);
    }
    match trimmed {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(trimmed.to_string()),
    }
}

/// Decode a bracket-delimited array literal: JSON if it parses, otherwise a
/// comma-split with per-element number/bool/string decoding.
fn decode_array(text: &str) -> Value {
    if let Ok(value @ Value::Array(_)) = serde_json::from_str::<Value>(text) {
        return value;
    }
    let inner = &text[1..text.len() - 1];
    let items = inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| decode_value(Some(item)))
        .collect();
    Value::Array(items)
}

fn invalid(field: &str, key: &str, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidRuleValue {
        field: field.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn expect_bool(field: &str, key: &str, value: &Value) -> Result<bool, SchemaError> {
    value
        .as_bool()
        .ok_or_else(|| invalid(field, key, format!("expected boolean, got {value}")))
}

fn expect_string(field: &str, key: &str, value: &Value) -> Result<String, SchemaError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => Err(invalid(field, key, format!("expected string, got {other}"))),
    }
}

fn expect_number(field: &str, key: &str, value: &Value) -> Result<f64, SchemaError> {
    value
        .as_f64()
        .ok_or_else(|| invalid(field, key, format!("expected number, got {value}")))
}

fn expect_integer(field: &str, key: &str, value: &Value) -> Result<u64, SchemaError> {
    value
        .as_u64()
        .ok_or_else(|| invalid(field, key, format!("expected integer, got {value}")))
}

fn expect_array(field: &str, key: &str, value: Value) -> Result<Vec<Value>, SchemaError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(invalid(field, key, format!("expected array, got {other}"))),
    }
}

fn numbers(field: &str, key: &str, items: Vec<Value>) -> Result<Vec<f64>, SchemaError> {
    items
        .iter()
        .map(|item| expect_number(field, key, item))
        .collect()
}

fn strings(field: &str, key: &str, items: Vec<Value>) -> Result<Vec<String>, SchemaError> {
    items
        .iter()
        .map(|item| expect_string(field, key, item))
        .collect()
}

fn integers(field: &str, key: &str, items: Vec<Value>) -> Result<Vec<u64>, SchemaError> {
    items
        .iter()
        .map(|item| expect_integer(field, key, item))
        .collect()
}
