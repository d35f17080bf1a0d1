//! Validation rule and result types.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rule kind attached to a field.
///
/// `as_str()` matches the compact-grammar key names, as does the serde
/// representation (used as override map keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    Type,
    Min,
    Max,
    Before,
    After,
    Digits,
    In,
    NotIn,
    Between,
    DateBetween,
    DigitsBetween,
    Regex,
    Custom,
    Confirmed,
}

impl RuleKind {
    /// Stable string representation matching serde's `rename_all = "camelCase"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Type => "type",
            Self::Min => "min",
            Self::Max => "max",
            Self::Before => "before",
            Self::After => "after",
            Self::Digits => "digits",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Between => "between",
            Self::DateBetween => "dateBetween",
            Self::DigitsBetween => "digitsBetween",
            Self::Regex => "regex",
            Self::Custom => "custom",
            Self::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An asynchronous caller-supplied check.
///
/// The check receives the field value and either completes, or fails with a
/// message that becomes the field's violation text (unless an override for
/// [`RuleKind::Custom`] is supplied). There is no timeout: a check that
/// never completes stalls the evaluation call.
#[derive(Clone)]
pub struct CustomCheck(Arc<dyn Fn(Value) -> BoxFuture<'static, Result<(), String>> + Send + Sync>);

impl CustomCheck {
    pub fn new<F, Fut>(check: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        Self(Arc::new(move |value| Box::pin(check(value))))
    }

    pub(crate) fn run(&self, value: Value) -> BoxFuture<'static, Result<(), String>> {
        (self.0)(value)
    }

    fn same_check(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCheck(..)")
    }
}

/// A raw, caller-authored rule set for one field.
///
/// Everything is optional at this stage; normalization turns a `Rule` into a
/// canonical [`FieldRule`] and reports structural mistakes (a missing
/// `type`, pair rules without exactly 2 elements, an unparseable `regex`).
/// Deserializes from JSON under the same key names as the compact string
/// grammar. Unknown keys collect into `extra` and are never consulted by
/// the engine — documented laxness, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub required: Option<bool>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub digits: Option<u64>,
    #[serde(rename = "in")]
    pub in_values: Option<Vec<Value>>,
    #[serde(rename = "notIn")]
    pub not_in: Option<Vec<Value>>,
    pub between: Option<Vec<f64>>,
    #[serde(rename = "dateBetween")]
    pub date_between: Option<Vec<String>>,
    #[serde(rename = "digitsBetween")]
    pub digits_between: Option<Vec<u64>>,
    /// Raw pattern text; compiled during normalization into a private copy.
    pub regex: Option<String>,
    #[serde(skip)]
    pub custom: Option<CustomCheck>,
    pub confirmed: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Rule {
    /// Attach an asynchronous custom check to this rule.
    pub fn custom<F, Fut>(mut self, check: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        self.custom = Some(CustomCheck::new(check));
        self
    }
}

/// The canonical, immutable rule record for one field.
///
/// Produced by schema normalization; the engine only ever evaluates this
/// form. `type_name` is always non-empty.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub required: bool,
    pub type_name: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub digits: Option<u64>,
    pub in_values: Option<Vec<Value>>,
    pub not_in: Option<Vec<Value>>,
    pub between: Option<(f64, f64)>,
    pub date_between: Option<(String, String)>,
    pub digits_between: Option<(u64, u64)>,
    pub regex: Option<Regex>,
    pub custom: Option<CustomCheck>,
    pub confirmed: bool,
    /// Unknown keys carried through from the raw rule; never consulted.
    pub extra: BTreeMap<String, Value>,
}

impl PartialEq for FieldRule {
    fn eq(&self, other: &Self) -> bool {
        let regex_eq = match (&self.regex, &other.regex) {
            (Some(a), Some(b)) => a.as_str() == b.as_str(),
            (None, None) => true,
            _ => false,
        };
        let custom_eq = match (&self.custom, &other.custom) {
            (Some(a), Some(b)) => a.same_check(b),
            (None, None) => true,
            _ => false,
        };
        self.required == other.required
            && self.type_name == other.type_name
            && self.min == other.min
            && self.max == other.max
            && self.before == other.before
            && self.after == other.after
            && self.digits == other.digits
            && self.in_values == other.in_values
            && self.not_in == other.not_in
            && self.between == other.between
            && self.date_between == other.date_between
            && self.digits_between == other.digits_between
            && regex_eq
            && custom_eq
            && self.extra == other.extra
    }
}

impl From<&FieldRule> for Rule {
    /// Back-convert a canonical record into raw form. Normalizing the
    /// result yields an equal [`FieldRule`].
    fn from(rule: &FieldRule) -> Self {
        Rule {
            required: Some(rule.required),
            type_name: Some(rule.type_name.clone()),
            min: rule.min,
            max: rule.max,
            before: rule.before.clone(),
            after: rule.after.clone(),
            digits: rule.digits,
            in_values: rule.in_values.clone(),
            not_in: rule.not_in.clone(),
            between: rule.between.map(|(lo, hi)| vec![lo, hi]),
            date_between: rule
                .date_between
                .clone()
                .map(|(lo, hi)| vec![lo, hi]),
            digits_between: rule.digits_between.map(|(lo, hi)| vec![lo, hi]),
            regex: rule.regex.as_ref().map(|re| re.as_str().to_string()),
            custom: rule.custom.clone(),
            confirmed: Some(rule.confirmed),
            extra: rule.extra.clone(),
        }
    }
}

/// Immutable outcome of one evaluation call.
///
/// The error map is keyed by field name in field-processing order; a
/// `confirmed` failure lands under the synthetic `"<field>_confirmation"`
/// key. `passed()` is true iff the map is empty.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    passed: bool,
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationResult {
    pub(crate) fn new(errors: IndexMap<String, Vec<String>>) -> Self {
        Self {
            passed: errors.is_empty(),
            errors,
        }
    }

    /// Whether the record satisfied every rule.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Field name → ordered violation messages.
    pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_kind_strings() {
        assert_eq!(RuleKind::Required.as_str(), "required");
        assert_eq!(RuleKind::NotIn.as_str(), "notIn");
        assert_eq!(RuleKind::DateBetween.as_str(), "dateBetween");
        assert_eq!(RuleKind::DigitsBetween.as_str(), "digitsBetween");
    }

    #[test]
    fn rule_kind_serde_matches_as_str() {
        for kind in [
            RuleKind::Required,
            RuleKind::Type,
            RuleKind::NotIn,
            RuleKind::DateBetween,
            RuleKind::Confirmed,
        ] {
            let text = serde_json::to_value(kind).unwrap();
            assert_eq!(text, json!(kind.as_str()));
        }
    }

    #[test]
    fn rule_deserializes_from_json() {
        let rule: Rule = serde_json::from_value(json!({
            "required": true,
            "type": "string",
            "min": 8,
            "notIn": ["Foo", "Bar"],
            "digitsBetween": [2, 4],
        }))
        .unwrap();
        assert_eq!(rule.required, Some(true));
        assert_eq!(rule.type_name.as_deref(), Some("string"));
        assert_eq!(rule.min, Some(8.0));
        assert_eq!(rule.not_in, Some(vec![json!("Foo"), json!("Bar")]));
        assert_eq!(rule.digits_between, Some(vec![2, 4]));
    }

    #[test]
    fn rule_keeps_unknown_keys_in_extra() {
        let rule: Rule = serde_json::from_value(json!({
            "type": "string",
            "frobnicate": 7,
        }))
        .unwrap();
        assert_eq!(rule.extra.get("frobnicate"), Some(&json!(7)));
    }

    #[test]
    fn result_invariant_holds() {
        let passed = ValidationResult::new(IndexMap::new());
        assert!(passed.passed());
        assert!(passed.errors().is_empty());

        let mut errors = IndexMap::new();
        errors.insert("foo".to_string(), vec!["The foo is required".to_string()]);
        let failed = ValidationResult::new(errors);
        assert!(!failed.passed());
        assert_eq!(failed.errors().len(), 1);
    }

    #[test]
    fn result_serializes_errors_in_order() {
        let mut errors = IndexMap::new();
        errors.insert("zulu".to_string(), vec!["a".to_string()]);
        errors.insert("alpha".to_string(), vec!["b".to_string()]);
        let text = serde_json::to_string(&ValidationResult::new(errors)).unwrap();
        let zulu = text.find("zulu").unwrap();
        let alpha = text.find("alpha").unwrap();
        assert!(zulu < alpha, "insertion order must survive serialization");
    }
}
