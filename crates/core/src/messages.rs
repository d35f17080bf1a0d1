//! Default violation message templates and caller-supplied overrides.
//!
//! Every rule kind has one default template built from `:attribute` plus
//! named placeholders. Overrides resolve per (field, rule kind): exact
//! field, then the `"*"` wildcard, then the default. No placeholder name
//! is a prefix of another, so sequential replacement is order-independent.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::rules::RuleKind;

/// Override key applying to every field without an exact entry.
pub const WILDCARD_FIELD: &str = "*";

// ---------------------------------------------------------------------------
// Default templates
// ---------------------------------------------------------------------------

pub const REQUIRED: &str = "The :attribute is required";
/// Type mismatch for the primitive kinds (string/number/object/array).
pub const DATA_TYPE: &str = "The :attribute must be :type";
/// Type mismatch for semantic kinds (email/date) and pattern names.
pub const TYPE: &str = "The :attribute must be valid :type";
pub const MIN: &str = "The :attribute must be minimum :min characters";
pub const MAX: &str = "The :attribute must be maximum :max characters";
pub const BEFORE: &str = "The :attribute must be before :before";
pub const AFTER: &str = "The :attribute must be after :after";
pub const DIGITS: &str = "The :attribute must have :digit digits";
pub const IN: &str = "The :attribute must be included in [:value]";
pub const NOT_IN: &str = "The :attribute must not be included in [:value]";
pub const BETWEEN: &str = "The :attribute must be between :min - :max";
pub const DATE_BETWEEN: &str = "The :attribute must be between :min - :max";
pub const DIGITS_BETWEEN: &str = "The :attribute must be between :min - :max digits";
pub const REGEX: &str = "The :attribute does not match the required pattern";
pub const CONFIRMED: &str = "The :attribute confirmation does not match";

/// Substitute `:attribute` and each named placeholder into a template.
pub(crate) fn render(template: &str, attribute: &str, params: &[(&str, String)]) -> String {
    let mut message = template.replace(":attribute", attribute);
    for (name, value) in params {
        message = message.replace(&format!(":{name}"), value);
    }
    message
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// Caller-supplied message templates, two levels deep: field name (or the
/// [`WILDCARD_FIELD`] key) → rule kind → template.
///
/// Deserializes from JSON of the shape
/// `{"password": {"required": "..."}, "*": {"min": "..."}}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Overrides {
    templates: BTreeMap<String, BTreeMap<RuleKind, String>>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a template for one (field, rule kind).
    pub fn field(
        mut self,
        field: impl Into<String>,
        kind: RuleKind,
        template: impl Into<String>,
    ) -> Self {
        self.templates
            .entry(field.into())
            .or_default()
            .insert(kind, template.into());
        self
    }

    /// Set a wildcard template for a rule kind, used by every field that
    /// lacks an exact override for that kind.
    pub fn any(self, kind: RuleKind, template: impl Into<String>) -> Self {
        self.field(WILDCARD_FIELD, kind, template)
    }

    /// Resolve an override for (field, kind): exact field first, then the
    /// wildcard entry. `None` means the default template applies.
    pub(crate) fn lookup(&self, field: &str, kind: RuleKind) -> Option<&str> {
        self.templates
            .get(field)
            .and_then(|by_kind| by_kind.get(&kind))
            .or_else(|| {
                self.templates
                    .get(WILDCARD_FIELD)
                    .and_then(|by_kind| by_kind.get(&kind))
            })
            .map(String::as_str)
    }
}
