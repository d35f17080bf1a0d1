//! Structural configuration errors.
//!
//! These indicate schema-authoring mistakes, not input defects. They abort
//! an evaluation call before any field is inspected and never appear inside
//! a [`ValidationResult`](crate::rules::ValidationResult).

use crate::rules::RuleKind;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Validation data must be an object")]
    DataNotObject,

    #[error("Schema must be an object")]
    SchemaNotObject,

    #[error("Data field name must not be numeric: {0:?}")]
    NumericFieldName(String),

    #[error("Field {field:?} has no type")]
    MissingType { field: String },

    #[error("Field {field:?}: {kind} must have exactly 2 elements, got {len}")]
    InvalidPairLength {
        field: String,
        kind: RuleKind,
        len: usize,
    },

    #[error("Field {field:?}: invalid value for {key:?}: {reason}")]
    InvalidRuleValue {
        field: String,
        key: String,
        reason: String,
    },

    #[error("Field {field:?}: invalid rule spec: {reason}")]
    InvalidFieldSpec { field: String, reason: String },

    #[error("Field {field:?}: invalid regex pattern: {source}")]
    InvalidRegex {
        field: String,
        #[source]
        source: regex::Error,
    },
}
