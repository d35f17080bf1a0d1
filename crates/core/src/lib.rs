//! Declarative, schema-driven record validation.
//!
//! Given a JSON record and a per-field rule set, [`evaluate`] decides
//! whether the record is acceptable and, if not, reports a deterministic,
//! per-field list of violation messages. Schemas are authored as structured
//! [`Rule`]s, as compact strings (`"required|type:string|min:8"`), or from
//! JSON via [`Schema::from_value`]; messages are customizable per field or
//! for all fields at once through [`Overrides`].
//!
//! Rule violations accumulate as values in a [`ValidationResult`];
//! schema-authoring mistakes surface as [`SchemaError`] before any field is
//! inspected. The two never mix.
//!
//! ```
//! use serde_json::json;
//! use verdict_core::{evaluate, Rule, Schema};
//!
//! # async fn demo() -> Result<(), verdict_core::SchemaError> {
//! let schema = Schema::new()
//!     .field(
//!         "foo",
//!         Rule {
//!             required: Some(true),
//!             type_name: Some("number".to_string()),
//!             digits: Some(4),
//!             ..Rule::default()
//!         },
//!     )
//!     .field("bar", "required|type:string|min:8");
//!
//! let result = evaluate(&json!({ "foo": 1234, "bar": "correct horse" }), &schema, None).await?;
//! assert!(result.passed());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod evaluator;
pub mod messages;
pub mod patterns;
pub mod predicates;
pub mod rules;
pub mod schema;

pub use error::SchemaError;
pub use evaluator::{evaluate, CONFIRMATION_SUFFIX};
pub use messages::Overrides;
pub use rules::{CustomCheck, FieldRule, Rule, RuleKind, ValidationResult};
pub use schema::{FieldSpec, Schema};
