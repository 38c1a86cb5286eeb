//! Argument schemas for prompts and JSON Schema compilation for tools.
//!
//! Prompt arguments are described by a small static [`ArgumentSchema`]
//! (field name, kind, required flag, default, allowed values). Tool input
//! schemas are plain JSON Schema documents compiled with `jsonschema`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use jsonschema::{validator_for, Validator};
use serde_json::Value;

use crate::protocol::PromptArgument;

/// A schema that cannot be used. Always a programming error, never caller input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(&'static str),
    #[error("default for field `{field}` is not a {kind}")]
    DefaultKindMismatch { field: &'static str, kind: FieldKind },
    #[error("default for field `{0}` is not one of its allowed values")]
    DefaultNotAllowed(&'static str),
    #[error("field `{0}` restricts values but is not a string")]
    ChoicesOnNonString(&'static str),
    #[error("name `{0}` is registered more than once")]
    DuplicateName(String),
    #[error("JSON Schema compile error: {0}")]
    Compile(String),
}

/// Primitive kind of an argument value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A constant default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Str(&'static str),
    Int(i64),
}

impl Literal {
    fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (Self::Str(_), FieldKind::String)
                | (Self::Int(_), FieldKind::Integer | FieldKind::Number)
        )
    }

    fn to_value(self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.to_string()),
            Self::Int(n) => Value::from(n),
        }
    }
}

/// One declared argument.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<Literal>,
    pub choices: &'static [&'static str],
}

impl FieldSpec {
    /// A required string field.
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::String,
            required: true,
            default: None,
            choices: &[],
        }
    }

    pub const fn of_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub const fn with_default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn one_of(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    /// Whether a caller must supply this field. A default makes it optional.
    pub fn is_required(&self) -> bool {
        self.required && self.default.is_none()
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("missing required argument `{field}`")]
    Missing { field: String },
    #[error("argument `{field}` must be one of [{}], got `{value}`", .allowed.join(", "))]
    NotInEnumeration {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
    #[error("argument `{field}` must be a {expected}, got {found}")]
    WrongType {
        field: String,
        expected: FieldKind,
        found: &'static str,
    },
    #[error("arguments must be an object, got {found}")]
    NotAnObject { found: &'static str },
}

/// Every violation found in one validation pass, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Arguments that passed validation, with defaults applied and unknown keys dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(BTreeMap<String, Value>);

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String value of a field, if present.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

}

/// Static description of a prompt's arguments.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentSchema {
    fields: &'static [FieldSpec],
}

impl ArgumentSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// Reject schemas that could never validate consistently.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut seen = BTreeSet::new();
        for field in self.fields {
            if !seen.insert(field.name) {
                return Err(SchemaError::DuplicateField(field.name));
            }
            if !field.choices.is_empty() && field.kind != FieldKind::String {
                return Err(SchemaError::ChoicesOnNonString(field.name));
            }
            if let Some(default) = field.default {
                if !default.fits(field.kind) {
                    return Err(SchemaError::DefaultKindMismatch {
                        field: field.name,
                        kind: field.kind,
                    });
                }
                if let Literal::Str(s) = default {
                    if !field.choices.is_empty() && !field.choices.contains(&s) {
                        return Err(SchemaError::DefaultNotAllowed(field.name));
                    }
                }
            }
        }
        Ok(())
    }

    /// Validate and normalize raw caller arguments.
    ///
    /// A missing or `null` argument object is treated as `{}`. `null` field
    /// values count as absent. Strings are accepted for integer, number and
    /// boolean fields when they parse, since MCP prompt arguments arrive as
    /// strings.
    pub fn validate(&self, raw: Option<&Value>) -> Result<Arguments, ValidationError> {
        let empty = serde_json::Map::new();
        let object = match raw {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(ValidationError {
                    violations: vec![Violation::NotAnObject {
                        found: type_name(other),
                    }],
                })
            }
        };

        let mut normalized = BTreeMap::new();
        let mut violations = Vec::new();

        for field in self.fields {
            let supplied = object.get(field.name).filter(|v| !v.is_null());
            let Some(value) = supplied else {
                if let Some(default) = field.default {
                    normalized.insert(field.name.to_string(), default.to_value());
                } else if field.required {
                    violations.push(Violation::Missing {
                        field: field.name.to_string(),
                    });
                }
                continue;
            };

            match coerce(field, value) {
                Ok(value) => {
                    normalized.insert(field.name.to_string(), value);
                }
                Err(violation) => violations.push(violation),
            }
        }

        if violations.is_empty() {
            Ok(Arguments(normalized))
        } else {
            Err(ValidationError { violations })
        }
    }

    /// Argument metadata advertised by `prompts/list`.
    pub fn arguments(&self) -> Vec<PromptArgument> {
        self.fields
            .iter()
            .map(|field| PromptArgument {
                name: field.name.to_string(),
                description: Some(field.description.to_string()),
                required: field.is_required(),
            })
            .collect()
    }
}

fn coerce(field: &FieldSpec, value: &Value) -> Result<Value, Violation> {
    let wrong_type = || Violation::WrongType {
        field: field.name.to_string(),
        expected: field.kind,
        found: type_name(value),
    };

    match field.kind {
        FieldKind::String => {
            let s = value.as_str().ok_or_else(wrong_type)?;
            if !field.choices.is_empty() && !field.choices.contains(&s) {
                return Err(Violation::NotInEnumeration {
                    field: field.name.to_string(),
                    value: s.to_string(),
                    allowed: field.choices.iter().map(|c| c.to_string()).collect(),
                });
            }
            Ok(value.clone())
        }
        FieldKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| wrong_type()),
            _ => Err(wrong_type()),
        },
        FieldKind::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(wrong_type),
            _ => Err(wrong_type()),
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(wrong_type()),
        },
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Compile a tool input schema (JSON Schema, draft auto-detected).
pub fn compile_json_schema(schema: &Value) -> Result<Validator, SchemaError> {
    validator_for(schema).map_err(|e| SchemaError::Compile(e.to_string()))
}

/// Human-readable violations of `instance` against a compiled schema.
/// Empty when the instance is valid.
pub fn json_violations(validator: &Validator, instance: &Value) -> Vec<String> {
    validator.iter_errors(instance).map(|e| e.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NETWORKS: &[&str] = &["bnb", "ethereum", "solana"];

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::string("address", "Wallet address"),
        FieldSpec::string("network", "Network id")
            .one_of(NETWORKS)
            .with_default(Literal::Str("bnb")),
        FieldSpec::string("memo", "Free text").optional(),
        FieldSpec::string("slippage", "Max slippage")
            .of_kind(FieldKind::Number)
            .optional(),
    ];

    const SCHEMA: ArgumentSchema = ArgumentSchema::new(FIELDS);

    #[test]
    fn applies_defaults_and_drops_unknown_keys() {
        let args = SCHEMA
            .validate(Some(&json!({"address": "0xABC", "extra": 1})))
            .unwrap();
        assert_eq!(args.str("address"), Some("0xABC"));
        assert_eq!(args.str("network"), Some("bnb"));
        assert!(args.get("extra").is_none());
        assert!(args.get("memo").is_none());
    }

    #[test]
    fn reports_every_violation() {
        let err = SCHEMA
            .validate(Some(&json!({"network": "polygon", "memo": 7})))
            .unwrap_err();
        assert_eq!(err.violations.len(), 3);
        assert_eq!(
            err.violations[0],
            Violation::Missing {
                field: "address".into()
            }
        );
        assert!(matches!(
            err.violations[1],
            Violation::NotInEnumeration { ref value, .. } if value == "polygon"
        ));
        assert!(matches!(
            err.violations[2],
            Violation::WrongType { expected: FieldKind::String, found: "number", .. }
        ));
    }

    #[test]
    fn null_counts_as_absent() {
        let err = SCHEMA
            .validate(Some(&json!({"address": null})))
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required argument `address`");
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let args = SCHEMA
            .validate(Some(&json!({"address": "a", "slippage": "0.5"})))
            .unwrap();
        assert_eq!(args.get("slippage"), Some(&json!(0.5)));

        let err = SCHEMA
            .validate(Some(&json!({"address": "a", "slippage": "lots"})))
            .unwrap_err();
        assert!(err.to_string().contains("must be a number, got string"));
    }

    #[test]
    fn integer_and_boolean_strings_are_coerced() {
        const TYPED: ArgumentSchema = ArgumentSchema::new(&[
            FieldSpec::string("count", "How many").of_kind(FieldKind::Integer),
            FieldSpec::string("dry_run", "Simulate only").of_kind(FieldKind::Boolean),
        ]);

        let args = TYPED
            .validate(Some(&json!({"count": "3", "dry_run": "true"})))
            .unwrap();
        assert_eq!(args.get("count"), Some(&json!(3)));
        assert_eq!(args.get("dry_run"), Some(&json!(true)));

        let err = TYPED
            .validate(Some(&json!({"count": "three", "dry_run": "yes"})))
            .unwrap_err();
        assert_eq!(
            err.violations,
            vec![
                Violation::WrongType {
                    field: "count".into(),
                    expected: FieldKind::Integer,
                    found: "string",
                },
                Violation::WrongType {
                    field: "dry_run".into(),
                    expected: FieldKind::Boolean,
                    found: "string",
                },
            ]
        );
    }

    #[test]
    fn non_object_arguments_rejected() {
        let err = SCHEMA.validate(Some(&json!(["0xABC"]))).unwrap_err();
        assert_eq!(err.violations, vec![Violation::NotAnObject { found: "array" }]);
    }

    #[test]
    fn reflection_derives_required_flags() {
        let args = SCHEMA.arguments();
        let flags: Vec<(&str, bool)> = args.iter().map(|a| (a.name.as_str(), a.required)).collect();
        assert_eq!(
            flags,
            vec![
                ("address", true),
                ("network", false),
                ("memo", false),
                ("slippage", false)
            ]
        );
    }

    #[test]
    fn malformed_schemas_fail_check() {
        const DUP: &[FieldSpec] = &[FieldSpec::string("a", ""), FieldSpec::string("a", "")];
        assert_eq!(
            ArgumentSchema::new(DUP).check(),
            Err(SchemaError::DuplicateField("a"))
        );

        const BAD_DEFAULT: &[FieldSpec] =
            &[FieldSpec::string("n", "").one_of(NETWORKS).with_default(Literal::Str("tron"))];
        assert_eq!(
            ArgumentSchema::new(BAD_DEFAULT).check(),
            Err(SchemaError::DefaultNotAllowed("n"))
        );

        const BAD_KIND: &[FieldSpec] = &[FieldSpec::string("n", "")
            .of_kind(FieldKind::Boolean)
            .with_default(Literal::Int(1))];
        assert!(matches!(
            ArgumentSchema::new(BAD_KIND).check(),
            Err(SchemaError::DefaultKindMismatch { field: "n", .. })
        ));

        assert!(SCHEMA.check().is_ok());
    }

    #[test]
    fn json_schema_reports_missing_property() {
        let validator = compile_json_schema(&json!({
            "type": "object",
            "required": ["network"],
            "properties": { "network": { "type": "string" } }
        }))
        .unwrap();
        assert!(json_violations(&validator, &json!({"network": "bnb"})).is_empty());
        let violations = json_violations(&validator, &json!({}));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("network"));
    }

    #[test]
    fn malformed_json_schema_is_a_compile_error() {
        let err = compile_json_schema(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaError::Compile(_)));
    }
}
