//! Configuration validation.
//!
//! [`validate`] checks a JSON configuration against a [`Schema`]; the
//! remaining functions are the attribute validators resources attach to
//! their configuration.
//!
//! # Example
//!
//! ```
//! use terraform_provider_pingdirectory::schema::{Attribute, Schema};
//! use terraform_provider_pingdirectory::validation::{
//!     implies_other_attribute_one_of_string, validate,
//! };
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("type", Attribute::required_string())
//!     .with_attribute("db_directory", Attribute::optional_string());
//!
//! let config = json!({"type": "alarm", "db_directory": "db"});
//! assert!(validate(&schema, &config).is_empty());
//!
//! let diagnostics =
//!     implies_other_attribute_one_of_string(&config, "db_directory", "type", &["local-db"]);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].summary, "Invalid Attribute Combination");
//! ```

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::schema::{Attribute, AttributeType, Diagnostic, Schema};
use crate::types::is_unknown;

/// Validate a JSON value against a schema.
///
/// Returns an empty list when the value is valid.
///
/// - Required attributes must be present and non-null.
/// - Computed-only attributes are not validated.
/// - Values must match the attribute type; the unknown sentinel matches any type.
/// - Attributes the schema does not declare are rejected.
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return diagnostics,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(value))),
            );
            return diagnostics;
        },
    };

    for (name, attr) in &schema.block.attributes {
        validate_attribute(attr, obj.get(name), name, &mut diagnostics);
    }

    for name in obj.keys() {
        if !schema.block.attributes.contains_key(name) {
            diagnostics.push(
                Diagnostic::error(format!("Unsupported attribute '{}'", name))
                    .with_detail("An attribute with this name is not expected here")
                    .with_attribute(name.as_str()),
            );
        }
    }

    diagnostics
}

/// Check that a string attribute, when set, is one of `allowed`.
pub fn one_of_string(config: &Value, attribute: &str, allowed: &[&str]) -> Vec<Diagnostic> {
    match config.get(attribute).and_then(Value::as_str) {
        Some(value) if !is_unknown_str(value) && !allowed.contains(&value) => {
            vec![Diagnostic::error("Invalid Attribute Value Match")
                .with_detail(format!(
                    "Attribute {} value must be one of: {}, got: \"{}\"",
                    attribute,
                    quoted_list(allowed),
                    value
                ))
                .with_attribute(attribute)]
        },
        _ => Vec::new(),
    }
}

/// Check that when `attribute` is set, `other` is one of `allowed`.
///
/// Used to restrict type-specific attributes to the object types that
/// define them. Nothing is reported while either value is unknown.
pub fn implies_other_attribute_one_of_string(
    config: &Value,
    attribute: &str,
    other: &str,
    allowed: &[&str],
) -> Vec<Diagnostic> {
    let is_set = match config.get(attribute) {
        None | Some(Value::Null) => false,
        Some(v) => !is_unknown(v),
    };
    if !is_set {
        return Vec::new();
    }

    match config.get(other) {
        Some(v) if is_unknown(v) => Vec::new(),
        Some(Value::String(value)) if allowed.contains(&value.as_str()) => Vec::new(),
        found => {
            let found = match found {
                Some(Value::String(s)) => format!("\"{}\"", s),
                _ => "null".to_string(),
            };
            vec![Diagnostic::error("Invalid Attribute Combination")
                .with_detail(format!(
                    "Attribute {} can only be set when {} is one of: {}. Found: {}",
                    attribute,
                    other,
                    quoted_list(allowed),
                    found
                ))
                .with_attribute(attribute)]
        },
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) => validate_attribute_type(&attr.attr_type, v, path, diagnostics),
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if is_unknown(value) {
        return;
    }

    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Int64 => {
            if !is_int64(value) {
                diagnostics.push(type_error(path, "int64", value));
            }
        },
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        },
        AttributeType::Set(element_type) => match value.as_array() {
            Some(items) => {
                validate_elements(element_type, items, path, diagnostics);
                let mut seen = HashSet::new();
                for item in items {
                    if !seen.insert(item.to_string()) {
                        diagnostics.push(
                            Diagnostic::error(format!("Duplicate set element in '{}'", path))
                                .with_detail(format!(
                                    "This value is listed more than once: {}",
                                    item
                                ))
                                .with_attribute(path),
                        );
                    }
                }
            },
            None => diagnostics.push(type_error(path, "set", value)),
        },
        AttributeType::Object(attrs) => match value.as_object() {
            Some(obj) => validate_object_type(attrs, obj, path, diagnostics),
            None => diagnostics.push(type_error(path, "object", value)),
        },
    }
}

fn validate_elements(
    element_type: &AttributeType,
    items: &[Value],
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}.{}", path, i);
        validate_attribute_type(element_type, item, &item_path, diagnostics);
    }
}

fn validate_object_type(
    attrs: &BTreeMap<String, AttributeType>,
    obj: &serde_json::Map<String, Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Object fields carry no required/optional flags, so presence is not enforced.
    for (name, attr_type) in attrs {
        if let Some(value) = obj.get(name) {
            let attr_path = format!("{}.{}", path, name);
            validate_attribute_type(attr_type, value, &attr_path, diagnostics);
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_int64(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64()
                || n.as_f64().is_some_and(|f| {
                    f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64
                })
        },
        _ => false,
    }
}

fn is_unknown_str(value: &str) -> bool {
    value == crate::types::UNKNOWN_VALUE
}

fn quoted_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    let detail = format!("Expected {}, got {}", expected, value_type_name(got));
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(detail)
        .with_attribute(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeFlags;
    use crate::types::UNKNOWN_VALUE;
    use serde_json::json;

    fn backend_schema() -> Schema {
        Schema::v0()
            .with_attribute("backend_id", Attribute::required_string())
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("enabled", Attribute::optional_bool())
            .with_attribute(
                "index_entry_limit",
                Attribute::new(AttributeType::Int64, AttributeFlags::optional_computed()),
            )
            .with_attribute("base_dn", Attribute::optional_string_set())
    }

    #[test]
    fn test_validate_required_attribute() {
        let schema = backend_schema();

        assert!(validate(&schema, &json!({"backend_id": "userRoot"})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("backend_id".to_string()));

        let diagnostics = validate(&schema, &json!({"backend_id": null}));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_validate_types() {
        let schema = backend_schema();

        let diagnostics = validate(
            &schema,
            &json!({
                "backend_id": 7,
                "enabled": "true",
                "index_entry_limit": 4000.5,
                "base_dn": "dc=example,dc=com"
            }),
        );
        assert_eq!(diagnostics.len(), 4);

        assert!(validate(
            &schema,
            &json!({"backend_id": "userRoot", "index_entry_limit": 4000.0})
        )
        .is_empty());
    }

    #[test]
    fn test_validate_accepts_unknown_values() {
        let schema = backend_schema();
        let diagnostics = validate(
            &schema,
            &json!({
                "backend_id": UNKNOWN_VALUE,
                "enabled": UNKNOWN_VALUE,
                "index_entry_limit": UNKNOWN_VALUE,
                "base_dn": ["dc=example,dc=com", UNKNOWN_VALUE]
            }),
        );
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn test_validate_computed_attribute_skipped() {
        let schema = backend_schema();
        assert!(validate(&schema, &json!({"backend_id": "userRoot", "id": 123})).is_empty());
    }

    #[test]
    fn test_validate_set_duplicates() {
        let schema = backend_schema();
        let diagnostics = validate(
            &schema,
            &json!({"backend_id": "userRoot", "base_dn": ["dc=a", "dc=b", "dc=a"]}),
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Duplicate"));
    }

    #[test]
    fn test_validate_unsupported_attribute() {
        let schema = backend_schema();
        let diagnostics = validate(&schema, &json!({"backend_id": "userRoot", "bogus": 1}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("bogus".to_string()));
    }

    #[test]
    fn test_validate_object_elements() {
        let schema = Schema::v0().with_attribute(
            "required_actions",
            Attribute::new(
                AttributeType::set(AttributeType::object([
                    ("property", AttributeType::String),
                    ("type", AttributeType::String),
                ])),
                AttributeFlags::optional(),
            ),
        );

        assert!(validate(
            &schema,
            &json!({"required_actions": [{"property": "enabled", "type": "restart"}]})
        )
        .is_empty());

        let diagnostics = validate(&schema, &json!({"required_actions": [{"property": 1}]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("required_actions.0.property".to_string())
        );
    }

    #[test]
    fn test_validate_root_not_object() {
        let diagnostics = validate(&backend_schema(), &json!("userRoot"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Expected object"));
        assert!(validate(&backend_schema(), &Value::Null).is_empty());
    }

    #[test]
    fn test_one_of_string() {
        let allowed = ["enabled", "disabled", "internal-only"];
        let config = json!({"writability_mode": "enabled"});
        assert!(one_of_string(&config, "writability_mode", &allowed).is_empty());

        let config = json!({"writability_mode": "read-only"});
        let diagnostics = one_of_string(&config, "writability_mode", &allowed);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("\"internal-only\""));

        assert!(one_of_string(&json!({}), "writability_mode", &allowed).is_empty());
        assert!(one_of_string(
            &json!({"writability_mode": UNKNOWN_VALUE}),
            "writability_mode",
            &allowed
        )
        .is_empty());
    }

    #[test]
    fn test_implies_other_attribute_one_of_string() {
        let allowed = ["local-db"];

        let config = json!({"type": "local-db", "db_directory": "db"});
        assert!(
            implies_other_attribute_one_of_string(&config, "db_directory", "type", &allowed)
                .is_empty()
        );

        let config = json!({"type": "alarm", "db_directory": "db"});
        let diagnostics =
            implies_other_attribute_one_of_string(&config, "db_directory", "type", &allowed);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Invalid Attribute Combination");
        assert_eq!(diagnostics[0].attribute, Some("db_directory".to_string()));
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("Found: \"alarm\""));

        // Not set: nothing to check.
        let config = json!({"type": "alarm", "db_directory": null});
        assert!(
            implies_other_attribute_one_of_string(&config, "db_directory", "type", &allowed)
                .is_empty()
        );

        // Unknown type: decided at apply.
        let config = json!({"type": UNKNOWN_VALUE, "db_directory": "db"});
        assert!(
            implies_other_attribute_one_of_string(&config, "db_directory", "type", &allowed)
                .is_empty()
        );

        // Missing type is reported as null.
        let config = json!({"db_directory": "db"});
        let diagnostics =
            implies_other_attribute_one_of_string(&config, "db_directory", "type", &allowed);
        assert!(diagnostics[0].detail.as_deref().unwrap().contains("null"));
    }
}
