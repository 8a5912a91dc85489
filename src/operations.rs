//! Diffing planned values against state into PATCH operations.
//!
//! Every helper follows the same rules:
//! - an unknown planned value produces nothing;
//! - a null planned value over a non-null state value removes the property;
//! - a changed scalar is replaced;
//! - a changed set adds the values only in the plan and removes the values
//!   only in the state.

use std::collections::BTreeSet;

use tracing::debug;

use crate::client::{Operation, OperationKind};
use crate::error::ProviderError;
use crate::model::{AttrSpec, AttrValue, ObjectModel, Usage};

pub fn add_string_operation_if_necessary(
    operations: &mut Vec<Operation>,
    plan: &AttrValue,
    state: &AttrValue,
    path: &str,
) {
    add_scalar_operation_if_necessary(operations, plan, state, path);
}

pub fn add_bool_operation_if_necessary(
    operations: &mut Vec<Operation>,
    plan: &AttrValue,
    state: &AttrValue,
    path: &str,
) {
    add_scalar_operation_if_necessary(operations, plan, state, path);
}

pub fn add_int64_operation_if_necessary(
    operations: &mut Vec<Operation>,
    plan: &AttrValue,
    state: &AttrValue,
    path: &str,
) {
    add_scalar_operation_if_necessary(operations, plan, state, path);
}

fn add_scalar_operation_if_necessary(
    operations: &mut Vec<Operation>,
    plan: &AttrValue,
    state: &AttrValue,
    path: &str,
) {
    if plan.is_unknown() || plan == state {
        return;
    }
    if plan.is_null() {
        if state.is_known() {
            operations.push(Operation::remove(path));
        }
        return;
    }
    if let Some(value) = plan.operation_value() {
        operations.push(Operation::replace(path, value));
    }
}

pub fn add_string_set_operations_if_necessary(
    operations: &mut Vec<Operation>,
    plan: &AttrValue,
    state: &AttrValue,
    path: &str,
) {
    let empty = BTreeSet::new();
    let state_values = state.as_set().unwrap_or(&empty);

    let plan_values = match plan {
        AttrValue::Unknown => return,
        AttrValue::Null => {
            if !state_values.is_empty() {
                operations.push(Operation::remove(path));
            }
            return;
        },
        AttrValue::Set(values) => values,
        _ => return,
    };

    let to_add: Vec<String> = plan_values.difference(state_values).cloned().collect();
    let to_remove: Vec<String> = state_values.difference(plan_values).cloned().collect();

    if !to_add.is_empty() {
        operations.push(Operation::new(OperationKind::Add, path).with_values(to_add));
    }
    if !to_remove.is_empty() {
        operations.push(Operation::new(OperationKind::Remove, path).with_values(to_remove));
    }
}

/// Add the operations for one attribute, checking enumerations first.
pub fn add_operation_if_necessary(
    operations: &mut Vec<Operation>,
    spec: &AttrSpec,
    plan: &AttrValue,
    state: &AttrValue,
) -> Result<(), ProviderError> {
    if plan.is_known() {
        spec.check_enum(plan)?;
    }
    if spec.kind.is_set() {
        add_string_set_operations_if_necessary(operations, plan, state, spec.api);
    } else {
        add_scalar_operation_if_necessary(operations, plan, state, spec.api);
    }
    Ok(())
}

/// Diff a whole object. Identifiers, computed attributes and attributes the
/// planned type does not define never produce operations.
pub fn create_operations(
    attributes: &[AttrSpec],
    plan: &ObjectModel,
    state: &ObjectModel,
) -> Result<Vec<Operation>, ProviderError> {
    let object_type = plan.type_str().or_else(|| state.type_str());
    let mut operations = Vec::new();

    for spec in attributes {
        if matches!(spec.usage, Usage::Identifier | Usage::Computed) {
            continue;
        }
        if let Some(object_type) = object_type {
            if !spec.applies_to(object_type) {
                continue;
            }
        }
        add_operation_if_necessary(
            &mut operations,
            spec,
            plan.get(spec.name),
            state.get(spec.name),
        )?;
    }
    Ok(operations)
}

/// Log the operations of an update request at debug level.
pub fn log_update_operations(operations: &[Operation]) {
    match serde_json::to_string(operations) {
        Ok(json) => debug!(count = operations.len(), operations = %json, "Update operations"),
        Err(e) => debug!(
            count = operations.len(),
            error = %e,
            "Update operations could not be serialized"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectDefinition;
    use serde_json::json;

    static ATTRIBUTES: &[AttrSpec] = &[
        AttrSpec::string("description", "description", "A description."),
        AttrSpec::bool("enabled", "enabled", "Whether enabled."),
        AttrSpec::int64("db_cache_percent", "dbCachePercent", "Cache percent.")
            .for_types(&["local-db"]),
        AttrSpec::string_set("base_dn", "baseDN", "Base DNs."),
        AttrSpec::enumeration(
            "writability_mode",
            "writabilityMode",
            &["enabled", "disabled", "internal-only"],
            "Writability.",
        ),
        AttrSpec::string("java_class", "javaClass", "Java class.").computed(),
    ];

    static DEFINITION: ObjectDefinition = ObjectDefinition {
        object_name: "backend",
        display_name: "Backend",
        collection: "backends",
        identifier: AttrSpec::string("backend_id", "backendID", "Name.").identifier(),
        types: &["local-db", "alarm"],
        attributes: ATTRIBUTES,
    };

    fn model(state: serde_json::Value) -> ObjectModel {
        ObjectModel::from_state(&DEFINITION, &state).unwrap()
    }

    #[test]
    fn test_scalar_operations() {
        let mut ops = Vec::new();
        add_string_operation_if_necessary(
            &mut ops,
            &AttrValue::string("new"),
            &AttrValue::string("old"),
            "description",
        );
        let null = AttrValue::Null;
        let x = AttrValue::string("x");
        let five = AttrValue::Int64(5);
        add_bool_operation_if_necessary(&mut ops, &AttrValue::Bool(true), &null, "enabled");
        add_int64_operation_if_necessary(&mut ops, &five, &five, "dbCachePercent");
        add_string_operation_if_necessary(&mut ops, &null, &x, "notificationManager");
        add_string_operation_if_necessary(&mut ops, &AttrValue::Unknown, &x, "javaClass");
        add_string_operation_if_necessary(&mut ops, &null, &null, "description");

        assert_eq!(
            ops,
            vec![
                Operation::replace("description", "new"),
                Operation::replace("enabled", "true"),
                Operation::remove("notificationManager"),
            ]
        );
    }

    #[test]
    fn test_set_operations() {
        let mut ops = Vec::new();
        add_string_set_operations_if_necessary(
            &mut ops,
            &AttrValue::set(["dc=a", "dc=c"]),
            &AttrValue::set(["dc=b", "dc=a"]),
            "baseDN",
        );
        assert_eq!(
            ops,
            vec![
                Operation::new(OperationKind::Add, "baseDN").with_values(vec!["dc=c".to_string()]),
                Operation::new(OperationKind::Remove, "baseDN")
                    .with_values(vec!["dc=b".to_string()]),
            ]
        );

        let null = AttrValue::Null;
        let x = AttrValue::set(["x"]);

        let mut ops = Vec::new();
        add_string_set_operations_if_necessary(&mut ops, &x, &null, "baseDN");
        let add = Operation::new(OperationKind::Add, "baseDN").with_values(vec!["x".to_string()]);
        assert_eq!(ops, vec![add]);

        let mut ops = Vec::new();
        add_string_set_operations_if_necessary(&mut ops, &null, &x, "baseDN");
        assert_eq!(ops, vec![Operation::remove("baseDN")]);

        let mut ops = Vec::new();
        add_string_set_operations_if_necessary(&mut ops, &AttrValue::Unknown, &x, "baseDN");
        add_string_set_operations_if_necessary(&mut ops, &AttrValue::empty_set(), &null, "baseDN");
        assert!(ops.is_empty());
    }

    #[test]
    fn test_set_order_does_not_matter() {
        let plan = model(json!({
            "backend_id": "userRoot",
            "type": "local-db",
            "base_dn": ["dc=b", "dc=a"]
        }));
        let state = model(json!({
            "backend_id": "userRoot",
            "type": "local-db",
            "base_dn": ["dc=a", "dc=b"]
        }));
        let ops = create_operations(ATTRIBUTES, &plan, &state).unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_create_operations_no_changes() {
        let state = model(json!({
            "backend_id": "userRoot",
            "type": "local-db",
            "description": "d",
            "enabled": true,
            "db_cache_percent": 10,
            "base_dn": ["dc=example,dc=com"],
            "writability_mode": "enabled",
            "java_class": "com.unboundid.directory.server.backends.jeb.BackendImpl"
        }));
        let ops = create_operations(ATTRIBUTES, &state, &state).unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_create_operations_skips_identifier_computed_and_other_types() {
        let plan = model(json!({
            "backend_id": "renamed",
            "type": "alarm",
            "java_class": "other",
            "db_cache_percent": 50,
            "enabled": false
        }));
        let state = model(json!({
            "backend_id": "alarms",
            "type": "alarm",
            "java_class": "com.unboundid.directory.server.backends.AlarmBackend",
            "enabled": true
        }));
        let ops = create_operations(ATTRIBUTES, &plan, &state).unwrap();
        assert_eq!(ops, vec![Operation::replace("enabled", "false")]);
    }

    #[test]
    fn test_create_operations_rejects_bad_enum() {
        let plan = model(json!({
            "backend_id": "userRoot",
            "type": "local-db",
            "writability_mode": "read-only"
        }));
        let state = model(json!({
            "backend_id": "userRoot",
            "type": "local-db",
            "writability_mode": "enabled"
        }));
        let err = create_operations(ATTRIBUTES, &plan, &state).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }
}
