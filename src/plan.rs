//! Plan modification for configuration objects.
//!
//! Attributes left unset in configuration are filled in here: on update they
//! keep their prior value, on create they take a per-type default, become
//! null when the planned type does not define them, or stay unknown until the
//! server reports them. Unset clearable attributes of creatable resources are
//! always null, so removing one from configuration clears it on the server.

use serde_json::Value;

use crate::error::ProviderError;
use crate::model::{AttrValue, ObjectDefinition, ObjectModel, Usage};
use crate::types::{AttributeChange, PlanResult};
use crate::version::ProductVersion;

/// What the planner needs to know about the resource being planned.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub definition: &'a ObjectDefinition,
    /// Whether the resource creates objects (rather than adopting existing ones).
    pub creatable: bool,
    pub version: ProductVersion,
}

/// Compute the planned state for a resource.
///
/// `config` holds the attributes set in configuration; `proposed` is used
/// in its place when no configuration is supplied. A null `proposed` plans a
/// destroy.
pub fn modify_plan(
    ctx: PlanContext<'_>,
    prior: Option<&Value>,
    proposed: &Value,
    config: &Value,
) -> Result<PlanResult, ProviderError> {
    if proposed.is_null() {
        return Ok(PlanResult::no_change(Value::Null));
    }

    let definition = ctx.definition;
    let configured = ObjectModel::from_state(
        definition,
        if config.is_object() { config } else { proposed },
    )?;
    let prior = prior
        .filter(|p| p.is_object())
        .map(|p| ObjectModel::from_state(definition, p))
        .transpose()?;

    let requires_replace = match &prior {
        Some(prior) => {
            changed(&configured.identifier, &prior.identifier)
                || changed(&configured.object_type, &prior.object_type)
        },
        None => false,
    };
    // A replacement is planned exactly like a create.
    let base = if requires_replace { None } else { prior.as_ref() };

    let object_type = match (&configured.object_type, base) {
        (AttrValue::Null, Some(base)) => base.object_type.clone(),
        (AttrValue::Null, None) => AttrValue::Unknown,
        (configured_type, _) => configured_type.clone(),
    };
    let type_name = object_type.as_str();

    let mut planned = ObjectModel {
        identifier: configured.identifier.clone(),
        object_type: object_type.clone(),
        values: Default::default(),
        messages: None,
    };

    for spec in definition.attributes {
        let value = configured.get(spec.name);

        if !value.is_null() && spec.usage != Usage::Computed {
            if !spec.supported_by(ctx.version) {
                return Err(ProviderError::Validation(format!(
                    "Attribute {} is not supported by PingDirectory version {}; it requires {} or later",
                    spec.name,
                    ctx.version,
                    spec.min_version.map(|v| v.to_string()).unwrap_or_default()
                )));
            }
            planned.set(spec.name, value.clone());
            continue;
        }

        if ctx.creatable && spec.usage == Usage::Clearable {
            planned.set(spec.name, spec.kind.empty_value());
            continue;
        }

        let planned_value = match base {
            Some(base) => base.get(spec.name).clone(),
            None => match type_name {
                _ if !spec.supported_by(ctx.version) => spec.kind.empty_value(),
                Some(ty) if !spec.applies_to(ty) => spec.kind.empty_value(),
                Some(ty) if ctx.creatable && spec.usage != Usage::Computed => {
                    spec.default_for(ty).unwrap_or(AttrValue::Unknown)
                },
                _ => AttrValue::Unknown,
            },
        };
        planned.set(spec.name, planned_value);
    }

    let changes = match base {
        Some(base) => diff(definition, base, &planned),
        None => additions(definition, &planned),
    };

    // Messages are only refreshed when something is sent to the server.
    planned.messages = match base {
        Some(base) if changes.is_empty() => base.messages.clone(),
        _ => None,
    };

    Ok(PlanResult::with_changes(planned.to_state(definition), changes, requires_replace))
}

/// Whether a configured value differs from the prior one.
fn changed(configured: &AttrValue, prior: &AttrValue) -> bool {
    configured.is_known() && prior.is_known() && configured != prior
}

fn diff(
    definition: &ObjectDefinition,
    prior: &ObjectModel,
    planned: &ObjectModel,
) -> Vec<AttributeChange> {
    let mut changes = Vec::new();
    if planned.object_type != prior.object_type {
        changes.push(change("type", &prior.object_type, &planned.object_type));
    }
    for spec in definition.attributes {
        let before = prior.get(spec.name);
        let after = planned.get(spec.name);
        if before != after {
            changes.push(change(spec.name, before, after));
        }
    }
    changes
}

fn additions(definition: &ObjectDefinition, planned: &ObjectModel) -> Vec<AttributeChange> {
    let mut changes = vec![
        AttributeChange::added(definition.identifier.name, planned.identifier.to_state()),
        AttributeChange::added("type", planned.object_type.to_state()),
    ];
    changes.extend(
        definition
            .attributes
            .iter()
            .filter(|spec| !planned.get(spec.name).is_null())
            .map(|spec| AttributeChange::added(spec.name, planned.get(spec.name).to_state())),
    );
    changes
}

fn change(path: &str, before: &AttrValue, after: &AttrValue) -> AttributeChange {
    match (before.is_null(), after.is_null()) {
        (true, _) => AttributeChange::added(path, after.to_state()),
        (false, true) => AttributeChange::removed(path, before.to_state()),
        (false, false) => AttributeChange::modified(path, before.to_state(), after.to_state()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttrSpec, DefaultValue};
    use crate::types::UNKNOWN_VALUE;
    use serde_json::json;

    static ATTRIBUTES: &[AttrSpec] = &[
        AttrSpec::string("description", "description", "A description.").clearable(),
        AttrSpec::bool("enabled", "enabled", "Whether enabled.").required_on_create(),
        AttrSpec::string("db_directory", "dbDirectory", "Directory.")
            .for_types(&["local-db"])
            .with_defaults(&[("local-db", DefaultValue::String("db"))]),
        AttrSpec::string_set("disabled_alert_type", "disabledAlertType", "Alert types.")
            .for_types(&["alert"]),
        AttrSpec::bool(
            "return_unavailable_for_untrusted_index",
            "returnUnavailableForUntrustedIndex",
            "Untrusted index.",
        )
        .for_types(&["local-db"])
        .since(ProductVersion::V9_2_0_0),
        AttrSpec::string("java_class", "javaClass", "Java class.").computed(),
    ];

    static DEFINITION: ObjectDefinition = ObjectDefinition {
        object_name: "backend",
        display_name: "Backend",
        collection: "backends",
        identifier: AttrSpec::string("backend_id", "backendID", "Name.").identifier(),
        types: &["local-db", "alert"],
        attributes: ATTRIBUTES,
    };

    fn ctx(creatable: bool) -> PlanContext<'static> {
        PlanContext {
            definition: &DEFINITION,
            creatable,
            version: ProductVersion::V9_3_0_0,
        }
    }

    fn prior_state() -> Value {
        json!({
            "id": "userRoot",
            "backend_id": "userRoot",
            "type": "local-db",
            "description": null,
            "enabled": true,
            "db_directory": "db",
            "disabled_alert_type": [],
            "return_unavailable_for_untrusted_index": true,
            "java_class": "com.unboundid.directory.server.backends.jeb.BackendImpl",
            "notifications": [],
            "required_actions": []
        })
    }

    #[test]
    fn test_destroy_plan() {
        let result =
            modify_plan(ctx(true), Some(&prior_state()), &Value::Null, &Value::Null).unwrap();
        assert_eq!(result.planned_state, Value::Null);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_create_applies_defaults_for_creatable() {
        let config = json!({"backend_id": "userRoot", "type": "local-db", "enabled": true});
        let result = modify_plan(ctx(true), None, &config, &config).unwrap();
        let planned = &result.planned_state;

        assert_eq!(planned["id"], "userRoot");
        assert_eq!(planned["db_directory"], "db");
        assert_eq!(planned["description"], Value::Null);
        assert_eq!(planned["java_class"], UNKNOWN_VALUE);
        assert_eq!(
            planned["return_unavailable_for_untrusted_index"],
            UNKNOWN_VALUE
        );
        // Not defined for local-db.
        assert_eq!(planned["disabled_alert_type"], json!([]));
        assert_eq!(planned["notifications"], UNKNOWN_VALUE);
        assert!(!result.requires_replace);
        assert!(result.changes.iter().any(|c| c.path == "db_directory"));
    }

    #[test]
    fn test_create_edit_only_leaves_defaults_unknown() {
        let config = json!({"backend_id": "userRoot", "type": "local-db"});
        let result = modify_plan(ctx(false), None, &config, &config).unwrap();
        assert_eq!(result.planned_state["db_directory"], UNKNOWN_VALUE);
        assert_eq!(result.planned_state["disabled_alert_type"], json!([]));
    }

    #[test]
    fn test_create_edit_only_without_type() {
        let config = json!({"backend_id": "alerts"});
        let result = modify_plan(ctx(false), None, &config, &config).unwrap();
        assert_eq!(result.planned_state["type"], UNKNOWN_VALUE);
        assert_eq!(result.planned_state["db_directory"], UNKNOWN_VALUE);
        assert_eq!(result.planned_state["disabled_alert_type"], UNKNOWN_VALUE);
    }

    #[test]
    fn test_update_uses_state_for_unset_attributes() {
        let config = json!({"backend_id": "userRoot", "type": "local-db", "enabled": false});
        let result = modify_plan(ctx(true), Some(&prior_state()), &config, &config).unwrap();
        let planned = &result.planned_state;

        assert_eq!(planned["enabled"], false);
        assert_eq!(planned["db_directory"], "db");
        assert_eq!(
            planned["java_class"],
            "com.unboundid.directory.server.backends.jeb.BackendImpl"
        );
        assert_eq!(planned["notifications"], UNKNOWN_VALUE);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "enabled");
        assert_eq!(result.changes[0].before, Some(json!(true)));
        assert_eq!(result.changes[0].after, Some(json!(false)));
    }

    #[test]
    fn test_update_without_changes() {
        let config = json!({"backend_id": "userRoot", "type": "local-db", "enabled": true});
        let result = modify_plan(ctx(true), Some(&prior_state()), &config, &config).unwrap();
        assert!(result.changes.is_empty());
        assert!(!result.requires_replace);
        assert_eq!(result.planned_state["notifications"], json!([]));
    }

    #[test]
    fn test_update_clears_unset_clearable_attribute() {
        let mut prior = prior_state();
        prior["description"] = json!("old");
        let config = json!({"backend_id": "userRoot", "type": "local-db", "enabled": true});

        let result = modify_plan(ctx(true), Some(&prior), &config, &config).unwrap();
        assert_eq!(result.planned_state["description"], Value::Null);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "description");
        assert_eq!(result.changes[0].before, Some(json!("old")));
        assert_eq!(result.changes[0].after, None);

        // Edit-only resources keep whatever the server holds.
        let result = modify_plan(ctx(false), Some(&prior), &config, &config).unwrap();
        assert_eq!(result.planned_state["description"], "old");
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_identifier_change_requires_replace() {
        let config = json!({"backend_id": "otherRoot", "type": "local-db", "enabled": true});
        let result = modify_plan(ctx(true), Some(&prior_state()), &config, &config).unwrap();
        assert!(result.requires_replace);
        // Planned as a create: prior values are not carried over.
        assert_eq!(result.planned_state["java_class"], UNKNOWN_VALUE);
        assert_eq!(result.planned_state["db_directory"], "db");
    }

    #[test]
    fn test_type_change_requires_replace() {
        let config = json!({"backend_id": "userRoot", "type": "alert"});
        let result = modify_plan(ctx(false), Some(&prior_state()), &config, &config).unwrap();
        assert!(result.requires_replace);
        assert_eq!(result.planned_state["db_directory"], Value::Null);
    }

    #[test]
    fn test_unsupported_attribute_for_version() {
        let config = json!({
            "backend_id": "userRoot",
            "type": "local-db",
            "return_unavailable_for_untrusted_index": true
        });
        let old = PlanContext {
            version: ProductVersion::V9_1_0_0,
            ..ctx(true)
        };
        let err = modify_plan(old, None, &config, &config).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
        assert!(err.to_string().contains("9.2.0.0"));

        let config = json!({"backend_id": "userRoot", "type": "local-db"});
        let result = modify_plan(old, None, &config, &config).unwrap();
        assert_eq!(
            result.planned_state["return_unavailable_for_untrusted_index"],
            Value::Null
        );
    }
}
