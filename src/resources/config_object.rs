//! Generic resource and data sources for configuration objects.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::ProviderError;
use crate::model::{
    AttrValue, Messages, ObjectDefinition, ObjectModel, ID_ATTRIBUTE, TYPE_ATTRIBUTE,
};
use crate::operations::{create_operations, log_update_operations};
use crate::plan::{modify_plan, PlanContext};
use crate::provider::ProviderContext;
use crate::schema::{Attribute, Diagnostic, Schema};
use crate::types::{ImportedResource, PlanResult, StateResponse};
use crate::validation::{implies_other_attribute_one_of_string, one_of_string, validate};

use super::{DataSource, Resource};

/// How a resource relates to the objects it manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMode {
    /// Objects of these types are created with POST and removed with DELETE.
    Creatable { types: &'static [&'static str] },
    /// Objects always exist: create adopts them, delete only forgets them.
    EditOnly,
}

/// A resource managing one kind of configuration object.
#[derive(Debug)]
pub struct ConfigObjectResource {
    type_name: &'static str,
    definition: &'static ObjectDefinition,
    mode: ResourceMode,
}

impl ConfigObjectResource {
    pub fn new(
        type_name: &'static str,
        definition: &'static ObjectDefinition,
        mode: ResourceMode,
    ) -> Self {
        Self {
            type_name,
            definition,
            mode,
        }
    }

    pub fn is_creatable(&self) -> bool {
        matches!(self.mode, ResourceMode::Creatable { .. })
    }

    /// The types this resource accepts in its `type` attribute.
    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self.mode {
            ResourceMode::Creatable { types } => types,
            ResourceMode::EditOnly => self.definition.types,
        }
    }

    fn display_name(&self) -> &'static str {
        self.definition.display_name
    }

    fn identifier_of(&self, model: &ObjectModel) -> Result<String, ProviderError> {
        model.identifier_str().map(str::to_string).ok_or_else(|| {
            ProviderError::InvalidRequest(format!(
                "{} state has no known {}",
                self.display_name(),
                self.definition.identifier.name
            ))
        })
    }
}

#[async_trait::async_trait]
impl Resource for ConfigObjectResource {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn schema(&self) -> Schema {
        let definition = self.definition;
        let creatable = self.is_creatable();

        let type_attribute = if creatable {
            Attribute::required_string()
        } else {
            Attribute::new(
                crate::schema::AttributeType::String,
                crate::schema::AttributeFlags::optional_computed(),
            )
            .with_use_state_for_unknown()
        };
        let type_attribute = type_attribute.with_force_new().with_description(format!(
            "The type of {} resource. Options are [{}]",
            definition.display_name,
            self.allowed_types().join(", ")
        ));

        let mut schema = Schema::v0()
            .with_description(if creatable {
                format!("Manages a {}.", definition.display_name)
            } else {
                format!(
                    "Manages a {} that already exists on the server; it is never created or deleted.",
                    definition.display_name
                )
            })
            .with_attribute(
                ID_ATTRIBUTE,
                Attribute::computed_string()
                    .with_use_state_for_unknown()
                    .with_description("Placeholder name of this object required by Terraform."),
            )
            .with_attribute(
                definition.identifier.name,
                definition.identifier.resource_attribute(creatable),
            )
            .with_attribute(TYPE_ATTRIBUTE, type_attribute);

        for spec in definition.attributes {
            schema = schema.with_attribute(spec.name, spec.resource_attribute(creatable));
        }
        for (name, attribute) in Messages::schema_attributes() {
            schema = schema.with_attribute(name, attribute);
        }
        schema
    }

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diagnostics = validate(&self.schema(), config);
        diagnostics.extend(one_of_string(config, TYPE_ATTRIBUTE, self.allowed_types()));
        for spec in self.definition.attributes {
            if spec.types.is_empty() {
                continue;
            }
            diagnostics.extend(implies_other_attribute_one_of_string(
                config,
                spec.name,
                TYPE_ATTRIBUTE,
                spec.types,
            ));
        }
        diagnostics
    }

    fn plan(
        &self,
        ctx: &ProviderContext,
        prior_state: Option<&Value>,
        proposed_state: &Value,
        config: &Value,
    ) -> Result<PlanResult, ProviderError> {
        modify_plan(
            PlanContext {
                definition: self.definition,
                creatable: self.is_creatable(),
                version: ctx.version,
            },
            prior_state,
            proposed_state,
            config,
        )
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        planned_state: &Value,
    ) -> Result<StateResponse, ProviderError> {
        let definition = self.definition;
        let planned = ObjectModel::from_state(definition, planned_state)?;
        let id = self.identifier_of(&planned)?;

        let response = match self.mode {
            ResourceMode::Creatable { .. } => {
                let body = planned.to_create_body(definition)?;
                debug!(id = %id, "Creating {}", definition.display_name);
                ctx.client.create(definition.collection, &body).await?
            },
            ResourceMode::EditOnly => {
                let current = ctx.client.get(definition.collection, &id).await?;
                let current_model = ObjectModel::from_api(definition, &current)?;

                if let (Some(planned_type), Some(actual_type)) =
                    (planned.type_str(), current_model.type_str())
                {
                    if planned_type != actual_type {
                        return Err(ProviderError::Validation(format!(
                            "{} '{}' has type {}, not the configured type {}",
                            definition.display_name, id, actual_type, planned_type
                        )));
                    }
                }

                let operations =
                    create_operations(definition.attributes, &planned, &current_model)?;
                if operations.is_empty() {
                    info!(id = %id, "{} already matches the plan", definition.display_name);
                    current
                } else {
                    log_update_operations(&operations);
                    ctx
                        .client
                        .update(definition.collection, &id, &operations)
                        .await?
                }
            },
        };

        let actual = ObjectModel::from_api(definition, &response)?;
        let (model, diagnostics) = reconcile(definition, &planned, actual, true);
        Ok(StateResponse::new(model.to_state(definition)).with_diagnostics(diagnostics))
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        current_state: &Value,
    ) -> Result<StateResponse, ProviderError> {
        let definition = self.definition;
        let current = ObjectModel::from_state(definition, current_state)?;
        let id = self.identifier_of(&current)?;

        let response = match ctx.client.get(definition.collection, &id).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                warn!(id = %id, "{} not found, removing from state", definition.display_name);
                return Ok(StateResponse::removed().with_diagnostic(
                    Diagnostic::warning(format!("{} not found", definition.display_name))
                        .with_detail(format!(
                            "{} '{}' no longer exists. It will be removed from state.",
                            definition.display_name, id
                        )),
                ));
            },
            Err(e) => return Err(e.into()),
        };

        let actual = ObjectModel::from_api(definition, &response)?;
        let (model, diagnostics) = reconcile(definition, &current, actual, false);
        Ok(StateResponse::new(model.to_state(definition)).with_diagnostics(diagnostics))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        prior_state: &Value,
        planned_state: &Value,
    ) -> Result<StateResponse, ProviderError> {
        let definition = self.definition;
        let prior = ObjectModel::from_state(definition, prior_state)?;
        let planned = ObjectModel::from_state(definition, planned_state)?;
        let id = self.identifier_of(&planned)?;

        let operations = create_operations(definition.attributes, &planned, &prior)?;
        if operations.is_empty() {
            warn!(id = %id, "No configuration API operations created for update");
            let model = fill_unknowns(planned, &prior);
            return Ok(StateResponse::new(model.to_state(definition)));
        }

        log_update_operations(&operations);
        let response = ctx
            .client
            .update(definition.collection, &id, &operations)
            .await?;
        let actual = ObjectModel::from_api(definition, &response)?;
        let (model, diagnostics) = reconcile(definition, &planned, actual, true);
        Ok(StateResponse::new(model.to_state(definition)).with_diagnostics(diagnostics))
    }

    async fn delete(
        &self,
        ctx: &ProviderContext,
        current_state: &Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let definition = self.definition;
        let current = ObjectModel::from_state(definition, current_state)?;
        let id = self.identifier_of(&current)?;

        match self.mode {
            ResourceMode::Creatable { .. } => {
                match ctx.client.delete(definition.collection, &id).await {
                    Ok(()) => info!(id = %id, "{} deleted", definition.display_name),
                    Err(e) if e.is_not_found() => {
                        info!(id = %id, "{} already deleted", definition.display_name)
                    },
                    Err(e) => return Err(e.into()),
                }
            },
            ResourceMode::EditOnly => {
                info!(
                    id = %id,
                    "{} cannot be deleted from the server; removing it from state only",
                    definition.display_name
                );
            },
        }
        Ok(vec![])
    }

    fn import(&self, id: &str) -> Result<Vec<ImportedResource>, ProviderError> {
        if id.is_empty() {
            return Err(ProviderError::InvalidRequest(format!(
                "An import id naming the {} is required",
                self.display_name()
            )));
        }
        let mut state = Map::new();
        state.insert(
            self.definition.identifier.name.to_string(),
            Value::String(id.to_string()),
        );
        Ok(vec![ImportedResource::new(self.type_name, Value::Object(state))])
    }
}

/// Merge a response into state, using the planned or prior model as reference.
///
/// Sensitive values the server does not return keep the reference value.
/// Server-formatted values keep the reference spelling when equivalent;
/// with `warn_on_mismatch` a differing value is reported as a warning.
fn reconcile(
    definition: &ObjectDefinition,
    expected: &ObjectModel,
    mut actual: ObjectModel,
    warn_on_mismatch: bool,
) -> (ObjectModel, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    if actual.identifier.is_null() {
        actual.identifier = expected.identifier.clone();
    }

    for spec in definition.attributes {
        let expected_value = expected.get(spec.name);
        let actual_value = actual.get(spec.name);

        if spec.sensitive && actual_value.is_null() && expected_value.is_known() {
            actual.set(spec.name, expected_value.clone());
            continue;
        }

        if !spec.pd_formatted {
            continue;
        }
        if let (AttrValue::String(want), AttrValue::String(got)) = (expected_value, actual_value) {
            if want == got {
                continue;
            }
            if normalize(want) == normalize(got) {
                actual.set(spec.name, expected_value.clone());
            } else if warn_on_mismatch {
                diagnostics.push(
                    Diagnostic::warning("Mismatched attribute value")
                        .with_detail(format!(
                            "PingDirectory value for attribute {} was '{}', but the planned value was '{}'",
                            spec.name, got, want
                        ))
                        .with_attribute(spec.name),
                );
            }
        }
    }

    (actual, diagnostics)
}

/// The spelling-insensitive form of a server-formatted value.
fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Replace unknown planned values with prior ones.
fn fill_unknowns(mut planned: ObjectModel, prior: &ObjectModel) -> ObjectModel {
    for (name, value) in planned.values.iter_mut() {
        if value.is_unknown() {
            *value = prior.get(name).clone();
        }
    }
    if planned.object_type.is_unknown() {
        planned.object_type = prior.object_type.clone();
    }
    if planned.messages.is_none() {
        planned.messages = Some(prior.messages.clone().unwrap_or_default());
    }
    planned
}

/// A data source reading one configuration object by identifier.
#[derive(Debug)]
pub struct ConfigObjectDataSource {
    type_name: &'static str,
    definition: &'static ObjectDefinition,
}

impl ConfigObjectDataSource {
    pub fn new(type_name: &'static str, definition: &'static ObjectDefinition) -> Self {
        Self {
            type_name,
            definition,
        }
    }
}

#[async_trait::async_trait]
impl DataSource for ConfigObjectDataSource {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn schema(&self) -> Schema {
        let definition = self.definition;
        let mut schema = Schema::v0()
            .with_description(format!("Describes a {}.", definition.display_name))
            .with_attribute(
                ID_ATTRIBUTE,
                Attribute::computed_string()
                    .with_description("Placeholder name of this object required by Terraform."),
            )
            .with_attribute(
                definition.identifier.name,
                definition.identifier.data_source_attribute(),
            )
            .with_attribute(
                TYPE_ATTRIBUTE,
                Attribute::computed_string()
                    .with_description(format!("The type of {} resource.", definition.display_name)),
            );
        for spec in definition.attributes {
            schema = schema.with_attribute(spec.name, spec.data_source_attribute());
        }
        for (name, attribute) in Messages::schema_attributes() {
            schema = schema.with_attribute(name, attribute);
        }
        schema
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        config: &Value,
    ) -> Result<StateResponse, ProviderError> {
        let definition = self.definition;
        let id = config
            .get(definition.identifier.name)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ProviderError::Validation(format!(
                    "{} is required to read a {}",
                    definition.identifier.name, definition.display_name
                ))
            })?;

        // Unlike resource reads, a missing object is an error here.
        let response = ctx.client.get(definition.collection, id).await?;
        let model = ObjectModel::from_api(definition, &response)?;
        Ok(StateResponse::new(model.to_state(definition)))
    }
}

/// A data source listing the identifiers of one kind of configuration object.
#[derive(Debug)]
pub struct ConfigObjectListDataSource {
    type_name: &'static str,
    definition: &'static ObjectDefinition,
}

impl ConfigObjectListDataSource {
    pub fn new(type_name: &'static str, definition: &'static ObjectDefinition) -> Self {
        Self {
            type_name,
            definition,
        }
    }
}

#[async_trait::async_trait]
impl DataSource for ConfigObjectListDataSource {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description(format!("Lists {} objects.", self.definition.display_name))
            .with_attribute(
                ID_ATTRIBUTE,
                Attribute::computed_string()
                    .with_description("Placeholder name of this object required by Terraform."),
            )
            .with_attribute(
                "filter",
                Attribute::optional_string().with_description(
                    "SCIM filter used when searching the configuration. For example, `id sw \"a\"`.",
                ),
            )
            .with_attribute(
                "ids",
                Attribute::computed_string_set().with_description(format!(
                    "{} IDs found in the configuration",
                    self.definition.display_name
                )),
            )
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        config: &Value,
    ) -> Result<StateResponse, ProviderError> {
        let filter = config
            .get("filter")
            .and_then(Value::as_str)
            .filter(|f| !f.is_empty());

        let list = ctx.client.list(self.definition.collection, filter).await?;
        let ids = list.ids();
        debug!(count = ids.len(), "Listed {} objects", self.definition.display_name);

        let mut state = Map::new();
        state.insert(ID_ATTRIBUTE.to_string(), Value::String("id".to_string()));
        state.insert(
            "filter".to_string(),
            filter.map_or(Value::Null, |f| Value::String(f.to_string())),
        );
        state.insert("ids".to_string(), AttrValue::set(ids).to_state());
        Ok(StateResponse::new(Value::Object(state)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttrSpec;
    use serde_json::json;

    static ATTRIBUTES: &[AttrSpec] = &[
        AttrSpec::string("description", "description", "A description."),
        AttrSpec::string("trust_store_pin", "trustStorePin", "PIN.")
            .for_types(&["trust-store"])
            .sensitive(),
        AttrSpec::string("alarm_retention_time", "alarmRetentionTime", "Retention.")
            .for_types(&["alarm"])
            .pd_formatted(),
    ];

    static DEFINITION: ObjectDefinition = ObjectDefinition {
        object_name: "backend",
        display_name: "Backend",
        collection: "backends",
        identifier: AttrSpec::string("backend_id", "backendID", "Name.").identifier(),
        types: &["trust-store", "alarm"],
        attributes: ATTRIBUTES,
    };

    fn model(state: Value) -> ObjectModel {
        ObjectModel::from_state(&DEFINITION, &state).unwrap()
    }

    fn edit_only() -> ConfigObjectResource {
        ConfigObjectResource::new(
            "pingdirectory_default_backend",
            &DEFINITION,
            ResourceMode::EditOnly,
        )
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("1 d"), normalize("1D"));
        assert_ne!(normalize("1 d"), normalize("24 h"));
    }

    #[test]
    fn test_reconcile_keeps_sensitive_value() {
        let expected = model(json!({
            "backend_id": "ads-truststore",
            "type": "trust-store",
            "trust_store_pin": "secret"
        }));
        let actual = model(json!({"backend_id": "ads-truststore", "type": "trust-store"}));
        let (merged, diagnostics) = reconcile(&DEFINITION, &expected, actual, true);
        assert_eq!(merged.get("trust_store_pin"), &AttrValue::string("secret"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_reconcile_pd_formatted() {
        let alarms = |retention: &str| {
            model(json!({
                "backend_id": "alarms",
                "type": "alarm",
                "alarm_retention_time": retention
            }))
        };
        let expected = alarms("24 h");

        let actual = alarms("24h");
        let (merged, diagnostics) = reconcile(&DEFINITION, &expected, actual, true);
        assert_eq!(
            merged.get("alarm_retention_time"),
            &AttrValue::string("24 h")
        );
        assert!(diagnostics.is_empty());

        let actual = alarms("1 d");
        let (merged, diagnostics) = reconcile(&DEFINITION, &expected, actual.clone(), true);
        assert_eq!(
            merged.get("alarm_retention_time"),
            &AttrValue::string("1 d")
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Mismatched attribute value");

        // Refreshes report drift through the plan, not as warnings.
        let (_, diagnostics) = reconcile(&DEFINITION, &expected, actual, false);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_fill_unknowns() {
        let planned = model(json!({
            "backend_id": "alarms",
            "type": crate::types::UNKNOWN_VALUE,
            "description": crate::types::UNKNOWN_VALUE,
            "notifications": crate::types::UNKNOWN_VALUE
        }));
        let prior = model(json!({
            "backend_id": "alarms",
            "type": "alarm",
            "description": "Alarms",
            "notifications": ["n"],
            "required_actions": []
        }));
        let filled = fill_unknowns(planned, &prior);
        assert_eq!(filled.type_str(), Some("alarm"));
        assert_eq!(filled.get("description"), &AttrValue::string("Alarms"));
        assert!(filled.messages.unwrap().notifications.contains("n"));
    }

    #[test]
    fn test_import_passes_id_through() {
        let resource = edit_only();
        let imported = resource.import("userRoot").unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].resource_type, "pingdirectory_default_backend");
        assert_eq!(imported[0].state, json!({"backend_id": "userRoot"}));
        assert!(resource.import("").is_err());
    }

    #[test]
    fn test_resource_schema_modes() {
        let creatable = ConfigObjectResource::new(
            "pingdirectory_backend",
            &DEFINITION,
            ResourceMode::Creatable { types: &["alarm"] },
        );
        let schema = creatable.schema();
        let type_attr = schema.attribute("type").unwrap();
        assert!(type_attr.flags.required);
        assert!(type_attr.force_new);
        assert!(schema.attribute("notifications").unwrap().flags.computed);

        let edit_only = edit_only();
        let type_attr = edit_only.schema().attribute("type").cloned().unwrap();
        assert!(type_attr.flags.optional && type_attr.flags.computed);
        assert_eq!(edit_only.allowed_types(), &["trust-store", "alarm"]);
    }

    #[test]
    fn test_validate_type_specific_attribute() {
        let resource = edit_only();

        let diagnostics = resource.validate(&json!({
            "backend_id": "alarms",
            "type": "alarm",
            "trust_store_pin": "x"
        }));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Invalid Attribute Combination");

        let diagnostics = resource.validate(&json!({"backend_id": "alarms", "type": "ldif"}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("type".to_string()));

        let diagnostics =
            resource.validate(&json!({"backend_id": "alarms", "alarm_retention_time": "1 d"}));
        assert_eq!(diagnostics.len(), 1);
    }
}
