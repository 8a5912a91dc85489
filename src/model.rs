//! The configuration object mirror.
//!
//! An [`ObjectDefinition`] describes one kind of configuration object (its
//! collection, identifier, types and attribute table). An [`ObjectModel`]
//! holds one value per attribute and converts between the state JSON the
//! plugin host stores and the JSON the Configuration API speaks.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::client::{CONFIGURATION_SCHEMA_PREFIX, MESSAGES_SCHEMA};
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeFlags, AttributeType};
use crate::types::{is_unknown, unknown};
use crate::version::ProductVersion;

/// State attribute holding the placeholder id.
pub const ID_ATTRIBUTE: &str = "id";
/// State attribute holding the object type.
pub const TYPE_ATTRIBUTE: &str = "type";
pub const NOTIFICATIONS_ATTRIBUTE: &str = "notifications";
pub const REQUIRED_ACTIONS_ATTRIBUTE: &str = "required_actions";

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Null,
    /// Not known until apply.
    Unknown,
    String(String),
    Bool(bool),
    Int64(i64),
    /// An unordered set of strings.
    Set(BTreeSet<String>),
}

impl AttrValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set(values.into_iter().map(Into::into).collect())
    }

    pub fn empty_set() -> Self {
        Self::Set(BTreeSet::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Neither null nor unknown.
    pub fn is_known(&self) -> bool {
        !self.is_null() && !self.is_unknown()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Set(values) => Some(values),
            _ => None,
        }
    }

    /// Read a value from state or plan JSON.
    pub fn from_state(
        kind: &AttrKind,
        value: Option<&Value>,
        name: &str,
    ) -> Result<Self, ProviderError> {
        let value = match value {
            None | Some(Value::Null) => return Ok(Self::Null),
            Some(v) if is_unknown(v) => return Ok(Self::Unknown),
            Some(v) => v,
        };

        match (kind, value) {
            (AttrKind::String | AttrKind::Enum(_), Value::String(s)) => Ok(Self::String(s.clone())),
            (AttrKind::Bool, Value::Bool(b)) => Ok(Self::Bool(*b)),
            (AttrKind::Int64, Value::Number(n)) => n
                .as_i64()
                .map(Self::Int64)
                .ok_or_else(|| invalid_state(name, kind, value)),
            (AttrKind::StringSet | AttrKind::EnumSet(_), Value::Array(items)) => {
                let mut set = BTreeSet::new();
                for item in items {
                    if is_unknown(item) {
                        return Ok(Self::Unknown);
                    }
                    match item.as_str() {
                        Some(s) => {
                            set.insert(s.to_string());
                        },
                        None => return Err(invalid_state(name, kind, value)),
                    }
                }
                Ok(Self::Set(set))
            },
            _ => Err(invalid_state(name, kind, value)),
        }
    }

    /// Render the value as state JSON.
    pub fn to_state(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Unknown => unknown(),
            Self::String(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Int64(n) => json!(n),
            Self::Set(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        }
    }

    /// Read a property of a Configuration API response.
    ///
    /// Absent properties are null, or the empty set for multi-valued ones.
    pub fn from_api(
        kind: &AttrKind,
        value: Option<&Value>,
        property: &str,
    ) -> Result<Self, ProviderError> {
        let value = match value {
            None | Some(Value::Null) => return Ok(kind.empty_value()),
            Some(v) => v,
        };

        let decode_error = || ProviderError::Api(crate::client::ApiError::Decode {
            message: format!("unexpected value for property '{}': {}", property, value),
        });

        match kind {
            AttrKind::String | AttrKind::Enum(_) => match value {
                Value::String(s) => Ok(Self::String(s.clone())),
                Value::Number(n) => Ok(Self::String(n.to_string())),
                Value::Bool(b) => Ok(Self::String(b.to_string())),
                _ => Err(decode_error()),
            },
            AttrKind::Bool => match value {
                Value::Bool(b) => Ok(Self::Bool(*b)),
                Value::String(s) => s.parse().map(Self::Bool).map_err(|_| decode_error()),
                _ => Err(decode_error()),
            },
            AttrKind::Int64 => match value {
                Value::Number(n) => n.as_i64().map(Self::Int64).ok_or_else(decode_error),
                Value::String(s) => s.parse().map(Self::Int64).map_err(|_| decode_error()),
                _ => Err(decode_error()),
            },
            AttrKind::StringSet | AttrKind::EnumSet(_) => match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.clone()),
                        Value::Number(_) | Value::Bool(_) => Ok(item.to_string()),
                        _ => Err(decode_error()),
                    })
                    .collect::<Result<BTreeSet<_>, _>>()
                    .map(Self::Set),
                Value::String(s) => Ok(Self::set([s.clone()])),
                _ => Err(decode_error()),
            },
        }
    }

    /// Render the value as a Configuration API property value.
    pub fn to_api(&self) -> Value {
        match self {
            Self::Null | Self::Unknown => Value::Null,
            other => other.to_state(),
        }
    }

    /// The single string form used in PATCH operations.
    pub fn operation_value(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int64(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_state())
    }
}

fn invalid_state(name: &str, kind: &AttrKind, value: &Value) -> ProviderError {
    ProviderError::InvalidRequest(format!(
        "Attribute {} expects {}, got {}",
        name,
        kind.type_name(),
        value
    ))
}

/// The type of an attribute, with the allowed values of enumerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    String,
    Bool,
    Int64,
    StringSet,
    Enum(&'static [&'static str]),
    EnumSet(&'static [&'static str]),
}

impl AttrKind {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::StringSet | Self::EnumSet(_))
    }

    /// The allowed values of an enumeration.
    pub fn allowed_values(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Enum(values) | Self::EnumSet(values) => Some(values),
            _ => None,
        }
    }

    /// Value of an attribute that does not apply, or was not returned.
    pub fn empty_value(&self) -> AttrValue {
        if self.is_set() {
            AttrValue::empty_set()
        } else {
            AttrValue::Null
        }
    }

    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Self::String | Self::Enum(_) => AttributeType::String,
            Self::Bool => AttributeType::Bool,
            Self::Int64 => AttributeType::Int64,
            Self::StringSet | Self::EnumSet(_) => AttributeType::string_set(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "a string",
            Self::Bool => "a bool",
            Self::Int64 => "an int64",
            Self::StringSet | Self::EnumSet(_) => "a set of strings",
        }
    }
}

/// How an attribute participates in the resource lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// Names the object; changing it replaces the resource.
    Identifier,
    /// Must be configured when the object is created through the provider.
    RequiredOnCreate,
    /// May be configured; otherwise the server's value is used.
    Optional,
    /// May be configured; the server has no default and leaving it unset
    /// clears it. Behaves like [`Usage::Optional`] on edit-only resources.
    Clearable,
    /// Reported by the server only.
    Computed,
}

/// A default that applies when an object of a given type is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    String(&'static str),
    Bool(bool),
    Int64(i64),
    Set(&'static [&'static str]),
}

impl DefaultValue {
    pub fn to_value(self) -> AttrValue {
        match self {
            Self::String(s) => AttrValue::string(s),
            Self::Bool(b) => AttrValue::Bool(b),
            Self::Int64(n) => AttrValue::Int64(n),
            Self::Set(values) => AttrValue::set(values.iter().copied()),
        }
    }
}

/// Declaration of one attribute of a configuration object.
#[derive(Debug, Clone, Copy)]
pub struct AttrSpec {
    /// Name in state and configuration.
    pub name: &'static str,
    /// Property name in the Configuration API.
    pub api: &'static str,
    pub kind: AttrKind,
    pub description: &'static str,
    /// Object types defining the attribute; empty means every type.
    pub types: &'static [&'static str],
    pub usage: Usage,
    pub sensitive: bool,
    /// The server normalises the spelling of the value (durations, sizes).
    pub pd_formatted: bool,
    /// Defaults applied on create, per object type.
    pub defaults: &'static [(&'static str, DefaultValue)],
    /// First product version that knows the attribute.
    pub min_version: Option<ProductVersion>,
}

impl AttrSpec {
    const fn new(
        name: &'static str,
        api: &'static str,
        kind: AttrKind,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            api,
            kind,
            description,
            types: &[],
            usage: Usage::Optional,
            sensitive: false,
            pd_formatted: false,
            defaults: &[],
            min_version: None,
        }
    }

    pub const fn string(name: &'static str, api: &'static str, description: &'static str) -> Self {
        Self::new(name, api, AttrKind::String, description)
    }

    pub const fn bool(name: &'static str, api: &'static str, description: &'static str) -> Self {
        Self::new(name, api, AttrKind::Bool, description)
    }

    pub const fn int64(name: &'static str, api: &'static str, description: &'static str) -> Self {
        Self::new(name, api, AttrKind::Int64, description)
    }

    pub const fn string_set(
        name: &'static str,
        api: &'static str,
        description: &'static str,
    ) -> Self {
        Self::new(name, api, AttrKind::StringSet, description)
    }

    pub const fn enumeration(
        name: &'static str,
        api: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self::new(name, api, AttrKind::Enum(values), description)
    }

    pub const fn enum_set(
        name: &'static str,
        api: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self::new(name, api, AttrKind::EnumSet(values), description)
    }

    pub const fn for_types(self, types: &'static [&'static str]) -> Self {
        Self { types, ..self }
    }

    pub const fn identifier(self) -> Self {
        Self {
            usage: Usage::Identifier,
            ..self
        }
    }

    pub const fn required_on_create(self) -> Self {
        Self {
            usage: Usage::RequiredOnCreate,
            ..self
        }
    }

    pub const fn clearable(self) -> Self {
        Self {
            usage: Usage::Clearable,
            ..self
        }
    }

    pub const fn computed(self) -> Self {
        Self {
            usage: Usage::Computed,
            ..self
        }
    }

    pub const fn sensitive(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }

    pub const fn pd_formatted(self) -> Self {
        Self {
            pd_formatted: true,
            ..self
        }
    }

    pub const fn with_defaults(self, defaults: &'static [(&'static str, DefaultValue)]) -> Self {
        Self { defaults, ..self }
    }

    pub const fn since(self, version: ProductVersion) -> Self {
        Self {
            min_version: Some(version),
            ..self
        }
    }

    /// Whether objects of `object_type` define this attribute.
    pub fn applies_to(&self, object_type: &str) -> bool {
        self.types.is_empty() || self.types.contains(&object_type)
    }

    /// The create-time default for `object_type`, if any.
    pub fn default_for(&self, object_type: &str) -> Option<AttrValue> {
        self.defaults
            .iter()
            .find(|(ty, _)| *ty == object_type)
            .map(|(_, default)| default.to_value())
    }

    /// Whether the configured product version knows this attribute.
    pub fn supported_by(&self, version: ProductVersion) -> bool {
        self.min_version.is_none_or(|min| version.at_least(min))
    }

    /// Reject a value outside an enumeration's allowed list.
    pub fn check_enum(&self, value: &AttrValue) -> Result<(), ProviderError> {
        let Some(allowed) = self.kind.allowed_values() else {
            return Ok(());
        };
        let invalid: Vec<&str> = match value {
            AttrValue::String(s) => vec![s.as_str()],
            AttrValue::Set(values) => values.iter().map(String::as_str).collect(),
            _ => vec![],
        }
        .into_iter()
        .filter(|v| !allowed.contains(v))
        .collect();

        match invalid.first() {
            None => Ok(()),
            Some(bad) => Err(ProviderError::Validation(format!(
                "Invalid value '{}' for attribute {}: must be one of {}",
                bad,
                self.name,
                allowed.join(", ")
            ))),
        }
    }

    /// Full description shown in the schema.
    pub fn schema_description(&self) -> String {
        let mut description = if self.types.is_empty() {
            self.description.to_string()
        } else {
            format!(
                "When the `type` attribute is set to {}: {}",
                self.types
                    .iter()
                    .map(|t| format!("`{}`", t))
                    .collect::<Vec<_>>()
                    .join(", "),
                self.description
            )
        };
        if let Some(version) = self.min_version {
            description.push_str(&format!(
                " Supported in PingDirectory product version {}+.",
                version
            ));
        }
        description
    }

    /// Schema attribute for a resource. `creatable` resources require
    /// [`Usage::RequiredOnCreate`] attributes and never compute
    /// [`Usage::Clearable`] ones.
    pub fn resource_attribute(&self, creatable: bool) -> Attribute {
        let flags = match self.usage {
            Usage::Identifier => AttributeFlags::required(),
            Usage::RequiredOnCreate if creatable => AttributeFlags::required(),
            Usage::Clearable if creatable => AttributeFlags::optional(),
            Usage::RequiredOnCreate | Usage::Optional | Usage::Clearable => {
                AttributeFlags::optional_computed()
            },
            Usage::Computed => AttributeFlags::computed(),
        };
        let mut attribute = Attribute::new(self.kind.attribute_type(), flags)
            .with_description(self.schema_description());
        attribute = match self.usage {
            Usage::Identifier => attribute.with_force_new(),
            Usage::Clearable if creatable => attribute,
            _ => attribute.with_use_state_for_unknown(),
        };
        if self.sensitive {
            attribute = attribute.sensitive();
        }
        attribute
    }

    /// Schema attribute for a data source: everything but the identifier is computed.
    pub fn data_source_attribute(&self) -> Attribute {
        let flags = match self.usage {
            Usage::Identifier => AttributeFlags::required(),
            _ => AttributeFlags::computed(),
        };
        let mut attribute = Attribute::new(self.kind.attribute_type(), flags)
            .with_description(self.schema_description());
        if self.sensitive {
            attribute = attribute.sensitive();
        }
        attribute
    }
}

/// A required action reported by the server after a change.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequiredAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub synopsis: String,
}

/// Notifications and required actions attached to a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    pub notifications: BTreeSet<String>,
    pub required_actions: BTreeSet<RequiredAction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMessages {
    #[serde(default)]
    notifications: Vec<String>,
    #[serde(default)]
    required_actions: Vec<RequiredAction>,
}

impl Messages {
    fn from_api(body: &Value) -> Result<Self, ProviderError> {
        let raw: ApiMessages = match body.get(MESSAGES_SCHEMA) {
            None | Some(Value::Null) => ApiMessages::default(),
            Some(messages) => match serde_json::from_value(messages.clone()) {
                Ok(raw) => raw,
                Err(e) => {
                    return Err(ProviderError::Api(crate::client::ApiError::Decode {
                        message: format!("invalid {} block: {}", MESSAGES_SCHEMA, e),
                    }));
                },
            },
        };
        Ok(Self {
            notifications: raw.notifications.into_iter().collect(),
            required_actions: raw.required_actions.into_iter().collect(),
        })
    }

    /// Schema attributes for the two message sets.
    pub fn schema_attributes() -> [(&'static str, Attribute); 2] {
        [
            (
                NOTIFICATIONS_ATTRIBUTE,
                Attribute::computed_string_set()
                    .with_description("Notifications returned by the Configuration API."),
            ),
            (
                REQUIRED_ACTIONS_ATTRIBUTE,
                Attribute::new(
                    AttributeType::set(AttributeType::object([
                        ("property", AttributeType::String),
                        ("type", AttributeType::String),
                        ("synopsis", AttributeType::String),
                    ])),
                    AttributeFlags::computed(),
                )
                .with_description("Required actions returned by the Configuration API."),
            ),
        ]
    }
}

/// Static description of a kind of configuration object.
#[derive(Debug)]
pub struct ObjectDefinition {
    /// Object name used in schema URNs, e.g. `backend`.
    pub object_name: &'static str,
    /// Human-readable name, e.g. `Backend`.
    pub display_name: &'static str,
    /// Collection path segment under `/config`, e.g. `backends`.
    pub collection: &'static str,
    pub identifier: AttrSpec,
    /// Every type the object can have.
    pub types: &'static [&'static str],
    pub attributes: &'static [AttrSpec],
}

impl ObjectDefinition {
    pub fn attribute(&self, name: &str) -> Option<&AttrSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The schema URN for objects of `object_type`.
    pub fn schema_urn(&self, object_type: &str) -> String {
        format!(
            "{}{}:{}",
            CONFIGURATION_SCHEMA_PREFIX, self.object_name, object_type
        )
    }

    /// The object type named by the `schemas` list of a response.
    pub fn type_from_schemas(&self, body: &Value) -> Option<String> {
        let prefix = format!("{}{}:", CONFIGURATION_SCHEMA_PREFIX, self.object_name);
        body.get("schemas")?
            .as_array()?
            .iter()
            .filter_map(Value::as_str)
            .find_map(|urn| urn.strip_prefix(&prefix))
            .map(str::to_string)
    }
}

/// One configuration object: identifier, type, attribute values and messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectModel {
    pub identifier: AttrValue,
    pub object_type: AttrValue,
    pub values: BTreeMap<&'static str, AttrValue>,
    /// `None` while unknown.
    pub messages: Option<Messages>,
}

impl ObjectModel {
    /// Read a model from state, plan or configuration JSON.
    pub fn from_state(definition: &ObjectDefinition, state: &Value) -> Result<Self, ProviderError> {
        let obj = match state {
            Value::Object(map) => map,
            other => {
                return Err(ProviderError::InvalidRequest(format!(
                    "Expected {} state object, got {}",
                    definition.display_name, other
                )));
            },
        };

        let identifier = AttrValue::from_state(
            &AttrKind::String,
            obj.get(definition.identifier.name),
            definition.identifier.name,
        )?;
        let object_type =
            AttrValue::from_state(&AttrKind::String, obj.get(TYPE_ATTRIBUTE), TYPE_ATTRIBUTE)?;

        let mut values = BTreeMap::new();
        for spec in definition.attributes {
            values.insert(
                spec.name,
                AttrValue::from_state(&spec.kind, obj.get(spec.name), spec.name)?,
            );
        }

        Ok(Self {
            identifier,
            object_type,
            values,
            messages: messages_from_state(obj)?,
        })
    }

    /// Read a model from a Configuration API response.
    pub fn from_api(definition: &ObjectDefinition, body: &Value) -> Result<Self, ProviderError> {
        let object_type = definition.type_from_schemas(body).ok_or_else(|| {
            ProviderError::Api(crate::client::ApiError::Decode {
                message: format!("response carries no {} schema URN", definition.display_name),
            })
        })?;

        let identifier = body
            .get(definition.identifier.api)
            .or_else(|| body.get("id"))
            .and_then(Value::as_str)
            .map(AttrValue::string)
            .unwrap_or(AttrValue::Null);

        let mut values = BTreeMap::new();
        for spec in definition.attributes {
            let value = if spec.applies_to(&object_type) {
                AttrValue::from_api(&spec.kind, body.get(spec.api), spec.api)?
            } else {
                spec.kind.empty_value()
            };
            values.insert(spec.name, value);
        }

        Ok(Self {
            identifier,
            object_type: AttrValue::String(object_type),
            values,
            messages: Some(Messages::from_api(body)?),
        })
    }

    pub fn get(&self, name: &str) -> &AttrValue {
        self.values.get(name).unwrap_or(&AttrValue::Null)
    }

    pub fn set(&mut self, name: &'static str, value: AttrValue) {
        self.values.insert(name, value);
    }

    /// The known identifier.
    pub fn identifier_str(&self) -> Option<&str> {
        self.identifier.as_str()
    }

    /// The known object type.
    pub fn type_str(&self) -> Option<&str> {
        self.object_type.as_str()
    }

    /// Render the model as state JSON, including the `id` placeholder.
    pub fn to_state(&self, definition: &ObjectDefinition) -> Value {
        let mut obj = Map::new();
        obj.insert(ID_ATTRIBUTE.to_string(), self.identifier.to_state());
        obj.insert(
            definition.identifier.name.to_string(),
            self.identifier.to_state(),
        );
        obj.insert(TYPE_ATTRIBUTE.to_string(), self.object_type.to_state());
        for spec in definition.attributes {
            obj.insert(spec.name.to_string(), self.get(spec.name).to_state());
        }

        match &self.messages {
            Some(messages) => {
                obj.insert(
                    NOTIFICATIONS_ATTRIBUTE.to_string(),
                    AttrValue::Set(messages.notifications.clone()).to_state(),
                );
                obj.insert(
                    REQUIRED_ACTIONS_ATTRIBUTE.to_string(),
                    serde_json::to_value(&messages.required_actions).unwrap_or_default(),
                );
            },
            None => {
                obj.insert(NOTIFICATIONS_ATTRIBUTE.to_string(), unknown());
                obj.insert(REQUIRED_ACTIONS_ATTRIBUTE.to_string(), unknown());
            },
        }
        Value::Object(obj)
    }

    /// Build the body of a POST request creating this object.
    pub fn to_create_body(&self, definition: &ObjectDefinition) -> Result<Value, ProviderError> {
        let object_type = self.type_str().ok_or_else(|| {
            ProviderError::Validation(format!(
                "The type of a new {} must be known",
                definition.display_name
            ))
        })?;
        let identifier = self.identifier_str().ok_or_else(|| {
            ProviderError::Validation(format!(
                "{} must be known to create a {}",
                definition.identifier.name, definition.display_name
            ))
        })?;

        let mut body = Map::new();
        body.insert(
            "schemas".to_string(),
            json!([definition.schema_urn(object_type)]),
        );
        body.insert(
            definition.identifier.api.to_string(),
            Value::String(identifier.to_string()),
        );

        for spec in definition.attributes {
            if spec.usage == Usage::Computed || !spec.applies_to(object_type) {
                continue;
            }
            let value = self.get(spec.name);
            if !value.is_known() {
                continue;
            }
            spec.check_enum(value)?;
            body.insert(spec.api.to_string(), value.to_api());
        }
        Ok(Value::Object(body))
    }
}

fn messages_from_state(obj: &Map<String, Value>) -> Result<Option<Messages>, ProviderError> {
    let notifications = obj.get(NOTIFICATIONS_ATTRIBUTE);
    let required_actions = obj.get(REQUIRED_ACTIONS_ATTRIBUTE);
    if notifications.is_some_and(is_unknown) || required_actions.is_some_and(is_unknown) {
        return Ok(None);
    }

    let notifications = match AttrValue::from_state(
        &AttrKind::StringSet,
        notifications,
        NOTIFICATIONS_ATTRIBUTE,
    )? {
        AttrValue::Set(values) => values,
        _ => BTreeSet::new(),
    };
    let required_actions = match required_actions {
        None | Some(Value::Null) => BTreeSet::new(),
        Some(value) => serde_json::from_value::<Vec<RequiredAction>>(value.clone())?
            .into_iter()
            .collect(),
    };

    Ok(Some(Messages {
        notifications,
        required_actions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UNKNOWN_VALUE;

    static ATTRIBUTES: &[AttrSpec] = &[
        AttrSpec::string("description", "description", "A description.").clearable(),
        AttrSpec::bool("enabled", "enabled", "Whether enabled.").required_on_create(),
        AttrSpec::string_set("base_dn", "baseDN", "Base DNs.").required_on_create(),
        AttrSpec::int64("index_entry_limit", "indexEntryLimit", "Entry limit.")
            .for_types(&["local-db"])
            .with_defaults(&[("local-db", DefaultValue::Int64(4000))]),
        AttrSpec::enumeration(
            "writability_mode",
            "writabilityMode",
            &["enabled", "disabled", "internal-only"],
            "Writability.",
        ),
        AttrSpec::string("trust_store_pin", "trustStorePin", "PIN.")
            .for_types(&["trust-store"])
            .sensitive(),
        AttrSpec::bool(
            "return_unavailable_for_untrusted_index",
            "returnUnavailableForUntrustedIndex",
            "Untrusted index handling.",
        )
        .for_types(&["local-db"])
        .since(ProductVersion::V9_2_0_0),
    ];

    static DEFINITION: ObjectDefinition = ObjectDefinition {
        object_name: "backend",
        display_name: "Backend",
        collection: "backends",
        identifier: AttrSpec::string("backend_id", "backendID", "Backend name.").identifier(),
        types: &["local-db", "trust-store"],
        attributes: ATTRIBUTES,
    };

    #[test]
    fn test_attr_value_from_state() {
        assert_eq!(
            AttrValue::from_state(&AttrKind::String, None, "x").unwrap(),
            AttrValue::Null
        );
        assert_eq!(
            AttrValue::from_state(&AttrKind::Bool, Some(&json!(UNKNOWN_VALUE)), "x").unwrap(),
            AttrValue::Unknown
        );
        let set = AttrKind::StringSet;
        assert_eq!(
            AttrValue::from_state(&set, Some(&json!(["b", "a", "b"])), "x").unwrap(),
            AttrValue::set(["a", "b"])
        );
        assert_eq!(
            AttrValue::from_state(&set, Some(&json!(["a", UNKNOWN_VALUE])), "x").unwrap(),
            AttrValue::Unknown
        );
        assert!(AttrValue::from_state(&AttrKind::Int64, Some(&json!("12")), "x").is_err());
    }

    #[test]
    fn test_attr_value_from_api() {
        assert_eq!(
            AttrValue::from_api(&AttrKind::Int64, Some(&json!("4000")), "x").unwrap(),
            AttrValue::Int64(4000)
        );
        assert_eq!(
            AttrValue::from_api(&AttrKind::Bool, Some(&json!("true")), "x").unwrap(),
            AttrValue::Bool(true)
        );
        assert_eq!(
            AttrValue::from_api(&AttrKind::StringSet, None, "x").unwrap(),
            AttrValue::empty_set()
        );
        assert_eq!(
            AttrValue::from_api(&AttrKind::String, None, "x").unwrap(),
            AttrValue::Null
        );
        assert!(AttrValue::from_api(&AttrKind::Bool, Some(&json!("maybe")), "x").is_err());
    }

    #[test]
    fn test_operation_value() {
        assert_eq!(
            AttrValue::Bool(true).operation_value(),
            Some("true".to_string())
        );
        assert_eq!(
            AttrValue::Int64(42).operation_value(),
            Some("42".to_string())
        );
        assert_eq!(AttrValue::set(["a"]).operation_value(), None);
    }

    #[test]
    fn test_spec_builders() {
        let spec = DEFINITION.attribute("index_entry_limit").unwrap();
        assert!(spec.applies_to("local-db"));
        assert!(!spec.applies_to("trust-store"));
        assert_eq!(spec.default_for("local-db"), Some(AttrValue::Int64(4000)));
        assert_eq!(spec.default_for("trust-store"), None);
        assert_eq!(spec.usage, Usage::Optional);

        let spec = DEFINITION
            .attribute("return_unavailable_for_untrusted_index")
            .unwrap();
        assert!(!spec.supported_by(ProductVersion::V9_1_0_2));
        assert!(spec.supported_by(ProductVersion::V9_3_0_0));
        assert!(spec
            .schema_description()
            .ends_with("Supported in PingDirectory product version 9.2.0.0+."));
        assert!(spec
            .schema_description()
            .starts_with("When the `type` attribute is set to `local-db`:"));
    }

    #[test]
    fn test_check_enum() {
        let spec = DEFINITION.attribute("writability_mode").unwrap();
        assert!(spec.check_enum(&AttrValue::string("enabled")).is_ok());
        let err = spec.check_enum(&AttrValue::string("never")).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
        assert!(err.to_string().contains("never"));
        assert!(spec.check_enum(&AttrValue::Null).is_ok());
    }

    #[test]
    fn test_resource_attribute_flags() {
        let enabled = DEFINITION.attribute("enabled").unwrap();
        assert!(enabled.resource_attribute(true).flags.required);
        let adopted = enabled.resource_attribute(false);
        assert!(adopted.flags.optional && adopted.flags.computed);
        assert!(adopted.use_state_for_unknown);

        let identifier = DEFINITION.identifier.resource_attribute(false);
        assert!(identifier.flags.required);
        assert!(identifier.force_new);

        let description = DEFINITION.attribute("description").unwrap();
        let created = description.resource_attribute(true);
        assert!(created.flags.optional && !created.flags.computed);
        assert!(!created.use_state_for_unknown);
        let adopted = description.resource_attribute(false);
        assert!(adopted.flags.optional && adopted.flags.computed);

        let pin = DEFINITION.attribute("trust_store_pin").unwrap();
        assert!(pin.resource_attribute(false).flags.sensitive);
        assert!(pin.data_source_attribute().flags.computed);
    }

    #[test]
    fn test_model_state_round_trip() {
        let state = json!({
            "id": "userRoot",
            "backend_id": "userRoot",
            "type": "local-db",
            "enabled": true,
            "base_dn": ["dc=example,dc=com"],
            "index_entry_limit": UNKNOWN_VALUE,
            "notifications": UNKNOWN_VALUE,
            "required_actions": UNKNOWN_VALUE
        });
        let model = ObjectModel::from_state(&DEFINITION, &state).unwrap();
        assert_eq!(model.identifier_str(), Some("userRoot"));
        assert_eq!(model.type_str(), Some("local-db"));
        assert_eq!(model.get("index_entry_limit"), &AttrValue::Unknown);
        assert_eq!(model.get("description"), &AttrValue::Null);
        assert!(model.messages.is_none());

        let rendered = model.to_state(&DEFINITION);
        assert_eq!(rendered["id"], "userRoot");
        assert_eq!(rendered["index_entry_limit"], UNKNOWN_VALUE);
        assert_eq!(rendered["description"], Value::Null);
        let reparsed = ObjectModel::from_state(&DEFINITION, &rendered).unwrap();
        assert_eq!(reparsed, model);
    }

    #[test]
    fn test_model_from_api() {
        let body = json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:backend:local-db"],
            "id": "userRoot",
            "backendID": "userRoot",
            "enabled": true,
            "baseDN": ["dc=example,dc=com"],
            "indexEntryLimit": 4000,
            "writabilityMode": "enabled",
            "trustStorePin": "ignored for local-db",
            MESSAGES_SCHEMA: {
                "notifications": ["restart required"],
                "requiredActions": [{
                    "property": "baseDN",
                    "type": "restart",
                    "synopsis": "Restart the backend"
                }]
            }
        });

        let model = ObjectModel::from_api(&DEFINITION, &body).unwrap();
        assert_eq!(model.type_str(), Some("local-db"));
        assert_eq!(model.get("index_entry_limit"), &AttrValue::Int64(4000));
        assert_eq!(model.get("trust_store_pin"), &AttrValue::Null);
        assert_eq!(model.get("description"), &AttrValue::Null);

        let messages = model.messages.as_ref().unwrap();
        assert!(messages.notifications.contains("restart required"));
        let action = messages.required_actions.iter().next().unwrap();
        assert_eq!(action.property.as_deref(), Some("baseDN"));
        assert_eq!(action.action_type, "restart");

        let state = model.to_state(&DEFINITION);
        assert_eq!(state["required_actions"][0]["type"], "restart");
        assert_eq!(state["notifications"], json!(["restart required"]));
    }

    #[test]
    fn test_model_from_api_requires_schema_urn() {
        let err = ObjectModel::from_api(&DEFINITION, &json!({"id": "userRoot"})).unwrap_err();
        assert!(err.to_string().contains("schema URN"));
    }

    #[test]
    fn test_model_from_api_rejects_malformed_messages() {
        let mut body = json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:backend:local-db"],
            "backendID": "userRoot"
        });
        body[MESSAGES_SCHEMA] = json!({"notifications": 5});

        let err = ObjectModel::from_api(&DEFINITION, &body).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Api(crate::client::ApiError::Decode { .. })
        ));
        assert!(err.to_string().contains(MESSAGES_SCHEMA));

        body[MESSAGES_SCHEMA] = Value::Null;
        let model = ObjectModel::from_api(&DEFINITION, &body).unwrap();
        assert_eq!(model.messages, Some(Messages::default()));
    }

    #[test]
    fn test_create_body() {
        let model = ObjectModel::from_state(
            &DEFINITION,
            &json!({
                "backend_id": "userRoot",
                "type": "local-db",
                "enabled": true,
                "base_dn": ["dc=example,dc=com"],
                "index_entry_limit": 4000,
                "description": UNKNOWN_VALUE,
                "trust_store_pin": "not for local-db"
            }),
        )
        .unwrap();

        let body = model.to_create_body(&DEFINITION).unwrap();
        assert_eq!(
            body,
            json!({
                "schemas": ["urn:pingidentity:schemas:configuration:2.0:backend:local-db"],
                "backendID": "userRoot",
                "enabled": true,
                "baseDN": ["dc=example,dc=com"],
                "indexEntryLimit": 4000
            })
        );
    }

    #[test]
    fn test_create_body_rejects_bad_enum() {
        let model = ObjectModel::from_state(
            &DEFINITION,
            &json!({"backend_id": "userRoot", "type": "local-db", "writability_mode": "sometimes"}),
        )
        .unwrap();
        let err = model.to_create_body(&DEFINITION).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }
}
