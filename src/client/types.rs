use serde::{Deserialize, Serialize};

/// Schema URN prefix of configuration objects; the object kind and type follow.
pub const CONFIGURATION_SCHEMA_PREFIX: &str = "urn:pingidentity:schemas:configuration:2.0:";

/// Key under which the server attaches notifications and required actions.
pub const MESSAGES_SCHEMA: &str = "urn:pingidentity:schemas:configuration:messages:2.0";

/// The kind of a single attribute mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Add values to a multi-valued property.
    Add,
    /// Remove a property, or specific values of a multi-valued property.
    Remove,
    /// Replace the value of a property.
    Replace,
}

/// A single named attribute mutation sent in a PATCH request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub op: OperationKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl Operation {
    /// Create an operation without a value.
    pub fn new(op: OperationKind, path: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
            value: None,
            values: None,
        }
    }

    /// Create a `replace` operation carrying a single value.
    pub fn replace(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(OperationKind::Replace, path).with_value(value)
    }

    /// Create a `remove` operation for the whole property.
    pub fn remove(path: impl Into<String>) -> Self {
        Self::new(OperationKind::Remove, path)
    }

    /// Set the single value of this operation.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the values of this operation.
    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = Some(values);
        self
    }
}

/// Body of a PATCH request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub operations: Vec<Operation>,
}

/// Body of a collection listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListResponse {
    #[serde(rename = "totalResults", default)]
    pub total_results: u64,
    #[serde(rename = "Resources", default)]
    pub resources: Vec<serde_json::Value>,
}

impl ListResponse {
    /// The `id` of every listed object.
    pub fn ids(&self) -> Vec<String> {
        self.resources
            .iter()
            .filter_map(|r| r.get("id").and_then(|id| id.as_str()))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_serialization() {
        let op = Operation::replace("enabled", "true");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "replace", "path": "enabled", "value": "true"})
        );

        let op = Operation::new(OperationKind::Add, "baseDN")
            .with_values(vec!["dc=example,dc=com".to_string()]);
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "add", "path": "baseDN", "values": ["dc=example,dc=com"]})
        );

        let op = Operation::remove("description");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "remove", "path": "description"})
        );
    }

    #[test]
    fn test_list_response_ids() {
        let list: ListResponse = serde_json::from_value(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:messages:2.0:ListResponse"],
            "totalResults": 2,
            "Resources": [{"id": "userRoot"}, {"id": "changelog"}, {"noId": true}]
        }))
        .unwrap();

        assert_eq!(list.total_results, 2);
        assert_eq!(list.ids(), vec!["userRoot", "changelog"]);
    }
}
