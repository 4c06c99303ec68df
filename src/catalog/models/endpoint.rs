//! # Endpoint Model
//!
//! One HTTP method and path exposed by an interface. The owning interface is
//! referenced by id only; endpoints are fetched separately from their parent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single endpoint of a cataloged interface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default)]
    pub id: Option<i64>,

    /// Id of the owning interface
    ///
    /// The backend may serialize the parent as a bare id or as the whole
    /// parent object; both decode to the id.
    #[serde(
        rename = "apiInterface",
        alias = "parentId",
        default,
        deserialize_with = "parent_reference"
    )]
    pub parent_id: Option<i64>,

    #[serde(default)]
    pub http_method: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Example request body, JSON kept as text
    #[serde(default)]
    pub request_example: Option<String>,

    /// Example response body, JSON kept as text
    #[serde(default)]
    pub response_example: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Endpoint {
    /// Create an unsaved endpoint for the given parent
    pub fn new(parent_id: i64, http_method: &str, path: &str) -> Self {
        Self {
            parent_id: Some(parent_id),
            http_method: Some(http_method.to_string()),
            path: Some(path.to_string()),
            is_active: Some(true),
            ..Self::default()
        }
    }

    /// Value shown in the "method" column
    pub fn method_label(&self) -> &str {
        self.http_method.as_deref().unwrap_or("-")
    }

    /// Value shown in the "path" column
    pub fn path_label(&self) -> &str {
        self.path.as_deref().unwrap_or("-")
    }

    /// Value shown in the "status" column
    pub fn status_label(&self) -> &str {
        match self.is_active {
            Some(false) => "Inactive",
            _ => "Active",
        }
    }
}

fn parent_reference<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::Object(parent)) => parent.get("id").and_then(Value::as_i64),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_should_decode_camel_case_fields() {
        let value = json!({
            "id": 10,
            "apiInterface": 1,
            "httpMethod": "GET",
            "path": "/fact",
            "description": "Random fact",
            "requestExample": null,
            "responseExample": "{\"fact\": \"Cats sleep a lot\"}",
            "isActive": true,
            "createdAt": "2025-11-03T15:09:16",
            "updatedAt": "2025-11-03T15:09:16"
        });

        let endpoint: Endpoint = serde_json::from_value(value).unwrap();

        assert_eq!(endpoint.id, Some(10));
        assert_eq!(endpoint.parent_id, Some(1));
        assert_eq!(endpoint.method_label(), "GET");
        assert_eq!(
            endpoint.response_example.as_deref(),
            Some("{\"fact\": \"Cats sleep a lot\"}")
        );
    }

    #[test]
    fn endpoint_should_take_parent_id_from_embedded_object() {
        let value = json!({
            "id": 11,
            "apiInterface": { "id": 4, "name": "Weather" },
            "httpMethod": "POST",
            "path": "/forecast"
        });

        let endpoint: Endpoint = serde_json::from_value(value).unwrap();

        assert_eq!(endpoint.parent_id, Some(4));
    }

    #[test]
    fn endpoint_should_accept_parent_id_alias_and_missing_parent() {
        let aliased: Endpoint = serde_json::from_value(json!({ "parentId": 7 })).unwrap();
        let missing: Endpoint = serde_json::from_value(json!({ "path": "/x" })).unwrap();

        assert_eq!(aliased.parent_id, Some(7));
        assert_eq!(missing.parent_id, None);
    }

    #[test]
    fn labels_should_fall_back_for_missing_values() {
        let endpoint = Endpoint::default();
        assert_eq!(endpoint.method_label(), "-");
        assert_eq!(endpoint.path_label(), "-");
        assert_eq!(endpoint.status_label(), "Active");

        let inactive = Endpoint {
            is_active: Some(false),
            ..Endpoint::new(1, "DELETE", "/items")
        };
        assert_eq!(inactive.status_label(), "Inactive");
    }
}
