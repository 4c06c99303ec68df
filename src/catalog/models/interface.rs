//! # Interface Model
//!
//! A catalog entry describing one remote API: its name, protocol family,
//! base URL and authentication scheme. Identifiers and timestamps are
//! assigned by the backend; the client never invents them.

use super::endpoint::Endpoint;
use serde::{Deserialize, Serialize};

/// Protocol family used when a form starts blank or the source has none
pub const DEFAULT_INTERFACE_TYPE: &str = "REST";

/// Authentication scheme sentinel meaning "no authentication"
pub const DEFAULT_AUTH_TYPE: &str = "NONE";

/// Protocol families offered by the form
pub const INTERFACE_TYPES: [&str; 3] = ["REST", "SOAP", "GraphQL"];

/// Authentication schemes offered by the form
pub const AUTH_TYPES: [&str; 4] = ["NONE", "API_KEY", "Bearer", "OAuth"];

/// A cataloged external API definition
///
/// Field names on the wire follow the backend entity (`base_url`,
/// `auth_type`, `is_active`, ...). Camel-case spellings are accepted on
/// read so that a backend with a different serializer still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// Server-assigned identifier, `None` until persisted
    #[serde(default)]
    pub id: Option<i64>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Protocol family tag (REST, SOAP, GraphQL, ...)
    #[serde(rename = "type", default)]
    pub interface_type: Option<String>,

    /// Root URL all endpoints are relative to
    #[serde(default, alias = "baseUrl")]
    pub base_url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Authentication scheme tag
    #[serde(default, alias = "authType")]
    pub auth_type: Option<String>,

    #[serde(default, alias = "isActive")]
    pub is_active: Option<bool>,

    /// Server timestamp, opaque to the client and never written back
    #[serde(default, alias = "createdAt", skip_serializing)]
    pub created_at: Option<String>,

    /// Server timestamp, opaque to the client and never written back
    #[serde(default, alias = "updatedAt", skip_serializing)]
    pub updated_at: Option<String>,

    /// Endpoints, only present when the backend chooses to embed them
    #[serde(default, skip_serializing)]
    pub endpoints: Option<Vec<Endpoint>>,
}

impl Interface {
    /// Create an unsaved interface with the required fields set
    pub fn new(name: &str, interface_type: &str, base_url: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            interface_type: Some(interface_type.to_string()),
            base_url: Some(base_url.to_string()),
            auth_type: Some(DEFAULT_AUTH_TYPE.to_string()),
            is_active: Some(true),
            ..Self::default()
        }
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Builder-style identifier setter, for data that came from the server
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Name for display, empty when the backend sent none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Whether the interface is active; an absent flag counts as active
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    /// Compare the user-editable fields, ignoring id and server timestamps
    pub fn same_content(&self, other: &Interface) -> bool {
        self.name == other.name
            && self.interface_type == other.interface_type
            && self.base_url == other.base_url
            && self.description == other.description
            && self.auth_type == other.auth_type
            && self.is_active == other.is_active
    }
}
