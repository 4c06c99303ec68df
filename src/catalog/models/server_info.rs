//! # Server Info Model
//!
//! Banner returned by the backend root path, used to check connectivity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Backend self-description served at `GET /`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
    /// Named entry points, e.g. `apiInterfaces -> /api/interfaces`
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}
