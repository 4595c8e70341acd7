//! OVH API models
//!
//! These models match the OVHcloud API v1 schemas for `/me`, `/dedicated/server`
//! and `/auth`. Fields the tool never reads are left out; every field is
//! optional because the API omits attributes a given offer does not have.

use serde::{Deserialize, Serialize};

/// Boot type reported when the boot response has no recognizable shape
pub const UNKNOWN_BOOT_TYPE: &str = "unknown";

/// Dedicated server (`GET /dedicated/server/{serviceName}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DedicatedServer {
    pub name: Option<String>,
    pub server_id: Option<u64>,
    pub commercial_range: Option<String>,
    pub datacenter: Option<String>,
    /// Operational state: "ok", "hacked", "hackedBlocked", "error", ...
    pub state: Option<String>,
    pub boot_id: Option<u64>,
    pub boot_script: Option<String>,
    pub ip: Option<String>,
    pub reverse: Option<String>,
    pub os: Option<String>,
}

/// Boot configuration of a server, normalized from `GET /dedicated/server/{serviceName}/boot`
///
/// Depending on the API version and offer, that endpoint answers either with a
/// single record or with a list. Only the boot type is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootInfo {
    pub boot_type: String,
}

impl BootInfo {
    /// Normalize any response shape to one boot type
    ///
    /// - `{"bootType": "network"}` gives `network`
    /// - `[{"bootType": "network"}, ...]` gives the first record's type
    /// - anything else (empty list, list of ids, missing field) gives [`UNKNOWN_BOOT_TYPE`]
    pub fn from_response(value: &serde_json::Value) -> Self {
        let record = match value {
            serde_json::Value::Array(items) => items.first(),
            serde_json::Value::Object(_) => Some(value),
            _ => None,
        };

        let boot_type = record
            .and_then(|r| r.get("bootType"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or(UNKNOWN_BOOT_TYPE)
            .to_string();

        Self { boot_type }
    }
}

/// Asynchronous server task (`POST /dedicated/server/{serviceName}/reboot`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    #[serde(rename = "taskId", alias = "id")]
    pub id: Option<u64>,
    pub function: Option<String>,
    pub status: Option<String>,
    pub comment: Option<String>,
    pub start_date: Option<String>,
    pub done_date: Option<String>,
}

/// Account details (`GET /me`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub nichandle: Option<String>,
    pub firstname: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
}

/// HTTP method of an access rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for AccessMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let method = match self {
            AccessMethod::Get => "GET",
            AccessMethod::Post => "POST",
            AccessMethod::Put => "PUT",
            AccessMethod::Delete => "DELETE",
        };
        f.write_str(method)
    }
}

/// One (method, path pattern) pair granted to a consumer key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub method: AccessMethod,
    pub path: String,
}

impl AccessRule {
    /// Build a rule from a method and a path pattern (`*` matches one segment or more)
    pub fn new(method: AccessMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

/// Response to `POST /auth/credential`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    /// URL the account owner must visit to activate the key
    pub validation_url: String,
    /// The new consumer key, unusable until validated
    pub consumer_key: String,
    #[serde(default)]
    pub state: Option<String>,
}
