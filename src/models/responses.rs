use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Pagination block echoed by list and search endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCountResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub participant_id: Option<String>,
    pub experiment_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDeleteResponse {
    pub message: String,
    pub deleted_id: i64,
    pub experiment_id: String,
}

/// Message-only acknowledgement returned by delete endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Version report from `GET /version`, including the server's verdict on
/// whether this client is compatible.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub api_version: String,
    #[serde(default)]
    pub client_version: Option<String>,
    #[serde(default)]
    pub compatible: Option<bool>,
    pub compatibility_rule: String,
    #[serde(default)]
    pub warning: Option<String>,
}

/// One column of an experiment's storage table, as reported by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub column_name: String,
    /// Backend type name, e.g. `integer` or `character varying`.
    pub column_type: String,
    pub is_nullable: bool,
    #[serde(default)]
    pub default_value: Option<JsonValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentColumns {
    pub columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub experiment_uuid: Option<String>,
    #[serde(default)]
    pub experiment_type: Option<String>,
}

/// Liveness report from `GET /health`. Extra fields the backend adds over
/// time land in `details` instead of failing the decode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub details: Map<String, JsonValue>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}
