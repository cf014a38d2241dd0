use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{Result, WaveError};

use super::{require_max_chars, require_non_empty};

/// Column names the backend manages itself.
const RESERVED_COLUMNS: [&str; 5] = [
    "id",
    "experiment_uuid",
    "participant_id",
    "created_at",
    "updated_at",
];

const SUPPORTED_TYPES: [&str; 7] = [
    "INTEGER", "FLOAT", "STRING", "TEXT", "BOOLEAN", "DATETIME", "JSON",
];

/// One column in an experiment type schema: either a bare type name or an
/// object with a `type` key plus extra constraints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnDefinition {
    Type(String),
    Detailed(serde_json::Map<String, JsonValue>),
}

impl ColumnDefinition {
    fn type_name(&self) -> Option<&str> {
        match self {
            Self::Type(name) => Some(name),
            Self::Detailed(fields) => fields.get("type").and_then(JsonValue::as_str),
        }
    }
}

impl From<&str> for ColumnDefinition {
    fn from(name: &str) -> Self {
        Self::Type(name.to_owned())
    }
}

/// Experiment type as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentType {
    pub id: i64,
    pub name: String,
    pub table_name: String,
    #[serde(default)]
    pub schema_definition: JsonValue,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an experiment type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentTypeCreate {
    pub name: String,
    pub table_name: String,
    #[serde(default)]
    pub schema_definition: BTreeMap<String, ColumnDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExperimentTypeCreate {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            schema_definition: BTreeMap::new(),
            description: None,
        }
    }

    /// Adds a column to the schema.
    pub fn column(mut self, name: impl Into<String>, definition: impl Into<ColumnDefinition>) -> Self {
        self.schema_definition.insert(name.into(), definition.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_non_empty(&self.name, "experiment type name")?;
        require_max_chars(&self.name, "experiment type name", 100)?;
        require_non_empty(&self.table_name, "table name")?;
        require_max_chars(&self.table_name, "table name", 100)?;
        validate_schema(&self.schema_definition)
    }
}

/// Payload for updating an experiment type. Unset fields are left
/// unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentTypeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_definition: Option<BTreeMap<String, ColumnDefinition>>,
}

impl ExperimentTypeUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_non_empty(name, "experiment type name")?;
            require_max_chars(name, "experiment type name", 100)?;
        }
        Ok(())
    }
}

fn validate_schema(schema: &BTreeMap<String, ColumnDefinition>) -> Result<()> {
    for (column, definition) in schema {
        let lowered = column.to_lowercase();
        if RESERVED_COLUMNS.contains(&lowered.as_str()) {
            return Err(WaveError::validation(format!(
                "column name '{column}' is reserved"
            )));
        }

        let Some(type_name) = definition.type_name() else {
            return Err(WaveError::validation(format!(
                "column '{column}' must declare a type"
            )));
        };
        let uppered = type_name.to_uppercase();
        if !SUPPORTED_TYPES.contains(&uppered.as_str()) {
            return Err(WaveError::validation(format!(
                "unsupported column type '{type_name}' for column '{column}'"
            )));
        }
    }
    Ok(())
}
