use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::Result;

use super::{require_limit, require_max_chars, require_non_empty};

/// One collected data row: fixed bookkeeping columns plus the experiment
/// type's custom fields, which land in `values`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub id: i64,
    pub experiment_uuid: String,
    pub participant_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub values: Map<String, JsonValue>,
}

impl DataRow {
    /// Returns a custom field by name.
    pub fn value(&self, name: &str) -> Option<&JsonValue> {
        self.values.get(name)
    }

    pub fn value_i64(&self, name: &str) -> Option<i64> {
        self.value(name)?.as_i64()
    }

    pub fn value_f64(&self, name: &str) -> Option<f64> {
        self.value(name)?.as_f64()
    }

    pub fn value_str(&self, name: &str) -> Option<&str> {
        self.value(name)?.as_str()
    }

    pub fn value_bool(&self, name: &str) -> Option<bool> {
        self.value(name)?.as_bool()
    }
}

/// Payload for creating a data row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataRowCreate {
    pub participant_id: String,
    pub data: Map<String, JsonValue>,
}

impl DataRowCreate {
    pub fn new(participant_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            data: Map::new(),
        }
    }

    /// Adds one custom field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_non_empty(&self.participant_id, "participant_id")?;
        require_max_chars(&self.participant_id, "participant_id", 100)
    }
}

/// Payload for updating a data row. Unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRowUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, JsonValue>>,
}

impl DataRowUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(participant_id) = &self.participant_id {
            require_non_empty(participant_id, "participant_id")?;
            require_max_chars(participant_id, "participant_id", 100)?;
        }
        Ok(())
    }
}

/// Query-string filters for fetching data rows.
#[derive(Clone, Debug, PartialEq)]
pub struct DataFilter {
    pub participant_id: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for DataFilter {
    fn default() -> Self {
        Self {
            participant_id: None,
            created_after: None,
            created_before: None,
            limit: 100,
            offset: 0,
        }
    }
}

impl DataFilter {
    pub fn participant(mut self, participant_id: impl Into<String>) -> Self {
        self.participant_id = Some(participant_id.into());
        self
    }
}

/// Body for the advanced data query endpoint, with custom field filters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,
    #[serde(default)]
    pub filters: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for DataQuery {
    fn default() -> Self {
        Self {
            participant_id: None,
            filters: Map::new(),
            created_after: None,
            created_before: None,
            limit: 100,
            offset: 0,
        }
    }
}

impl DataQuery {
    /// Adds one custom field filter.
    pub fn filter(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(participant_id) = &self.participant_id {
            require_max_chars(participant_id, "participant_id", 100)?;
        }
        require_limit(self.limit)
    }
}
