use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{Result, WaveError};

use super::{require_non_empty, ExperimentType};

const MAX_TAGS: usize = 10;

/// Experiment as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub uuid: String,
    pub experiment_type_id: i64,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub additional_data: Map<String, JsonValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Nested type record; some endpoints omit it.
    #[serde(default)]
    pub experiment_type: Option<ExperimentType>,
}

/// Payload for creating an experiment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentCreate {
    pub experiment_type_id: i64,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub additional_data: Map<String, JsonValue>,
}

impl ExperimentCreate {
    pub fn new(experiment_type_id: i64, description: impl Into<String>) -> Self {
        Self {
            experiment_type_id,
            description: description.into(),
            tags: Vec::new(),
            additional_data: Map::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.additional_data.insert(key.into(), value);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.experiment_type_id <= 0 {
            return Err(WaveError::validation(
                "experiment_type_id must be greater than zero",
            ));
        }
        require_non_empty(&self.description, "experiment description")?;
        validate_tags(&self.tags)
    }
}

/// Payload for updating an experiment. Unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Map<String, JsonValue>>,
}

impl ExperimentUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        Ok(())
    }
}

/// Filters for listing experiments.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentFilter {
    pub skip: u32,
    pub limit: u32,
    pub experiment_type_id: Option<i64>,
    pub tags: Vec<String>,
}

impl Default for ExperimentFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            experiment_type_id: None,
            tags: Vec::new(),
        }
    }
}

fn validate_tags(tags: &[String]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        return Err(WaveError::validation(format!(
            "at most {MAX_TAGS} tags are allowed, got {}",
            tags.len()
        )));
    }
    Ok(())
}
