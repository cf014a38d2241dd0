use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

use super::{require_max_chars, require_non_empty};

/// Label attached to experiments for grouping and retrieval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TagCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_non_empty(&self.name, "tag name")?;
        require_max_chars(&self.name, "tag name", 100)
    }
}

/// Payload for updating a tag. Unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TagUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TagUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_non_empty(name, "tag name")?;
            require_max_chars(name, "tag name", 100)?;
        }
        Ok(())
    }
}
