use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{Result, WaveError};

use super::{require_limit, require_non_empty, DataRow, Experiment, ExperimentType, Pagination, Tag};

/// Finds experiments carrying the given tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentTagSearchRequest {
    pub tags: Vec<String>,
    /// Match all tags when true, any tag when false.
    pub match_all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    pub skip: u32,
    pub limit: u32,
}

impl ExperimentTagSearchRequest {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            match_all: true,
            created_after: None,
            created_before: None,
            skip: 0,
            limit: 100,
        }
    }

    pub fn any_tag(mut self) -> Self {
        self.match_all = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_tags(&self.tags)?;
        require_limit(self.limit)
    }
}

/// Searches experiment descriptions within one experiment type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDescriptionSearchRequest {
    pub experiment_type_id: i64,
    pub search_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    pub skip: u32,
    pub limit: u32,
}

impl ExperimentDescriptionSearchRequest {
    pub fn new(experiment_type_id: i64, search_text: impl Into<String>) -> Self {
        Self {
            experiment_type_id,
            search_text: search_text.into(),
            created_after: None,
            created_before: None,
            skip: 0,
            limit: 100,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.experiment_type_id <= 0 {
            return Err(WaveError::validation(
                "experiment_type_id must be greater than zero",
            ));
        }
        require_non_empty(&self.search_text, "search text")?;
        require_limit(self.limit)
    }
}

/// Searches experiment types by description text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentTypeSearchRequest {
    pub search_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    pub skip: u32,
    pub limit: u32,
}

impl ExperimentTypeSearchRequest {
    pub fn new(search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            created_after: None,
            created_before: None,
            skip: 0,
            limit: 100,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_non_empty(&self.search_text, "search text")?;
        require_limit(self.limit)
    }
}

/// Searches tags by name or description text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagSearchRequest {
    pub search_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    pub skip: u32,
    pub limit: u32,
}

impl TagSearchRequest {
    pub fn new(search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            created_after: None,
            created_before: None,
            skip: 0,
            limit: 100,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_non_empty(&self.search_text, "search text")?;
        require_limit(self.limit)
    }
}

/// Combines text, tag, type and date criteria in one experiment search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvancedExperimentSearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub match_all_tags: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    pub skip: u32,
    pub limit: u32,
}

impl Default for AdvancedExperimentSearchRequest {
    fn default() -> Self {
        Self {
            search_text: None,
            tags: None,
            match_all_tags: true,
            experiment_type_id: None,
            created_after: None,
            created_before: None,
            skip: 0,
            limit: 100,
        }
    }
}

impl AdvancedExperimentSearchRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require_limit(self.limit)
    }
}

/// Fetches data rows across every experiment matching the given tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataByTagsRequest {
    pub tags: Vec<String>,
    /// Match all tags when true, any tag when false.
    pub match_all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    pub skip: u32,
    pub limit: u32,
}

impl DataByTagsRequest {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            match_all: true,
            created_after: None,
            created_before: None,
            skip: 0,
            limit: 500,
        }
    }

    pub fn any_tag(mut self) -> Self {
        self.match_all = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_tags(&self.tags)?;
        require_limit(self.limit)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSearchResponse {
    #[serde(default)]
    pub experiments: Vec<Experiment>,
    #[serde(default)]
    pub total: u64,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentTypeSearchResponse {
    #[serde(default)]
    pub experiment_types: Vec<ExperimentType>,
    #[serde(default)]
    pub total: u64,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagSearchResponse {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub total: u64,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataByTagsResponse {
    #[serde(default)]
    pub data: Vec<DataRow>,
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub total_experiments: u64,
    /// Metadata per experiment UUID.
    #[serde(default)]
    pub experiment_info: Map<String, JsonValue>,
    pub pagination: Pagination,
}

fn require_tags(tags: &[String]) -> Result<()> {
    if tags.is_empty() {
        return Err(WaveError::validation("at least one tag is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DataByTagsRequest, ExperimentTagSearchRequest};

    #[test]
    fn tag_search_needs_at_least_one_tag() {
        let request = ExperimentTagSearchRequest::new(Vec::<String>::new());
        assert!(request.validate().is_err());
        assert!(ExperimentTagSearchRequest::new(["pilot"]).validate().is_ok());
    }

    #[test]
    fn data_by_tags_defaults_to_wide_limit() {
        let request = DataByTagsRequest::new(["pilot"]);
        assert_eq!(request.limit, 500);
        assert!(request.match_all);
        assert!(!request.any_tag().match_all);
    }

    #[test]
    fn optional_dates_are_omitted_from_the_body() {
        let body = serde_json::to_value(ExperimentTagSearchRequest::new(["pilot"]))
            .expect("must serialize");
        assert!(body.get("created_after").is_none());
        assert_eq!(body["match_all"], true);
        assert_eq!(body["limit"], 100);
    }
}
