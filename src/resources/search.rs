use crate::executor::{Executor, Request};
use crate::models::{
    AdvancedExperimentSearchRequest, DataByTagsRequest, DataByTagsResponse,
    ExperimentDescriptionSearchRequest, ExperimentSearchResponse, ExperimentTagSearchRequest,
    ExperimentTypeSearchRequest, ExperimentTypeSearchResponse, TagSearchRequest,
    TagSearchResponse,
};
use crate::table::DataTable;
use crate::Result;

use super::{decode, to_body};

/// Facade for `/api/v1/search`.
#[derive(Clone, Debug)]
pub struct Search {
    executor: Executor,
}

impl Search {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Finds experiments by tag membership.
    pub async fn experiments_by_tags(
        &self,
        request: &ExperimentTagSearchRequest,
    ) -> Result<ExperimentSearchResponse> {
        request.validate()?;
        let response = self
            .executor
            .execute(Request::post(
                "/api/v1/search/experiments/by-tags",
                to_body(request)?,
            ))
            .await?;
        decode(response)
    }

    /// Searches experiment descriptions within one type.
    pub async fn experiments_by_description_and_type(
        &self,
        request: &ExperimentDescriptionSearchRequest,
    ) -> Result<ExperimentSearchResponse> {
        request.validate()?;
        let response = self
            .executor
            .execute(Request::post(
                "/api/v1/search/experiments/by-description-and-type",
                to_body(request)?,
            ))
            .await?;
        decode(response)
    }

    /// Combines text, tag, type and date criteria in one search.
    pub async fn experiments_advanced(
        &self,
        request: &AdvancedExperimentSearchRequest,
    ) -> Result<ExperimentSearchResponse> {
        request.validate()?;
        let response = self
            .executor
            .execute(Request::post(
                "/api/v1/search/experiments/advanced",
                to_body(request)?,
            ))
            .await?;
        decode(response)
    }

    /// Searches experiment types by description text.
    pub async fn experiment_types_by_description(
        &self,
        request: &ExperimentTypeSearchRequest,
    ) -> Result<ExperimentTypeSearchResponse> {
        request.validate()?;
        let response = self
            .executor
            .execute(Request::post(
                "/api/v1/search/experiment-types/by-description",
                to_body(request)?,
            ))
            .await?;
        decode(response)
    }

    /// Searches tags by name or description text.
    pub async fn tags_by_name(&self, request: &TagSearchRequest) -> Result<TagSearchResponse> {
        request.validate()?;
        let response = self
            .executor
            .execute(Request::post("/api/v1/search/tags/by-name", to_body(request)?))
            .await?;
        decode(response)
    }

    /// Fetches data rows across every experiment matching the tags.
    pub async fn data_by_tags(&self, request: &DataByTagsRequest) -> Result<DataByTagsResponse> {
        request.validate()?;
        let response = self
            .executor
            .execute(Request::post(
                "/api/v1/search/experiment-data/by-tags",
                to_body(request)?,
            ))
            .await?;
        decode(response)
    }

    /// Same as [`Self::data_by_tags`], reshaped into a [`DataTable`].
    pub async fn data_table_by_tags(&self, request: &DataByTagsRequest) -> Result<DataTable> {
        let response = self.data_by_tags(request).await?;
        Ok(DataTable::from_rows(&response.data))
    }
}
