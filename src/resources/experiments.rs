use crate::executor::{Executor, Request};
use crate::models::{
    DeleteResponse, Experiment, ExperimentColumns, ExperimentCreate, ExperimentFilter,
    ExperimentUpdate,
};
use crate::Result;

use super::{decode, query_string, require_id, to_body};

/// Facade for `/api/v1/experiments`.
#[derive(Clone, Debug)]
pub struct Experiments {
    executor: Executor,
}

impl Experiments {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Registers a new experiment of an existing type.
    pub async fn create(&self, experiment: ExperimentCreate) -> Result<Experiment> {
        experiment.validate()?;
        let response = self
            .executor
            .execute(Request::post("/api/v1/experiments/", to_body(&experiment)?))
            .await?;
        decode(response)
    }

    /// Fetches one experiment by UUID.
    pub async fn get(&self, experiment_uuid: &str) -> Result<Experiment> {
        let uuid = require_id(experiment_uuid, "experiment uuid")?;
        let response = self
            .executor
            .execute(Request::get(format!("/api/v1/experiments/{uuid}")))
            .await?;
        decode(response)
    }

    /// Lists experiments matching the filter.
    pub async fn list(&self, filter: &ExperimentFilter) -> Result<Vec<Experiment>> {
        let mut pairs = vec![
            ("skip", filter.skip.to_string()),
            ("limit", filter.limit.to_string()),
        ];
        if let Some(type_id) = filter.experiment_type_id {
            pairs.push(("experiment_type_id", type_id.to_string()));
        }
        for tag in &filter.tags {
            pairs.push(("tags", tag.clone()));
        }
        let query = query_string(&pairs);
        let response = self
            .executor
            .execute(Request::get(format!("/api/v1/experiments/{query}")))
            .await?;
        decode(response)
    }

    /// Lists experiments carrying every one of the given tags.
    pub async fn by_tags<I, S>(&self, tags: I) -> Result<Vec<Experiment>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = ExperimentFilter {
            tags: tags.into_iter().map(Into::into).collect(),
            ..ExperimentFilter::default()
        };
        self.list(&filter).await
    }

    /// Lists experiments of one type.
    pub async fn by_type(&self, experiment_type_id: i64) -> Result<Vec<Experiment>> {
        let filter = ExperimentFilter {
            experiment_type_id: Some(experiment_type_id),
            ..ExperimentFilter::default()
        };
        self.list(&filter).await
    }

    /// Applies a partial update; unset fields keep their current value.
    pub async fn update(
        &self,
        experiment_uuid: &str,
        update: ExperimentUpdate,
    ) -> Result<Experiment> {
        let uuid = require_id(experiment_uuid, "experiment uuid")?;
        update.validate()?;
        let response = self
            .executor
            .execute(Request::put(
                format!("/api/v1/experiments/{uuid}"),
                to_body(&update)?,
            ))
            .await?;
        decode(response)
    }

    /// Deletes an experiment and its collected data.
    pub async fn delete(&self, experiment_uuid: &str) -> Result<DeleteResponse> {
        let uuid = require_id(experiment_uuid, "experiment uuid")?;
        let response = self
            .executor
            .execute(Request::delete(format!("/api/v1/experiments/{uuid}")))
            .await?;
        decode(response)
    }

    /// Describes the storage columns backing one experiment.
    pub async fn columns(&self, experiment_uuid: &str) -> Result<ExperimentColumns> {
        let uuid = require_id(experiment_uuid, "experiment uuid")?;
        let response = self
            .executor
            .execute(Request::get(format!("/api/v1/experiments/{uuid}/columns")))
            .await?;
        decode(response)
    }
}
