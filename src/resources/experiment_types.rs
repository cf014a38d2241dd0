use crate::executor::{Executor, Request};
use crate::models::{
    DeleteResponse, ExperimentColumns, ExperimentType, ExperimentTypeCreate, ExperimentTypeUpdate,
};
use crate::Result;

use super::{decode, query_string, require_id, to_body};

/// Facade for `/api/v1/experiment-types`.
#[derive(Clone, Debug)]
pub struct ExperimentTypes {
    executor: Executor,
}

impl ExperimentTypes {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Registers a new experiment type with its column schema.
    pub async fn create(&self, experiment_type: ExperimentTypeCreate) -> Result<ExperimentType> {
        experiment_type.validate()?;
        let response = self
            .executor
            .execute(Request::post(
                "/api/v1/experiment-types/",
                to_body(&experiment_type)?,
            ))
            .await?;
        decode(response)
    }

    /// Fetches one experiment type by id.
    pub async fn get(&self, experiment_type_id: i64) -> Result<ExperimentType> {
        let response = self
            .executor
            .execute(Request::get(format!(
                "/api/v1/experiment-types/{experiment_type_id}"
            )))
            .await?;
        decode(response)
    }

    /// Lists experiment types in insertion order.
    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<ExperimentType>> {
        let query = query_string(&[("skip", skip.to_string()), ("limit", limit.to_string())]);
        let response = self
            .executor
            .execute(Request::get(format!("/api/v1/experiment-types/{query}")))
            .await?;
        decode(response)
    }

    /// Applies a partial update; unset fields keep their current value.
    pub async fn update(
        &self,
        experiment_type_id: i64,
        update: ExperimentTypeUpdate,
    ) -> Result<ExperimentType> {
        let response = self
            .executor
            .execute(Request::put(
                format!("/api/v1/experiment-types/{experiment_type_id}"),
                to_body(&update)?,
            ))
            .await?;
        decode(response)
    }

    /// Deletes an experiment type.
    pub async fn delete(&self, experiment_type_id: i64) -> Result<DeleteResponse> {
        let response = self
            .executor
            .execute(Request::delete(format!(
                "/api/v1/experiment-types/{experiment_type_id}"
            )))
            .await?;
        decode(response)
    }

    /// Describes the storage columns a type provisions, looked up by name.
    pub async fn columns_by_name(&self, experiment_type_name: &str) -> Result<ExperimentColumns> {
        let name = require_id(experiment_type_name, "experiment type name")?;
        let response = self
            .executor
            .execute(Request::get(format!(
                "/api/v1/experiment-types/name/{name}/columns"
            )))
            .await?;
        decode(response)
    }
}
