use crate::executor::{Executor, Request};
use crate::models::{
    DataCountResponse, DataDeleteResponse, DataFilter, DataQuery, DataRow, DataRowCreate,
    DataRowUpdate, ExperimentColumns,
};
use crate::table::DataTable;
use crate::Result;

use super::{decode, query_string, require_id, to_body};

/// Facade for `/api/v1/experiment-data`.
///
/// Every method takes the experiment UUID first; rows live in the
/// per-experiment table the experiment type provisioned.
#[derive(Clone, Debug)]
pub struct ExperimentData {
    executor: Executor,
}

impl ExperimentData {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Appends one data row to an experiment.
    pub async fn create(&self, experiment_id: &str, row: DataRowCreate) -> Result<DataRow> {
        let id = require_id(experiment_id, "experiment id")?;
        row.validate()?;
        let response = self
            .executor
            .execute(Request::post(
                format!("/api/v1/experiment-data/{id}/data/"),
                to_body(&row)?,
            ))
            .await?;
        decode(response)
    }

    /// Appends rows one by one, stopping at the first failure.
    pub async fn create_batch(
        &self,
        experiment_id: &str,
        rows: Vec<DataRowCreate>,
    ) -> Result<Vec<DataRow>> {
        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            created.push(self.create(experiment_id, row).await?);
        }
        Ok(created)
    }

    /// Fetches one page of data rows matching the filter.
    pub async fn rows(&self, experiment_id: &str, filter: &DataFilter) -> Result<Vec<DataRow>> {
        let id = require_id(experiment_id, "experiment id")?;
        let mut pairs = vec![
            ("limit", filter.limit.to_string()),
            ("offset", filter.offset.to_string()),
        ];
        if let Some(participant) = &filter.participant_id {
            pairs.push(("participant_id", participant.clone()));
        }
        if let Some(after) = filter.created_after {
            pairs.push(("created_after", after.to_rfc3339()));
        }
        if let Some(before) = filter.created_before {
            pairs.push(("created_before", before.to_rfc3339()));
        }
        let query = query_string(&pairs);
        let response = self
            .executor
            .execute(Request::get(format!(
                "/api/v1/experiment-data/{id}/data/{query}"
            )))
            .await?;
        decode(response)
    }

    /// Fetches one page of data rows as a [`DataTable`].
    pub async fn table(&self, experiment_id: &str, filter: &DataFilter) -> Result<DataTable> {
        let rows = self.rows(experiment_id, filter).await?;
        Ok(DataTable::from_rows(&rows))
    }

    /// Fetches every data row, paging through the collection.
    pub async fn all_rows(&self, experiment_id: &str, batch_size: u32) -> Result<Vec<DataRow>> {
        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let filter = DataFilter {
                limit: batch_size,
                offset,
                ..DataFilter::default()
            };
            let batch = self.rows(experiment_id, &filter).await?;
            let done = batch.is_empty() || (batch.len() as u32) < batch_size;
            all.extend(batch);
            if done {
                return Ok(all);
            }
            offset += batch_size;
        }
    }

    /// Fetches every data row as a [`DataTable`].
    pub async fn all_table(&self, experiment_id: &str, batch_size: u32) -> Result<DataTable> {
        let rows = self.all_rows(experiment_id, batch_size).await?;
        Ok(DataTable::from_rows(&rows))
    }

    /// Counts data rows, optionally for a single participant.
    pub async fn count(
        &self,
        experiment_id: &str,
        participant_id: Option<&str>,
    ) -> Result<DataCountResponse> {
        let id = require_id(experiment_id, "experiment id")?;
        let mut pairs = Vec::new();
        if let Some(participant) = participant_id {
            pairs.push(("participant_id", participant.to_string()));
        }
        let query = query_string(&pairs);
        let response = self
            .executor
            .execute(Request::get(format!(
                "/api/v1/experiment-data/{id}/data/count{query}"
            )))
            .await?;
        decode(response)
    }

    /// Describes the storage columns of an experiment's data table.
    pub async fn columns(&self, experiment_id: &str) -> Result<ExperimentColumns> {
        let id = require_id(experiment_id, "experiment id")?;
        let response = self
            .executor
            .execute(Request::get(format!(
                "/api/v1/experiment-data/{id}/data/columns"
            )))
            .await?;
        decode(response)
    }

    /// Fetches a single data row by id.
    pub async fn row(&self, experiment_id: &str, row_id: i64) -> Result<DataRow> {
        let id = require_id(experiment_id, "experiment id")?;
        let response = self
            .executor
            .execute(Request::get(format!(
                "/api/v1/experiment-data/{id}/data/row/{row_id}"
            )))
            .await?;
        decode(response)
    }

    /// Applies a partial update to one data row.
    pub async fn update_row(
        &self,
        experiment_id: &str,
        row_id: i64,
        update: DataRowUpdate,
    ) -> Result<DataRow> {
        let id = require_id(experiment_id, "experiment id")?;
        update.validate()?;
        let response = self
            .executor
            .execute(Request::put(
                format!("/api/v1/experiment-data/{id}/data/row/{row_id}"),
                to_body(&update)?,
            ))
            .await?;
        decode(response)
    }

    /// Deletes one data row.
    pub async fn delete_row(
        &self,
        experiment_id: &str,
        row_id: i64,
    ) -> Result<DataDeleteResponse> {
        let id = require_id(experiment_id, "experiment id")?;
        let response = self
            .executor
            .execute(Request::delete(format!(
                "/api/v1/experiment-data/{id}/data/row/{row_id}"
            )))
            .await?;
        decode(response)
    }

    /// Runs a server-side filtered query over an experiment's rows.
    pub async fn query(&self, experiment_id: &str, query: &DataQuery) -> Result<Vec<DataRow>> {
        let id = require_id(experiment_id, "experiment id")?;
        query.validate()?;
        let response = self
            .executor
            .execute(Request::post(
                format!("/api/v1/experiment-data/{id}/data/query"),
                to_body(query)?,
            ))
            .await?;
        decode(response)
    }

    /// Runs a server-side filtered query and reshapes the result.
    pub async fn query_table(&self, experiment_id: &str, query: &DataQuery) -> Result<DataTable> {
        let rows = self.query(experiment_id, query).await?;
        Ok(DataTable::from_rows(&rows))
    }
}
