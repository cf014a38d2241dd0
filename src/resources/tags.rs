use crate::executor::{Executor, Request};
use crate::models::{DeleteResponse, Tag, TagCreate, TagUpdate};
use crate::Result;

use super::{decode, query_string, to_body};

/// Facade for `/api/v1/tags`.
#[derive(Clone, Debug)]
pub struct Tags {
    executor: Executor,
}

impl Tags {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Creates a tag.
    pub async fn create(&self, tag: TagCreate) -> Result<Tag> {
        tag.validate()?;
        let response = self
            .executor
            .execute(Request::post("/api/v1/tags/", to_body(&tag)?))
            .await?;
        decode(response)
    }

    /// Fetches one tag by id.
    pub async fn get(&self, tag_id: i64) -> Result<Tag> {
        let response = self
            .executor
            .execute(Request::get(format!("/api/v1/tags/{tag_id}")))
            .await?;
        decode(response)
    }

    /// Lists tags in insertion order.
    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Tag>> {
        let query = query_string(&[("skip", skip.to_string()), ("limit", limit.to_string())]);
        let response = self
            .executor
            .execute(Request::get(format!("/api/v1/tags/{query}")))
            .await?;
        decode(response)
    }

    /// Applies a partial update; unset fields keep their current value.
    pub async fn update(&self, tag_id: i64, update: TagUpdate) -> Result<Tag> {
        update.validate()?;
        let response = self
            .executor
            .execute(Request::put(
                format!("/api/v1/tags/{tag_id}"),
                to_body(&update)?,
            ))
            .await?;
        decode(response)
    }

    /// Deletes a tag.
    pub async fn delete(&self, tag_id: i64) -> Result<DeleteResponse> {
        let response = self
            .executor
            .execute(Request::delete(format!("/api/v1/tags/{tag_id}")))
            .await?;
        decode(response)
    }
}
