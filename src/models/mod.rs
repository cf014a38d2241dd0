//! Typed request and response models for the WAVE API.
//!
//! Create/update payloads validate themselves client-side before anything
//! is sent, mirroring the rules the backend enforces.

mod data;
mod experiment;
mod experiment_type;
mod responses;
mod search;
mod tag;

pub use data::{DataFilter, DataQuery, DataRow, DataRowCreate, DataRowUpdate};
pub use experiment::{Experiment, ExperimentCreate, ExperimentFilter, ExperimentUpdate};
pub use experiment_type::{
    ColumnDefinition, ExperimentType, ExperimentTypeCreate, ExperimentTypeUpdate,
};
pub use responses::{
    ColumnInfo, DataCountResponse, DataDeleteResponse, DeleteResponse, ExperimentColumns,
    HealthStatus, Pagination, VersionInfo,
};
pub use search::{
    AdvancedExperimentSearchRequest, DataByTagsRequest, DataByTagsResponse,
    ExperimentDescriptionSearchRequest, ExperimentSearchResponse, ExperimentTagSearchRequest,
    ExperimentTypeSearchRequest, ExperimentTypeSearchResponse, TagSearchRequest,
    TagSearchResponse,
};
pub use tag::{Tag, TagCreate, TagUpdate};

use crate::{Result, WaveError};

pub(crate) fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WaveError::validation(format!("{what} cannot be empty")));
    }
    Ok(())
}

pub(crate) fn require_max_chars(value: &str, what: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(WaveError::validation(format!(
            "{what} cannot exceed {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn require_limit(limit: u32) -> Result<()> {
    if !(1..=1_000).contains(&limit) {
        return Err(WaveError::validation(format!(
            "limit must be between 1 and 1000, got {limit}"
        )));
    }
    Ok(())
}
