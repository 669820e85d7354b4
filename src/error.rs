use crate::observations::error::ObservationDataError;
use chrono::NaiveDate;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum ClimoError {
    #[error(transparent)]
    ObservationData(#[from] ObservationDataError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution,

    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write file '{0}'")]
    FileWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to write frame to '{0}'")]
    FrameWrite(PathBuf, #[source] PolarsError),

    #[error("Failed to aggregate observations")]
    Polars(#[from] PolarsError),

    #[error("Failed to serialize summary")]
    Json(#[from] serde_json::Error),

    #[error("Invalid period: start {start} is after end {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("Background task failed")]
    TaskJoin(#[from] JoinError),
}
