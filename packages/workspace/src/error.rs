use funnel_model::ModelError;
use std::time::Duration;
use thiserror::Error;

/// Persistence failures. Logged and surfaced as notifications; never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] ModelError),

    #[error("Auto-save writer for {0} has stopped")]
    WriterStopped(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
