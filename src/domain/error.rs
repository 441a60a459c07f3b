//! Failure taxonomy for the batch run
//!
//! Only two classes are fatal: missing/malformed input (pre-flight) and a
//! rejected replace transaction. Tile service failures degrade to an
//! absent bearing and never abort the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("boundary file not found: {0}")]
    ResourceMissing(PathBuf),
    #[error("malformed boundary data: {0}")]
    MalformedInput(String),
    #[error("tile query service unavailable: {0}")]
    ExternalServiceUnavailable(String),
    #[error("zone store rejected replace: {0}")]
    PersistenceFailure(#[from] rusqlite::Error),
}
