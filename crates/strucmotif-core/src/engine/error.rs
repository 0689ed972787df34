use thiserror::Error;

use super::config::ConfigError;
use super::query::QueryError;
use crate::core::persistence::StorageError;

/// Failure of a whole query. Per-candidate problems never surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("Storage unavailable: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
