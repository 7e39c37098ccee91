//! Core error types

use stratus_graph::GraphError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Resource already declared: {0}")]
    DuplicateResource(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Resource '{resource}' has no output '{output}'")]
    UnknownOutput { resource: String, output: String },

    #[error("Export already declared: {0}")]
    DuplicateExport(String),

    #[error("Export not found: {0}")]
    ExportNotFound(String),

    #[error("Missing required configuration key: {0}")]
    MissingConfig(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
