//! Engine error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unsupported resource type {provider}:{kind}")]
    Unsupported { provider: String, kind: String },

    #[error("Creation of '{resource}' failed: {message}")]
    CreateFailed { resource: String, message: String },

    #[error(transparent)]
    Graph(#[from] stratus_graph::GraphError),

    #[error(transparent)]
    Core(#[from] stratus_core::CoreError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
