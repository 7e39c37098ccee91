//! Graph evaluator error types

use std::fmt;

/// Errors raised by the deferred-value graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    CycleDetected(String),

    AlreadyResolved(String),

    UpstreamFailure { source: String, reason: String },

    NotFound(String),

    NotResolved(String),

    NotResolvable(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::CycleDetected(name) => {
                write!(f, "Dependency cycle detected: {name}")
            }
            GraphError::AlreadyResolved(name) => {
                write!(f, "Value '{name}' is already resolved")
            }
            GraphError::UpstreamFailure { source, reason } => {
                write!(f, "Upstream value '{source}' failed: {reason}")
            }
            GraphError::NotFound(name) => write!(f, "Unknown value: {name}"),
            GraphError::NotResolved(name) => {
                write!(f, "Value '{name}' is not resolved yet")
            }
            GraphError::NotResolvable(name) => {
                write!(f, "Value '{name}' is derived and cannot be resolved externally")
            }
        }
    }
}

impl std::error::Error for GraphError {}

pub type Result<T> = std::result::Result<T, GraphError>;
