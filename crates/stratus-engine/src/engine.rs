//! Provisioning engine abstraction
//!
//! The engine is the external collaborator that performs real remote
//! create/update/delete calls. This crate only defines the seam: the deploy
//! driver hands over fully-resolved inputs and feeds the reported outputs
//! back into the deferred-value graph. Authentication, diffing and state
//! storage live behind this trait, outside this repository.

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use stratus_graph::Value;

/// A creation request for a single resource, with all inputs resolved
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequest {
    /// Logical resource name within the stack
    pub resource: String,

    /// Provider name (e.g. "aws", "azure")
    pub provider: String,

    /// Resource kind within the provider (e.g. "s3:Bucket")
    pub kind: String,

    /// Materialized input properties
    pub inputs: serde_json::Map<String, Value>,
}

impl CreateRequest {
    /// Convenience accessor for string-typed inputs
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).and_then(Value::as_str)
    }
}

/// Outputs reported once a remote create completes
#[derive(Debug, Clone)]
pub struct CreateResponse {
    /// Remote (physical) identifier
    pub id: String,

    /// Output attributes keyed by the names the declaration listed
    pub outputs: BTreeMap<String, Value>,
}

/// The provisioning engine seam
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Engine name for logs and UI
    fn name(&self) -> &str;

    /// Create a resource remotely and report its outputs
    async fn create(&self, request: &CreateRequest) -> Result<CreateResponse>;
}
