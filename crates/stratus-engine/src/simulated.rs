//! Simulated provisioning engine
//!
//! Stands in for the real engine during previews and tests: instead of
//! calling cloud APIs it fabricates plausible outputs through per-provider
//! synthesizer functions. Deterministic by construction, so previews of the
//! same stack always report the same values.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use stratus_core::physical_name;
use stratus_graph::Value;

use crate::engine::{CreateRequest, CreateResponse, ProvisioningEngine};
use crate::error::{EngineError, Result};

/// Fabricates the outputs of one provider's resource kinds
pub type SynthesizeFn =
    fn(&CreateRequest) -> std::result::Result<BTreeMap<String, Value>, String>;

/// Stable hex digest for synthesized identifiers (SAS signatures, zone ids)
pub fn deterministic_suffix(seed: &str) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    seed.hash(&mut hasher);
    format!("{:012x}", hasher.finish() & 0xffff_ffff_ffff)
}

/// Engine that synthesizes outputs instead of provisioning anything
#[derive(Default)]
pub struct SimulatedEngine {
    providers: HashMap<String, SynthesizeFn>,
    fail_resources: HashMap<String, String>,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the synthesizer for a provider
    pub fn with_provider(mut self, name: impl Into<String>, synthesize: SynthesizeFn) -> Self {
        self.providers.insert(name.into(), synthesize);
        self
    }

    /// Make a specific resource fail on creation (failure-path testing)
    pub fn fail_resource(
        mut self,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.fail_resources.insert(resource.into(), message.into());
        self
    }
}

#[async_trait]
impl ProvisioningEngine for SimulatedEngine {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn create(&self, request: &CreateRequest) -> Result<CreateResponse> {
        if let Some(message) = self.fail_resources.get(&request.resource) {
            return Err(EngineError::CreateFailed {
                resource: request.resource.clone(),
                message: message.clone(),
            });
        }
        let synthesize =
            self.providers
                .get(&request.provider)
                .ok_or_else(|| EngineError::Unsupported {
                    provider: request.provider.clone(),
                    kind: request.kind.clone(),
                })?;
        let outputs = synthesize(request).map_err(|message| EngineError::CreateFailed {
            resource: request.resource.clone(),
            message,
        })?;
        tracing::debug!(
            "synthesized {} output(s) for {}:{} '{}'",
            outputs.len(),
            request.provider,
            request.kind,
            request.resource
        );
        Ok(CreateResponse {
            id: physical_name(&request.resource),
            outputs,
        })
    }
}
