//! Resource declarations and registered handles

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use stratus_graph::OutputId;

use crate::error::{CoreError, Result};
use crate::output::Output;
use crate::property::PropertyValue;

/// Derive the physical (remote) name for a logical resource name.
///
/// Remote names get a suffix so repeated stacks do not collide, the way
/// provisioning tools auto-name resources. The suffix is a stable hash of
/// the logical name, keeping simulated runs deterministic.
pub fn physical_name(logical: &str) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    logical.hash(&mut hasher);
    format!("{}-{:07x}", logical, hasher.finish() & 0xfff_ffff)
}

/// A declared cloud resource, before registration.
///
/// `provider` and `kind` identify the remote object class (e.g. `aws` /
/// `s3:Bucket`); `outputs` names the attributes the engine reports back
/// once the remote create completes.
#[derive(Debug, Clone)]
pub struct ResourceDecl {
    pub name: String,
    pub provider: String,
    pub kind: String,
    pub inputs: BTreeMap<String, PropertyValue>,
    pub outputs: Vec<String>,
    pub depends_on: Vec<String>,
}

impl ResourceDecl {
    pub fn new(
        provider: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            kind: kind.into(),
            inputs: BTreeMap::new(),
            outputs: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn input(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    pub fn outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Explicit creation-order dependency on another resource
    pub fn depends_on(mut self, resource: impl Into<String>) -> Self {
        self.depends_on.push(resource.into());
        self
    }
}

/// Handle to a registered resource.
///
/// Outputs are deferred until the external engine reports completion;
/// reading one earlier surfaces `NotResolved`.
#[derive(Debug, Clone)]
pub struct Resource {
    name: String,
    id: OutputId,
    outputs: BTreeMap<String, OutputId>,
}

impl Resource {
    pub(crate) fn new(name: String, id: OutputId, outputs: BTreeMap<String, OutputId>) -> Self {
        Self { name, id, outputs }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The engine-assigned identifier, itself a deferred value
    pub fn id(&self) -> Output<String> {
        Output::new(self.id)
    }

    /// Typed handle to a declared output
    pub fn output<T>(&self, name: &str) -> Result<Output<T>> {
        self.outputs
            .get(name)
            .map(|id| Output::new(*id))
            .ok_or_else(|| CoreError::UnknownOutput {
                resource: self.name.clone(),
                output: name.to_string(),
            })
    }
}
