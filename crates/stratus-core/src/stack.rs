//! Program context
//!
//! A [`Stack`] is the result of evaluating one declarative program: the
//! ordered resource declarations, the deferred-value graph wiring their
//! inputs to each other's outputs, and the named exports the program
//! surfaces as its observable result.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::Serialize;
use stratus_graph::{EvalFn, OutputGraph, OutputId, Value};

use crate::error::{CoreError, Result};
use crate::output::Output;
use crate::property::{Input, PropertyValue};
use crate::resource::{Resource, ResourceDecl};

/// A registered resource as the deploy driver sees it
#[derive(Debug)]
pub struct ResourceEntry {
    pub name: String,
    pub provider: String,
    pub kind: String,
    pub inputs: BTreeMap<String, PropertyValue>,
    /// The implicit engine-assigned identifier output
    pub id: OutputId,
    /// Declared outputs, all deferred until creation completes
    pub outputs: BTreeMap<String, OutputId>,
}

impl ResourceEntry {
    /// Deferred values this resource's inputs read
    pub fn input_dependencies(&self) -> Vec<OutputId> {
        let mut deps = Vec::new();
        for property in self.inputs.values() {
            deps.extend(property.dependencies());
        }
        deps
    }

    /// Substitute resolved values into the inputs, producing plain JSON
    pub fn materialize_inputs(
        &self,
        graph: &OutputGraph,
    ) -> stratus_graph::Result<serde_json::Map<String, Value>> {
        let mut inputs = serde_json::Map::new();
        for (key, property) in &self.inputs {
            inputs.insert(key.clone(), property.materialize(graph)?);
        }
        Ok(inputs)
    }
}

/// A named export: a plain value or a deferred one
#[derive(Debug, Clone)]
pub enum Export {
    Value(Value),
    Output(OutputId),
}

impl From<&str> for Export {
    fn from(value: &str) -> Self {
        Export::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Export {
    fn from(value: String) -> Self {
        Export::Value(Value::String(value))
    }
}

impl From<Value> for Export {
    fn from(value: Value) -> Self {
        Export::Value(value)
    }
}

impl<T> From<Output<T>> for Export {
    fn from(output: Output<T>) -> Self {
        Export::Output(output.id())
    }
}

/// The program context: graph, resources and exports
pub struct Stack {
    name: String,
    graph: OutputGraph,
    resources: Vec<ResourceEntry>,
    index: HashMap<String, usize>,
    exports: BTreeMap<String, Export>,
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack")
            .field("name", &self.name)
            .field("resources", &self.resources)
            .field("exports", &self.exports)
            .finish_non_exhaustive()
    }
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: OutputGraph::new(),
            resources: Vec::new(),
            index: HashMap::new(),
            exports: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &OutputGraph {
        &self.graph
    }

    /// Mutable graph access for the resolution driver
    pub fn graph_mut(&mut self) -> &mut OutputGraph {
        &mut self.graph
    }

    /// Register a resource declaration.
    ///
    /// Every output-typed input and every `depends_on` target becomes a
    /// declared graph edge, so a dependency cycle is rejected here, before
    /// any resolution happens.
    pub fn register(&mut self, decl: ResourceDecl) -> Result<Resource> {
        if self.index.contains_key(&decl.name) {
            return Err(CoreError::DuplicateResource(decl.name));
        }

        // depends_on targets must already be registered; programs are flat
        // declaration sequences, so forward references are declaration bugs.
        let mut explicit = Vec::new();
        for target in &decl.depends_on {
            let entry = self
                .index
                .get(target)
                .map(|idx| &self.resources[*idx])
                .ok_or_else(|| CoreError::ResourceNotFound(target.clone()))?;
            explicit.push(entry.id);
        }

        let id = self.graph.source(format!("{}.id", decl.name));
        let mut outputs = BTreeMap::new();
        for output in &decl.outputs {
            let output_id = self.graph.source(format!("{}.{}", decl.name, output));
            // Outputs materialize only once the resource itself is created.
            self.graph.depend(output_id, id)?;
            outputs.insert(output.clone(), output_id);
        }

        for property in decl.inputs.values() {
            for dep in property.dependencies() {
                self.graph.depend(id, dep)?;
            }
        }
        for target in explicit {
            self.graph.depend(id, target)?;
        }

        tracing::debug!(
            "registered resource '{}' ({}:{}) with {} output(s)",
            decl.name,
            decl.provider,
            decl.kind,
            decl.outputs.len()
        );

        let entry = ResourceEntry {
            name: decl.name.clone(),
            provider: decl.provider,
            kind: decl.kind,
            inputs: decl.inputs,
            id,
            outputs: outputs.clone(),
        };
        self.index.insert(decl.name.clone(), self.resources.len());
        self.resources.push(entry);
        Ok(Resource::new(decl.name, id, outputs))
    }

    pub fn resources(&self) -> &[ResourceEntry] {
        &self.resources
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceEntry> {
        self.index.get(name).map(|idx| &self.resources[*idx])
    }

    /// Derive a new deferred value by mapping over one resolved value
    pub fn apply<T, U, F>(
        &mut self,
        output: Output<T>,
        name: impl Into<String>,
        f: F,
    ) -> Result<Output<U>>
    where
        T: DeserializeOwned,
        U: Serialize,
        F: Fn(T) -> U + Send + 'static,
    {
        let eval: EvalFn = Box::new(move |values| {
            let input: T =
                serde_json::from_value(values[0].clone()).map_err(|e| e.to_string())?;
            serde_json::to_value(f(input)).map_err(|e| e.to_string())
        });
        let id = self.graph.combine(name, vec![output.id()], eval)?;
        Ok(Output::new(id))
    }

    /// Derive a new deferred value over an arbitrary set of inputs
    pub fn combine(
        &mut self,
        name: impl Into<String>,
        deps: Vec<OutputId>,
        eval: EvalFn,
    ) -> Result<Output<Value>> {
        let id = self.graph.combine(name, deps, eval)?;
        Ok(Output::new(id))
    }

    /// String interpolation over literal and deferred parts
    pub fn concat(
        &mut self,
        name: impl Into<String>,
        parts: Vec<Input<String>>,
    ) -> Result<Output<String>> {
        enum Segment {
            Literal(String),
            Dep(usize),
        }

        let mut deps = Vec::new();
        let mut segments = Vec::new();
        for part in parts {
            match part {
                Input::Value(text) => segments.push(Segment::Literal(text)),
                Input::Output(output) => {
                    segments.push(Segment::Dep(deps.len()));
                    deps.push(output.id());
                }
            }
        }

        let eval: EvalFn = Box::new(move |values| {
            let mut text = String::new();
            for segment in &segments {
                match segment {
                    Segment::Literal(literal) => text.push_str(literal),
                    Segment::Dep(index) => match &values[*index] {
                        Value::String(s) => text.push_str(s),
                        other => text.push_str(&other.to_string()),
                    },
                }
            }
            Ok(Value::String(text))
        });
        let id = self.graph.combine(name, deps, eval)?;
        Ok(Output::new(id))
    }

    /// Surface a named value as part of the program's observable result
    pub fn export(&mut self, name: impl Into<String>, value: impl Into<Export>) -> Result<()> {
        let name = name.into();
        if self.exports.contains_key(&name) {
            return Err(CoreError::DuplicateExport(name));
        }
        self.exports.insert(name, value.into());
        Ok(())
    }

    pub fn exports(&self) -> &BTreeMap<String, Export> {
        &self.exports
    }

    /// Read an export's final value; deferred exports must be resolved
    pub fn export_value(&self, name: &str) -> Result<Value> {
        match self.exports.get(name) {
            None => Err(CoreError::ExportNotFound(name.to_string())),
            Some(Export::Value(value)) => Ok(value.clone()),
            Some(Export::Output(id)) => Ok(self.graph.value(*id)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stratus_graph::GraphError;

    fn bucket_decl(name: &str) -> ResourceDecl {
        ResourceDecl::new("aws", "s3:Bucket", name)
            .input("acl", "public-read")
            .outputs(["bucket", "websiteEndpoint"])
    }

    #[test]
    fn register_rejects_duplicate_names() {
        let mut stack = Stack::new("test");
        stack.register(bucket_decl("bucket")).unwrap();
        let err = stack.register(bucket_decl("bucket")).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateResource(name) if name == "bucket"));
    }

    #[test]
    fn depends_on_unknown_resource_is_rejected() {
        let mut stack = Stack::new("test");
        let decl = bucket_decl("bucket").depends_on("certificate");
        let err = stack.register(decl).unwrap_err();
        assert!(matches!(err, CoreError::ResourceNotFound(name) if name == "certificate"));
    }

    #[test]
    fn unknown_output_is_rejected() {
        let mut stack = Stack::new("test");
        let bucket = stack.register(bucket_decl("bucket")).unwrap();
        let err = bucket.output::<String>("hostedZoneId").unwrap_err();
        assert!(matches!(err, CoreError::UnknownOutput { .. }));
    }

    #[test]
    fn host_to_url_scenario() {
        let mut stack = Stack::new("test");
        let r1 = stack
            .register(ResourceDecl::new("test", "server", "r1").output("host"))
            .unwrap();
        let host = r1.output::<String>("host").unwrap();
        let url = stack
            .apply(host, "url", |h: String| format!("https://{h}/api"))
            .unwrap();
        stack.export("url", url).unwrap();

        let host_id = host.id();
        stack.graph_mut().resolve(host_id, json!("example.com")).unwrap();
        assert_eq!(
            stack.export_value("url").unwrap(),
            json!("https://example.com/api")
        );
    }

    #[test]
    fn input_wiring_blocks_dependency_cycles() {
        let mut stack = Stack::new("test");
        let a = stack
            .register(ResourceDecl::new("test", "server", "a").output("host"))
            .unwrap();
        let host = a.output::<String>("host").unwrap();
        stack
            .register(
                ResourceDecl::new("test", "server", "b")
                    .input("origin", host)
                    .output("host"),
            )
            .unwrap();

        // b's input already reads a.host, so a -> b closes a cycle
        let a_id = stack.resource("a").unwrap().id;
        let b_id = stack.resource("b").unwrap().id;
        let err = stack.graph_mut().depend(a_id, b_id).unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected(_)));
    }

    #[test]
    fn concat_interpolates_literals_and_outputs() {
        let mut stack = Stack::new("test");
        let cdn = stack
            .register(ResourceDecl::new("test", "cdn", "cdn").output("domainName"))
            .unwrap();
        let domain = cdn.output::<String>("domainName").unwrap();
        let url = stack
            .concat("cdnURL", vec!["https://".into(), domain.into()])
            .unwrap();
        stack.export("cdnURL", url).unwrap();

        stack
            .graph_mut()
            .resolve(domain.id(), json!("d123.cdn.example"))
            .unwrap();
        assert_eq!(
            stack.export_value("cdnURL").unwrap(),
            json!("https://d123.cdn.example")
        );
    }

    #[test]
    fn exports_are_write_once() {
        let mut stack = Stack::new("test");
        stack.export("domainURL", "https://www.example.com").unwrap();
        let err = stack
            .export("domainURL", "https://other.example.com")
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateExport(_)));
    }

    #[test]
    fn entry_materializes_resolved_inputs() {
        let mut stack = Stack::new("test");
        let account = stack
            .register(ResourceDecl::new("test", "account", "account").output("name"))
            .unwrap();
        let name = account.output::<String>("name").unwrap();
        stack
            .register(
                ResourceDecl::new("test", "container", "container")
                    .input("accountName", name)
                    .input("publicAccess", "None"),
            )
            .unwrap();

        stack.graph_mut().resolve(name.id(), json!("acct1234")).unwrap();
        let entry = stack.resource("container").unwrap();
        let inputs = entry.materialize_inputs(stack.graph()).unwrap();
        assert_eq!(
            Value::Object(inputs),
            json!({"accountName": "acct1234", "publicAccess": "None"})
        );
    }
}
