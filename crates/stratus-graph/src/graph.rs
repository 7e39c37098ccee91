//! Deferred-value dependency graph
//!
//! The graph holds write-once cells ("source" values resolved by the external
//! provisioning engine), literals, and derived expressions over them. Each
//! `resolve()` or `fail()` call triggers a synchronous cascade that evaluates
//! exactly the expressions whose full input set has become available.

use crate::error::{GraphError, Result};
use std::collections::{HashMap, VecDeque};

/// Attribute values flowing through the graph
pub type Value = serde_json::Value;

/// Evaluation function of a derived expression.
///
/// Receives the resolved dependency values in declaration order. An `Err`
/// marks the derived value as failed and propagates to its consumers.
pub type EvalFn = Box<dyn Fn(&[Value]) -> std::result::Result<Value, String> + Send>;

/// Handle to a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(usize);

/// Externally observable state of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueState {
    /// Not all inputs (or the external resolution) have arrived yet
    Pending,
    /// Resolved to its final value
    Resolved(Value),
    /// Failed permanently; `source` names the node where the failure originated
    Failed { source: String, reason: String },
}

impl ValueState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ValueState::Resolved(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ValueState::Failed { .. })
    }
}

#[derive(Debug, Clone)]
struct Failure {
    source: String,
    reason: String,
}

enum NodeState {
    Pending,
    Resolved(Value),
    Failed(Failure),
}

enum NodeKind {
    /// Write-once cell satisfied by the external engine
    Source,
    /// Derived expression; `unresolved` counts inputs still pending
    Derived {
        deps: Vec<OutputId>,
        eval: EvalFn,
        unresolved: usize,
    },
}

struct Node {
    name: String,
    kind: NodeKind,
    state: NodeState,
    /// Derived nodes reading this node's value
    consumers: Vec<OutputId>,
    /// Nodes declared (via [`OutputGraph::depend`]) to depend on this node.
    /// They carry no value edge but fail when this node fails.
    dependents: Vec<OutputId>,
}

/// The deferred-value graph.
///
/// Single-threaded and synchronous: one external driver issues `resolve()` /
/// `fail()` calls, and each call runs its cascade to completion before
/// returning. No I/O happens here.
#[derive(Default)]
pub struct OutputGraph {
    nodes: Vec<Node>,
    /// Declared edges (from depends on to), for cycle detection and reporting
    declared: HashMap<OutputId, Vec<OutputId>>,
}

impl OutputGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Register a deferred value to be resolved by the external engine
    pub fn source(&mut self, name: impl Into<String>) -> OutputId {
        let name = name.into();
        tracing::debug!("registering source value '{}'", name);
        self.push(Node {
            name,
            kind: NodeKind::Source,
            state: NodeState::Pending,
            consumers: Vec::new(),
            dependents: Vec::new(),
        })
    }

    /// Register a value that is known at declaration time
    pub fn literal(&mut self, name: impl Into<String>, value: Value) -> OutputId {
        self.push(Node {
            name: name.into(),
            kind: NodeKind::Source,
            state: NodeState::Resolved(value),
            consumers: Vec::new(),
            dependents: Vec::new(),
        })
    }

    /// Register a derived expression over `deps`.
    ///
    /// The expression evaluates as soon as every dependency is resolved,
    /// which may be immediately. If any dependency has already failed the
    /// derived value fails right away without evaluating.
    pub fn combine(
        &mut self,
        name: impl Into<String>,
        deps: Vec<OutputId>,
        eval: EvalFn,
    ) -> Result<OutputId> {
        let name = name.into();
        for dep in &deps {
            self.node(*dep)?;
        }

        // Inspect dependency states before inserting the node.
        let mut unresolved = 0usize;
        let mut upstream_failure: Option<Failure> = None;
        for dep in &deps {
            match &self.nodes[dep.0].state {
                NodeState::Pending => unresolved += 1,
                NodeState::Resolved(_) => {}
                NodeState::Failed(failure) => {
                    if upstream_failure.is_none() {
                        upstream_failure = Some(failure.clone());
                    }
                }
            }
        }

        let id = self.push(Node {
            name: name.clone(),
            kind: NodeKind::Derived {
                deps: deps.clone(),
                eval,
                unresolved,
            },
            state: NodeState::Pending,
            consumers: Vec::new(),
            dependents: Vec::new(),
        });
        for dep in &deps {
            self.nodes[dep.0].consumers.push(id);
        }
        tracing::debug!(
            "registered derived value '{}' over {} input(s), {} unresolved",
            name,
            deps.len(),
            unresolved
        );

        if let Some(failure) = upstream_failure {
            self.settle_failed(id, failure);
            self.cascade(id);
        } else if unresolved == 0 {
            self.evaluate(id);
            self.cascade(id);
        }
        Ok(id)
    }

    /// Declare an explicit dependency edge: `from` depends on `to`.
    ///
    /// Rejected with [`GraphError::CycleDetected`] when the edge would close
    /// a cycle over the declared edge set. This is the registration-time
    /// guard; resolution never has to deal with cycles.
    pub fn depend(&mut self, from: OutputId, to: OutputId) -> Result<()> {
        self.node(from)?;
        self.node(to)?;
        if from == to {
            return Err(GraphError::CycleDetected(self.nodes[from.0].name.clone()));
        }
        if let Some(path) = self.find_path(to, from) {
            let mut names: Vec<&str> = path.iter().map(|id| self.nodes[id.0].name.as_str()).collect();
            names.push(self.nodes[to.0].name.as_str());
            return Err(GraphError::CycleDetected(names.join(" -> ")));
        }
        self.declared.entry(from).or_default().push(to);
        self.nodes[to.0].dependents.push(from);

        // The new edge may bind `from` to an already-failed dependency.
        if self.nodes[to.0].state.is_failed_internal()
            && matches!(self.nodes[from.0].state, NodeState::Pending)
        {
            let failure = self.failure_of(to);
            self.settle_failed(from, failure);
            self.cascade(from);
        }
        Ok(())
    }

    /// Satisfy a deferred value exactly once and run the resulting cascade
    pub fn resolve(&mut self, id: OutputId, value: Value) -> Result<()> {
        let node = self.node(id)?;
        if !matches!(node.kind, NodeKind::Source) {
            return Err(GraphError::NotResolvable(node.name.clone()));
        }
        if !matches!(node.state, NodeState::Pending) {
            return Err(GraphError::AlreadyResolved(node.name.clone()));
        }
        tracing::debug!("resolved '{}'", node.name);
        self.nodes[id.0].state = NodeState::Resolved(value);
        self.cascade(id);
        Ok(())
    }

    /// Fail a deferred value permanently, propagating to every consumer
    pub fn fail(&mut self, id: OutputId, reason: impl Into<String>) -> Result<()> {
        let node = self.node(id)?;
        if !matches!(node.kind, NodeKind::Source) {
            return Err(GraphError::NotResolvable(node.name.clone()));
        }
        if !matches!(node.state, NodeState::Pending) {
            return Err(GraphError::AlreadyResolved(node.name.clone()));
        }
        let failure = Failure {
            source: node.name.clone(),
            reason: reason.into(),
        };
        tracing::warn!("'{}' failed: {}", failure.source, failure.reason);
        self.nodes[id.0].state = NodeState::Failed(failure);
        self.cascade(id);
        Ok(())
    }

    /// Read a resolved value, cloning it out of the graph
    pub fn value(&self, id: OutputId) -> Result<Value> {
        let node = self.node(id)?;
        match &node.state {
            NodeState::Pending => Err(GraphError::NotResolved(node.name.clone())),
            NodeState::Resolved(value) => Ok(value.clone()),
            NodeState::Failed(failure) => Err(GraphError::UpstreamFailure {
                source: failure.source.clone(),
                reason: failure.reason.clone(),
            }),
        }
    }

    /// Observe a node's state without consuming it
    pub fn state(&self, id: OutputId) -> Result<ValueState> {
        let node = self.node(id)?;
        Ok(match &node.state {
            NodeState::Pending => ValueState::Pending,
            NodeState::Resolved(value) => ValueState::Resolved(value.clone()),
            NodeState::Failed(failure) => ValueState::Failed {
                source: failure.source.clone(),
                reason: failure.reason.clone(),
            },
        })
    }

    pub fn name(&self, id: OutputId) -> Result<&str> {
        Ok(self.node(id)?.name.as_str())
    }

    /// Declared dependencies of a node (edges added via [`OutputGraph::depend`])
    pub fn declared_deps(&self, id: OutputId) -> Result<Vec<OutputId>> {
        self.node(id)?;
        Ok(self.declared.get(&id).cloned().unwrap_or_default())
    }

    /// All dependency edges (consumer name, dependency name), declared and derived
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut edges = Vec::new();
        for node in &self.nodes {
            if let NodeKind::Derived { deps, .. } = &node.kind {
                for dep in deps {
                    edges.push((node.name.clone(), self.nodes[dep.0].name.clone()));
                }
            }
        }
        for (from, tos) in &self.declared {
            for to in tos {
                edges.push((
                    self.nodes[from.0].name.clone(),
                    self.nodes[to.0].name.clone(),
                ));
            }
        }
        edges.sort();
        edges
    }

    fn push(&mut self, node: Node) -> OutputId {
        self.nodes.push(node);
        OutputId(self.nodes.len() - 1)
    }

    fn node(&self, id: OutputId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| GraphError::NotFound(format!("#{}", id.0)))
    }

    /// DFS over declared and derived edges, returning a path from `start` to
    /// `target` if one exists (dependency direction).
    fn find_path(&self, start: OutputId, target: OutputId) -> Option<Vec<OutputId>> {
        let mut stack = vec![vec![start]];
        let mut visited = vec![false; self.nodes.len()];
        while let Some(path) = stack.pop() {
            let current = *path.last().unwrap();
            if current == target {
                return Some(path);
            }
            if visited[current.0] {
                continue;
            }
            visited[current.0] = true;
            let declared = self.declared.get(&current).cloned().unwrap_or_default();
            let derived = match &self.nodes[current.0].kind {
                NodeKind::Derived { deps, .. } => deps.clone(),
                NodeKind::Source => Vec::new(),
            };
            for next in declared.into_iter().chain(derived) {
                let mut extended = path.clone();
                extended.push(next);
                stack.push(extended);
            }
        }
        None
    }

    /// Event-driven propagation from a freshly settled node.
    ///
    /// Processes a worklist synchronously to completion: value consumers are
    /// (re)examined only when one of their inputs settles, and failures
    /// short-circuit to declared dependents as well. Cascades never overlap
    /// because the graph is driven from a single thread.
    fn cascade(&mut self, settled: OutputId) {
        let mut worklist = VecDeque::from([settled]);
        while let Some(id) = worklist.pop_front() {
            let failed = match &self.nodes[id.0].state {
                NodeState::Resolved(_) => false,
                NodeState::Failed(_) => true,
                // A cascade entry is always settled.
                NodeState::Pending => continue,
            };
            let consumers = self.nodes[id.0].consumers.clone();
            for consumer in consumers {
                if !matches!(self.nodes[consumer.0].state, NodeState::Pending) {
                    continue;
                }
                if failed {
                    let failure = self.failure_of(id);
                    self.settle_failed(consumer, failure);
                    worklist.push_back(consumer);
                    continue;
                }
                let ready = match &mut self.nodes[consumer.0].kind {
                    NodeKind::Derived { unresolved, .. } => {
                        *unresolved -= 1;
                        *unresolved == 0
                    }
                    NodeKind::Source => false,
                };
                if ready {
                    self.evaluate(consumer);
                    worklist.push_back(consumer);
                }
            }
            if failed {
                // Declared dependents fail with the same origin, even though
                // no value flows along these edges.
                let dependents = self.nodes[id.0].dependents.clone();
                for dependent in dependents {
                    if matches!(self.nodes[dependent.0].state, NodeState::Pending) {
                        let failure = self.failure_of(id);
                        self.settle_failed(dependent, failure);
                        worklist.push_back(dependent);
                    }
                }
            }
        }
    }

    /// Evaluate a derived node whose inputs are all resolved
    fn evaluate(&mut self, id: OutputId) {
        let result = {
            let node = &self.nodes[id.0];
            let NodeKind::Derived { deps, eval, .. } = &node.kind else {
                return;
            };
            let values: Vec<Value> = deps
                .iter()
                .map(|dep| match &self.nodes[dep.0].state {
                    NodeState::Resolved(value) => value.clone(),
                    // Guarded by the unresolved counter.
                    _ => Value::Null,
                })
                .collect();
            eval(&values)
        };
        match result {
            Ok(value) => {
                tracing::debug!("evaluated '{}'", self.nodes[id.0].name);
                self.nodes[id.0].state = NodeState::Resolved(value);
            }
            Err(reason) => {
                let failure = Failure {
                    source: self.nodes[id.0].name.clone(),
                    reason,
                };
                tracing::warn!("'{}' failed: {}", failure.source, failure.reason);
                self.nodes[id.0].state = NodeState::Failed(failure);
            }
        }
    }

    fn failure_of(&self, id: OutputId) -> Failure {
        match &self.nodes[id.0].state {
            NodeState::Failed(failure) => failure.clone(),
            _ => Failure {
                source: self.nodes[id.0].name.clone(),
                reason: "unknown failure".to_string(),
            },
        }
    }

    fn settle_failed(&mut self, id: OutputId, failure: Failure) {
        tracing::debug!(
            "'{}' failed upstream (origin '{}')",
            self.nodes[id.0].name,
            failure.source
        );
        self.nodes[id.0].state = NodeState::Failed(failure);
    }
}

impl NodeState {
    fn is_failed_internal(&self) -> bool {
        matches!(self, NodeState::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn concat_eval(prefix: &'static str, suffix: &'static str) -> EvalFn {
        Box::new(move |values| {
            let host = values[0].as_str().unwrap_or_default();
            Ok(json!(format!("{prefix}{host}{suffix}")))
        })
    }

    #[test]
    fn combine_resolves_regardless_of_order() {
        for reversed in [false, true] {
            let mut graph = OutputGraph::new();
            let a = graph.source("a");
            let b = graph.source("b");
            let sum = graph
                .combine(
                    "sum",
                    vec![a, b],
                    Box::new(|values| {
                        Ok(json!(values[0].as_i64().unwrap() + values[1].as_i64().unwrap()))
                    }),
                )
                .unwrap();

            let (first, second) = if reversed { (b, a) } else { (a, b) };
            graph.resolve(first, json!(1)).unwrap();
            assert_eq!(graph.state(sum).unwrap(), ValueState::Pending);
            graph.resolve(second, json!(2)).unwrap();
            assert_eq!(graph.value(sum).unwrap(), json!(3));
        }
    }

    #[test]
    fn second_resolve_is_rejected_and_value_kept() {
        let mut graph = OutputGraph::new();
        let host = graph.source("host");
        graph.resolve(host, json!("example.com")).unwrap();

        let err = graph.resolve(host, json!("other.com")).unwrap_err();
        assert_eq!(err, GraphError::AlreadyResolved("host".to_string()));
        assert_eq!(graph.value(host).unwrap(), json!("example.com"));
    }

    #[test]
    fn failure_reaches_transitive_consumers_without_other_inputs() {
        let mut graph = OutputGraph::new();
        let a = graph.source("a");
        let b = graph.source("b");
        let first = graph
            .combine("first", vec![a, b], Box::new(|_| Ok(json!("unreachable"))))
            .unwrap();
        let second = graph
            .combine("second", vec![first], Box::new(|_| Ok(json!("unreachable"))))
            .unwrap();

        // `b` never resolves; the failure must not wait for it.
        graph.fail(a, "quota exceeded").unwrap();

        for id in [first, second] {
            match graph.state(id).unwrap() {
                ValueState::Failed { source, reason } => {
                    assert_eq!(source, "a");
                    assert_eq!(reason, "quota exceeded");
                }
                other => panic!("expected failure, got {other:?}"),
            }
        }
    }

    #[test]
    fn declared_cycle_is_rejected_at_registration() {
        let mut graph = OutputGraph::new();
        let a = graph.source("a");
        let b = graph.source("b");
        let c = graph.source("c");
        graph.depend(a, b).unwrap();
        graph.depend(b, c).unwrap();

        let err = graph.depend(c, a).unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected(_)));

        // The graph is still usable and no resolve was needed to detect it.
        graph.resolve(a, json!(1)).unwrap();
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut graph = OutputGraph::new();
        let a = graph.source("a");
        let err = graph.depend(a, a).unwrap_err();
        assert_eq!(err, GraphError::CycleDetected("a".to_string()));
    }

    #[test]
    fn derived_url_from_host() {
        let mut graph = OutputGraph::new();
        let host = graph.source("r1.host");
        let url = graph
            .combine("url", vec![host], concat_eval("https://", "/api"))
            .unwrap();

        graph.resolve(host, json!("example.com")).unwrap();
        assert_eq!(graph.value(url).unwrap(), json!("https://example.com/api"));
    }

    #[test]
    fn fan_out_resolves_each_consumer_independently() {
        let mut graph = OutputGraph::new();
        let host = graph.source("host");
        let http = graph
            .combine("http", vec![host], concat_eval("http://", ""))
            .unwrap();
        let https = graph
            .combine("https", vec![host], concat_eval("https://", ""))
            .unwrap();

        graph.resolve(host, json!("cdn.example.com")).unwrap();
        assert_eq!(graph.value(http).unwrap(), json!("http://cdn.example.com"));
        assert_eq!(graph.value(https).unwrap(), json!("https://cdn.example.com"));
    }

    #[test]
    fn combine_over_already_resolved_inputs_evaluates_immediately() {
        let mut graph = OutputGraph::new();
        let host = graph.source("host");
        graph.resolve(host, json!("example.com")).unwrap();

        let url = graph
            .combine("url", vec![host], concat_eval("https://", ""))
            .unwrap();
        assert_eq!(graph.value(url).unwrap(), json!("https://example.com"));
    }

    #[test]
    fn combine_over_failed_input_fails_immediately() {
        let mut graph = OutputGraph::new();
        let host = graph.source("host");
        graph.fail(host, "provisioning denied").unwrap();

        let url = graph
            .combine("url", vec![host], concat_eval("https://", ""))
            .unwrap();
        assert_eq!(
            graph.value(url).unwrap_err(),
            GraphError::UpstreamFailure {
                source: "host".to_string(),
                reason: "provisioning denied".to_string(),
            }
        );
    }

    #[test]
    fn reading_pending_value_reports_not_resolved() {
        let mut graph = OutputGraph::new();
        let host = graph.source("host");
        assert_eq!(
            graph.value(host).unwrap_err(),
            GraphError::NotResolved("host".to_string())
        );
    }

    #[test]
    fn derived_values_cannot_be_resolved_externally() {
        let mut graph = OutputGraph::new();
        let host = graph.source("host");
        let url = graph
            .combine("url", vec![host], concat_eval("https://", ""))
            .unwrap();
        assert_eq!(
            graph.resolve(url, json!("bogus")).unwrap_err(),
            GraphError::NotResolvable("url".to_string())
        );
    }

    #[test]
    fn eval_error_becomes_failure_for_consumers() {
        let mut graph = OutputGraph::new();
        let raw = graph.source("raw");
        let parsed = graph
            .combine(
                "parsed",
                vec![raw],
                Box::new(|values| {
                    values[0]
                        .as_str()
                        .and_then(|s| s.parse::<i64>().ok())
                        .map(|n| json!(n))
                        .ok_or_else(|| "not a number".to_string())
                }),
            )
            .unwrap();
        let doubled = graph
            .combine(
                "doubled",
                vec![parsed],
                Box::new(|values| Ok(json!(values[0].as_i64().unwrap_or(0) * 2))),
            )
            .unwrap();

        graph.resolve(raw, json!("oops")).unwrap();
        assert_eq!(
            graph.value(doubled).unwrap_err(),
            GraphError::UpstreamFailure {
                source: "parsed".to_string(),
                reason: "not a number".to_string(),
            }
        );
    }

    #[test]
    fn failure_propagates_along_declared_edges() {
        let mut graph = OutputGraph::new();
        let cert = graph.source("certificate.id");
        let record = graph.source("record.id");
        graph.depend(record, cert).unwrap();

        graph.fail(cert, "validation timed out").unwrap();
        match graph.state(record).unwrap() {
            ValueState::Failed { source, .. } => assert_eq!(source, "certificate.id"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn deep_chain_cascades_in_one_resolve() {
        let mut graph = OutputGraph::new();
        let base = graph.source("base");
        let mut last = base;
        for i in 0..8 {
            last = graph
                .combine(
                    format!("step-{i}"),
                    vec![last],
                    Box::new(|values| Ok(json!(values[0].as_i64().unwrap() + 1))),
                )
                .unwrap();
        }
        graph.resolve(base, json!(0)).unwrap();
        assert_eq!(graph.value(last).unwrap(), json!(8));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut other = OutputGraph::new();
        let foreign = other.source("foreign");

        let graph = OutputGraph::new();
        assert!(matches!(
            graph.value(foreign).unwrap_err(),
            GraphError::NotFound(_)
        ));
    }
}
