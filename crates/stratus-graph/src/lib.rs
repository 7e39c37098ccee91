//! Stratus deferred-value graph
//!
//! A single-threaded reactive dataflow graph for cloud resource outputs:
//! values that only become known after a remote create completes. The
//! external provisioning engine drives the graph by calling
//! [`OutputGraph::resolve`] (or [`OutputGraph::fail`]) as operations finish;
//! each call cascades synchronously through the derived expressions whose
//! input sets just became complete.
//!
//! Invariants:
//! - Every deferred value resolves to exactly one value or fails permanently.
//! - Dependency edges form a DAG; a declared edge that would close a cycle is
//!   rejected at registration time, never at resolution time.
//! - Failures short-circuit to all direct and transitive consumers without
//!   waiting for their remaining inputs.

pub mod error;
pub mod graph;

pub use error::{GraphError, Result};
pub use graph::{EvalFn, OutputGraph, OutputId, Value, ValueState};
