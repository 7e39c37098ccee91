//! Dependency-ordered deploy driver
//!
//! Walks a stack's resources as their inputs become available, calls the
//! provisioning engine for each, and feeds every reported output into the
//! graph via `resolve()` (or `fail()` on engine errors, letting the graph
//! short-circuit all dependents).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use stratus_core::{Export, Stack, Value, ValueState};

use crate::engine::{CreateRequest, ProvisioningEngine};
use crate::error::Result;

/// Final status of one resource after a deploy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Created remotely; carries the engine-assigned id
    Created { id: String },
    /// The engine failed this resource, or an upstream failure made it
    /// impossible to attempt
    Failed { message: String },
    /// Never became ready (an input stayed pending for the whole run)
    Blocked { on: String },
}

#[derive(Debug, Clone)]
pub struct ResourceOutcome {
    pub resource: String,
    pub provider: String,
    pub kind: String,
    pub status: OutcomeStatus,
}

/// Final state of one named export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Resolved(Value),
    Failed { source: String, reason: String },
}

/// Result of driving a stack to completion
#[derive(Debug, Clone)]
pub struct DeployResult {
    pub stack: String,
    pub outcomes: Vec<ResourceOutcome>,
    pub exports: BTreeMap<String, ExportOutcome>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl DeployResult {
    /// A run succeeds when every resource was created and every export resolved
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|outcome| matches!(outcome.status, OutcomeStatus::Created { .. }))
            && self
                .exports
                .values()
                .all(|export| matches!(export, ExportOutcome::Resolved(_)))
    }
}

/// Drive every resource of the stack through the engine.
///
/// Resources are attempted in registration order among the ready ones, so
/// runs are deterministic. The run ends when no resource can make progress;
/// resources unreachable because of an upstream failure are reported as
/// failed, not silently skipped.
pub async fn deploy(stack: &mut Stack, engine: &dyn ProvisioningEngine) -> Result<DeployResult> {
    let started_at = Utc::now();
    let timer = std::time::Instant::now();
    let total = stack.resources().len();
    let mut status: Vec<Option<OutcomeStatus>> = vec![None; total];

    tracing::info!(
        "deploying stack '{}' ({} resources) via engine '{}'",
        stack.name(),
        total,
        engine.name()
    );

    loop {
        let mut progressed = false;
        for index in 0..total {
            if status[index].is_some() {
                continue;
            }

            // An upstream failure has already cascaded into this resource's
            // identifier; record it and move on.
            let id = stack.resources()[index].id;
            if let ValueState::Failed { source, reason } = stack.graph().state(id)? {
                status[index] = Some(OutcomeStatus::Failed {
                    message: format!("upstream '{source}' failed: {reason}"),
                });
                progressed = true;
                continue;
            }

            if !inputs_ready(stack, index)? {
                continue;
            }

            let request = {
                let entry = &stack.resources()[index];
                CreateRequest {
                    resource: entry.name.clone(),
                    provider: entry.provider.clone(),
                    kind: entry.kind.clone(),
                    inputs: entry.materialize_inputs(stack.graph())?,
                }
            };
            tracing::info!(
                "creating {}:{} '{}'",
                request.provider,
                request.kind,
                request.resource
            );

            match engine.create(&request).await {
                Ok(response) => {
                    let entry_outputs: Vec<(String, stratus_core::OutputId)> = stack.resources()
                        [index]
                        .outputs
                        .iter()
                        .map(|(name, id)| (name.clone(), *id))
                        .collect();
                    let graph = stack.graph_mut();
                    graph.resolve(id, Value::String(response.id.clone()))?;
                    for (name, output_id) in entry_outputs {
                        match response.outputs.get(&name) {
                            Some(value) => graph.resolve(output_id, value.clone())?,
                            None => graph.fail(
                                output_id,
                                format!("engine reported no value for '{name}'"),
                            )?,
                        }
                    }
                    status[index] = Some(OutcomeStatus::Created { id: response.id });
                }
                Err(error) => {
                    let message = error.to_string();
                    tracing::warn!(
                        "creation of '{}' failed: {}",
                        request.resource,
                        message
                    );
                    // Failing the identifier cascades into the declared
                    // outputs and every derived consumer.
                    stack.graph_mut().fail(id, message.clone())?;
                    status[index] = Some(OutcomeStatus::Failed { message });
                }
            }
            progressed = true;
        }
        if !progressed {
            break;
        }
    }

    // Leftovers waited on a value nobody will ever deliver.
    for index in 0..total {
        if status[index].is_none() {
            let on = first_pending_input(stack, index)?;
            status[index] = Some(OutcomeStatus::Blocked { on });
        }
    }

    let outcomes = stack
        .resources()
        .iter()
        .zip(status)
        .map(|(entry, status)| ResourceOutcome {
            resource: entry.name.clone(),
            provider: entry.provider.clone(),
            kind: entry.kind.clone(),
            status: status.expect("every resource has a final status"),
        })
        .collect();

    let exports = collect_exports(stack)?;
    let result = DeployResult {
        stack: stack.name().to_string(),
        outcomes,
        exports,
        started_at,
        duration_ms: timer.elapsed().as_millis() as u64,
    };
    if result.is_success() {
        tracing::info!("stack '{}' deployed in {}ms", result.stack, result.duration_ms);
    } else {
        tracing::warn!("stack '{}' finished with failures", result.stack);
    }
    Ok(result)
}

fn inputs_ready(stack: &Stack, index: usize) -> Result<bool> {
    let entry = &stack.resources()[index];
    for dep in stack.graph().declared_deps(entry.id)? {
        if !stack.graph().state(dep)?.is_resolved() {
            return Ok(false);
        }
    }
    Ok(true)
}

fn first_pending_input(stack: &Stack, index: usize) -> Result<String> {
    let entry = &stack.resources()[index];
    for dep in stack.graph().declared_deps(entry.id)? {
        if matches!(stack.graph().state(dep)?, ValueState::Pending) {
            return Ok(stack.graph().name(dep)?.to_string());
        }
    }
    Ok("unknown input".to_string())
}

fn collect_exports(stack: &Stack) -> Result<BTreeMap<String, ExportOutcome>> {
    let mut exports = BTreeMap::new();
    for (name, export) in stack.exports() {
        let outcome = match export {
            Export::Value(value) => ExportOutcome::Resolved(value.clone()),
            Export::Output(id) => match stack.graph().state(*id)? {
                ValueState::Resolved(value) => ExportOutcome::Resolved(value),
                ValueState::Failed { source, reason } => ExportOutcome::Failed { source, reason },
                ValueState::Pending => ExportOutcome::Failed {
                    source: stack.graph().name(*id)?.to_string(),
                    reason: "never resolved".to_string(),
                },
            },
        };
        exports.insert(name.clone(), outcome);
    }
    Ok(exports)
}
