//! Stratus engine seam
//!
//! Connects declarative stacks to a provisioning engine: the
//! [`ProvisioningEngine`] trait is the boundary behind which real cloud
//! calls happen, [`deploy`] is the dependency-ordered driver feeding engine
//! results into the deferred-value graph, and [`SimulatedEngine`] is the
//! in-process stand-in used by previews and tests.

pub mod driver;
pub mod engine;
pub mod error;
pub mod simulated;

pub use driver::{deploy, DeployResult, ExportOutcome, OutcomeStatus, ResourceOutcome};
pub use engine::{CreateRequest, CreateResponse, ProvisioningEngine};
pub use error::{EngineError, Result};
pub use simulated::{deterministic_suffix, SimulatedEngine, SynthesizeFn};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use stratus_core::{ResourceDecl, Stack};
    use stratus_graph::Value;

    fn synthesize_test(
        request: &CreateRequest,
    ) -> std::result::Result<BTreeMap<String, Value>, String> {
        match request.kind.as_str() {
            "server" => Ok(BTreeMap::from([(
                "host".to_string(),
                json!(format!("{}.test.internal", request.resource)),
            )])),
            "record" => {
                let target = request
                    .input_str("target")
                    .ok_or_else(|| "missing target".to_string())?;
                Ok(BTreeMap::from([(
                    "fqdn".to_string(),
                    json!(format!("{}.", target)),
                )]))
            }
            other => Err(format!("unknown kind '{other}'")),
        }
    }

    fn chain_stack() -> Stack {
        let mut stack = Stack::new("chain");
        let server = stack
            .register(ResourceDecl::new("test", "server", "server").output("host"))
            .unwrap();
        let host = server.output::<String>("host").unwrap();
        let record = stack
            .register(
                ResourceDecl::new("test", "record", "record")
                    .input("target", host)
                    .output("fqdn"),
            )
            .unwrap();
        let fqdn = record.output::<String>("fqdn").unwrap();
        let url = stack
            .concat("url", vec!["https://".into(), fqdn.into()])
            .unwrap();
        stack.export("url", url).unwrap();
        stack
    }

    #[tokio::test]
    async fn deploy_resolves_chain_in_dependency_order() {
        let mut stack = chain_stack();
        let engine = SimulatedEngine::new().with_provider("test", synthesize_test);

        let result = deploy(&mut stack, &engine).await.unwrap();
        assert!(result.is_success());
        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.outcomes[0].resource, "server");
        assert_eq!(result.outcomes[1].resource, "record");
        assert_eq!(
            result.exports["url"],
            ExportOutcome::Resolved(json!("https://server.test.internal."))
        );
    }

    #[tokio::test]
    async fn engine_failure_short_circuits_dependents() {
        let mut stack = chain_stack();
        let engine = SimulatedEngine::new()
            .with_provider("test", synthesize_test)
            .fail_resource("server", "quota exceeded");

        let result = deploy(&mut stack, &engine).await.unwrap();
        assert!(!result.is_success());
        assert!(matches!(
            result.outcomes[0].status,
            OutcomeStatus::Failed { .. }
        ));
        // The record never reached the engine; its failure names the origin.
        match &result.outcomes[1].status {
            OutcomeStatus::Failed { message } => assert!(message.contains("server")),
            other => panic!("expected upstream failure, got {other:?}"),
        }
        assert!(matches!(
            &result.exports["url"],
            ExportOutcome::Failed { source, .. } if source == "server.id"
        ));
    }

    #[tokio::test]
    async fn independent_branches_survive_a_failure() {
        let mut stack = Stack::new("branches");
        for name in ["alpha", "beta"] {
            stack
                .register(ResourceDecl::new("test", "server", name).output("host"))
                .unwrap();
        }
        let engine = SimulatedEngine::new()
            .with_provider("test", synthesize_test)
            .fail_resource("alpha", "boom");

        let result = deploy(&mut stack, &engine).await.unwrap();
        assert!(matches!(
            result.outcomes[0].status,
            OutcomeStatus::Failed { .. }
        ));
        assert!(matches!(
            result.outcomes[1].status,
            OutcomeStatus::Created { .. }
        ));
    }

    #[tokio::test]
    async fn unsupported_provider_fails_the_resource() {
        let mut stack = Stack::new("unsupported");
        stack
            .register(ResourceDecl::new("gcp", "bucket", "bucket").output("name"))
            .unwrap();
        let engine = SimulatedEngine::new().with_provider("test", synthesize_test);

        let result = deploy(&mut stack, &engine).await.unwrap();
        match &result.outcomes[0].status {
            OutcomeStatus::Failed { message } => {
                assert!(message.contains("Unsupported resource type"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_engine_output_fails_consumers() {
        let mut stack = Stack::new("missing-output");
        let server = stack
            .register(
                ResourceDecl::new("test", "server", "server")
                    .output("host")
                    .output("ipv6"),
            )
            .unwrap();
        stack
            .export("ipv6", server.output::<String>("ipv6").unwrap())
            .unwrap();
        let engine = SimulatedEngine::new().with_provider("test", synthesize_test);

        let result = deploy(&mut stack, &engine).await.unwrap();
        // The resource itself was created, but the undeclared output failed.
        assert!(matches!(
            result.outcomes[0].status,
            OutcomeStatus::Created { .. }
        ));
        assert!(matches!(
            result.exports["ipv6"],
            ExportOutcome::Failed { .. }
        ));
    }
}
